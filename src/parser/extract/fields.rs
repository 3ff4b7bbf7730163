use std::sync::LazyLock;

use regex::Regex;

use crate::parser::segments::ClientSegment;

pub static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.\-]+@[\w.\-]+\.\w+").unwrap());

/// Anchored fields of one segment, borrowed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields<'a> {
    pub email: String,
    pub phone: String,
    /// Text before the email, where the name lives.
    pub residual: &'a str,
}

/// Email (lower-cased), phone digits and residual window, or `None` when the
/// segment has no email.
pub fn extract_fields<'a>(segment: &ClientSegment<'a>) -> Option<Fields<'a>> {
    let email = EMAIL_RE.find(segment.text)?;
    Some(Fields {
        email: email.as_str().to_lowercase(),
        phone: digits(segment.phone_text()),
        residual: &segment.text[..email.start()],
    })
}

pub fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::segments::split_segments;

    #[test]
    fn fields_of_simple_segment() {
        let segs = split_segments("Maria Silva Maria.Silva@Gmail.com (11) 98888-7777");
        let f = extract_fields(&segs[0]).unwrap();
        assert_eq!(f.email, "maria.silva@gmail.com");
        assert_eq!(f.phone, "11988887777");
        assert_eq!(f.residual, "Maria Silva ");
    }

    #[test]
    fn no_email_drops_segment() {
        let segs = split_segments("Maria Silva sem email (11) 98888-7777");
        assert!(extract_fields(&segs[0]).is_none());
    }

    #[test]
    fn email_after_phone_leaves_phone_in_residual() {
        let segs = split_segments("Ana Costa (21) 3333-4444 ana@teste.com");
        let f = extract_fields(&segs[0]).unwrap();
        assert_eq!(f.email, "ana@teste.com");
        assert_eq!(f.phone, "2133334444");
        assert_eq!(f.residual, "Ana Costa (21) 3333-4444 ");
    }

    #[test]
    fn country_code_is_not_part_of_the_phone() {
        let segs = split_segments("Ana Costa ana@teste.com +5521999990000");
        let f = extract_fields(&segs[0]).unwrap();
        assert_eq!(f.phone, "21999990000");

        let segs = split_segments("Ana Costa ana@teste.com +55 (21) 99999-0000");
        assert_eq!(extract_fields(&segs[0]).unwrap().phone, "21999990000");
    }

    #[test]
    fn email_shapes() {
        for email in ["a@b.c", "first.last-x@sub.domain.com.br", "user_1@mail-server.org"] {
            assert_eq!(EMAIL_RE.find(email).unwrap().as_str(), email);
        }
        assert!(EMAIL_RE.find("joao at teste.com").is_none());
        assert!(EMAIL_RE.find("@teste.com").is_none());
    }

    #[test]
    fn digits_only() {
        assert_eq!(digits("(11) 98888-7777"), "11988887777");
        assert_eq!(digits("21 3333 4444"), "2133334444");
    }
}
