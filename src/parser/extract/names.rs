use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::{fold, Lexicon};
use crate::parser::extract::fields::EMAIL_RE;
use crate::parser::segments::find_phones;

static LETTERS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Alphabetic}+").unwrap());

/// A validated name and the byte offset of its first token in the residual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidName {
    pub text: String,
    pub start: usize,
}

/// Cleans the residual window into a name, or `None` if nothing name-like is left.
///
/// Only the trailing `keep` tokens are kept: in a "… Name email phone" row the
/// words nearest the anchors are the name, anything further left is header or
/// column noise.
pub fn validate_name(residual: &str, keep: usize, lexicon: &Lexicon) -> Option<String> {
    locate_name(residual, keep, lexicon).map(|n| n.text)
}

/// Same as [`validate_name`], keeping where the name starts.
pub fn locate_name(residual: &str, keep: usize, lexicon: &Lexicon) -> Option<ValidName> {
    let tokens = located_tokens(residual, lexicon);
    let tail = &tokens[tokens.len().saturating_sub(keep)..];

    match tail {
        [] => None,
        [(_, single)] if !lexicon.is_known_first_name(single) => None,
        [(start, _), ..] => Some(ValidName {
            text: tail.iter().map(|(_, w)| *w).collect::<Vec<_>>().join(" "),
            start: *start,
        }),
    }
}

// Letter-only tokens of `residual` with anchors, stop phrases and stop words removed.
fn located_tokens<'a>(residual: &'a str, lexicon: &Lexicon) -> Vec<(usize, &'a str)> {
    let mut words = letter_words(residual);
    remove_stop_phrases(&mut words, lexicon);

    words
        .into_iter()
        .filter(|(_, w)| w.chars().count() > 1)
        .filter(|(_, w)| !w.chars().all(char::is_numeric))
        .filter(|(_, w)| !lexicon.is_stop_word(w))
        .collect()
}

// Runs of letters, with offsets, that are not part of a leftover phone or email.
fn letter_words(text: &str) -> Vec<(usize, &str)> {
    let mut anchors: Vec<_> = find_phones(text)
        .into_iter()
        .map(|p| p.span)
        .chain(EMAIL_RE.find_iter(text).map(|m| m.range()))
        .collect();
    anchors.sort_by_key(|r| r.start);

    let mut words = Vec::new();
    let mut pos = 0;
    for anchor in anchors {
        if anchor.start >= pos {
            words.extend(letters_in(text, pos..anchor.start));
            pos = anchor.end;
        } else if anchor.end > pos {
            pos = anchor.end;
        }
    }
    words.extend(letters_in(text, pos..text.len()));
    words
}

fn letters_in(text: &str, range: Range<usize>) -> impl Iterator<Item = (usize, &str)> {
    let offset = range.start;
    LETTERS_RE
        .find_iter(&text[range])
        .map(move |m| (offset + m.start(), m.as_str()))
}

fn remove_stop_phrases(words: &mut Vec<(usize, &str)>, lexicon: &Lexicon) {
    if words.is_empty() {
        return;
    }
    let folded: Vec<String> = words.iter().map(|(_, w)| fold(w)).collect();
    let mut drop = vec![false; words.len()];

    for phrase in lexicon.stop_phrases() {
        let parts: Vec<&str> = phrase.split_whitespace().collect();
        if parts.is_empty() || parts.len() > words.len() {
            continue;
        }
        for start in 0..=words.len() - parts.len() {
            let span = start..start + parts.len();
            if drop[span.clone()].iter().any(|d| *d) {
                continue;
            }
            if folded[span.clone()].iter().zip(&parts).all(|(w, p)| w.as_str() == *p) {
                drop[span].iter_mut().for_each(|d| *d = true);
            }
        }
    }

    let mut flags = drop.into_iter();
    words.retain(|_| !flags.next().unwrap_or(false));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(residual: &str) -> Option<String> {
        validate_name(residual, 2, Lexicon::builtin())
    }

    #[test]
    fn two_tokens() {
        assert_eq!(name("Maria Silva ").as_deref(), Some("Maria Silva"));
        assert_eq!(name(" Ana Costa ").as_deref(), Some("Ana Costa"));
    }

    #[test]
    fn keeps_trailing_tokens() {
        assert_eq!(name("Lista de clientes 2024 Pedro Henrique Alves").as_deref(), Some("Henrique Alves"));
    }

    #[test]
    fn drops_header_and_state_noise() {
        assert_eq!(name("Nome Telefone Email SP Carla Mendes").as_deref(), Some("Carla Mendes"));
        assert_eq!(name("Fernanda Lima São Paulo").as_deref(), Some("Fernanda Lima"));
        assert_eq!(name("Rio Grande do Sul Bruno Teixeira").as_deref(), Some("Bruno Teixeira"));
    }

    #[test]
    fn paulo_survives_outside_phrase() {
        assert_eq!(name("Paulo Roberto").as_deref(), Some("Paulo Roberto"));
        assert_eq!(name("São Paulo Paulo").as_deref(), Some("Paulo"));
    }

    #[test]
    fn particles_are_skipped() {
        assert_eq!(name("Maria da Silva").as_deref(), Some("Maria Silva"));
    }

    #[test]
    fn single_known_name_accepted() {
        assert_eq!(name("cliente: Juliana").as_deref(), Some("Juliana"));
        assert_eq!(name("João").as_deref(), Some("João"));
    }

    #[test]
    fn single_unknown_token_rejected() {
        assert_eq!(name("Xpto "), None);
        assert_eq!(name("Fulano"), None);
    }

    #[test]
    fn nothing_left() {
        assert_eq!(name(""), None);
        assert_eq!(name("  123 - 4 ; "), None);
        assert_eq!(name("Nome Email Telefone"), None);
    }

    #[test]
    fn leftover_anchors_are_stripped() {
        assert_eq!(name("Ana Costa (21) 3333-4444 ").as_deref(), Some("Ana Costa"));
        assert_eq!(name("old@mail.com Rita Moura").as_deref(), Some("Rita Moura"));
    }

    #[test]
    fn accents_kept_symbols_split() {
        assert_eq!(name("José D'Ávila").as_deref(), Some("José Ávila"));
        assert_eq!(name("Ana-Clara").as_deref(), Some("Ana Clara"));
    }

    #[test]
    fn name_offset_points_at_first_kept_token() {
        let residual = " masculino Ana Costa ";
        let found = locate_name(residual, 2, Lexicon::builtin()).unwrap();
        assert_eq!(found.text, "Ana Costa");
        assert_eq!(&residual[found.start..], "Ana Costa ");

        let residual = "Lista São Paulo Conceição Araújo";
        let found = locate_name(residual, 2, Lexicon::builtin()).unwrap();
        assert_eq!(&residual[found.start..], "Conceição Araújo");
    }

    #[test]
    fn prefixed_phone_is_stripped() {
        assert_eq!(name("Ana Costa +55 21 99999-0000 ").as_deref(), Some("Ana Costa"));
    }

    #[test]
    fn single_token_window() {
        assert_eq!(validate_name("Pedro Henrique Alves", 1, Lexicon::builtin()), None);
        assert_eq!(validate_name("Henrique Pedro", 1, Lexicon::builtin()).as_deref(), Some("Pedro"));
    }
}
