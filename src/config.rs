use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::lexicon::Lexicon;
use crate::parser::extract::gender::Gender;

pub const ENV_PREFIX: &str = "CLIENT_EXTRACT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("unknown gender {0:?} (expected \"male\" or \"female\")")]
    InvalidGender(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Runtime knobs for one [`crate::Extractor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Lines whose trimmed length is at or below this are discarded.
    pub min_line_chars: usize,
    /// How many trailing residual tokens form the name.
    pub name_tokens: usize,
    pub default_gender: Gender,
    pub lexicon_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            min_line_chars: 10,
            name_tokens: 2,
            default_gender: Gender::Male,
            lexicon_path: None,
        }
    }
}

// Shape of the raw config sources before validation.
#[derive(Debug, Deserialize)]
struct RawSettings {
    min_line_chars: i64,
    name_tokens: i64,
    default_gender: String,
    lexicon_path: Option<String>,
}

impl Settings {
    /// Defaults, then `file` (if given), then `CLIENT_EXTRACT_*` env vars.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(file, config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(file: Option<&Path>, env: config::Environment) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = config::Config::builder()
            .set_default("min_line_chars", defaults.min_line_chars as i64)?
            .set_default("name_tokens", defaults.name_tokens as i64)?
            .set_default("default_gender", defaults.default_gender.as_str())?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        let raw: RawSettings = builder
            .add_source(env)
            .build()?
            .try_deserialize()?;

        raw.validate()
    }

    /// Lexicon named by `lexicon_path`, or the built-in one.
    pub fn lexicon(&self) -> Result<Lexicon, ConfigError> {
        match &self.lexicon_path {
            Some(path) => Lexicon::load(path),
            None => Ok(Lexicon::default()),
        }
    }
}

impl RawSettings {
    fn validate(self) -> Result<Settings, ConfigError> {
        let min_line_chars = usize::try_from(self.min_line_chars).map_err(|_| {
            ConfigError::InvalidValue {
                key: "min_line_chars",
                reason: format!("{} is negative", self.min_line_chars),
            }
        })?;
        let name_tokens = match usize::try_from(self.name_tokens) {
            Ok(n) if n >= 1 => n,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "name_tokens",
                    reason: format!("{} must be at least 1", self.name_tokens),
                })
            }
        };
        let default_gender: Gender = self.default_gender.parse()?;

        Ok(Settings {
            min_line_chars,
            name_tokens,
            default_gender,
            lexicon_path: self.lexicon_path.filter(|p| !p.is_empty()).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_sources() {
        let s = Settings::load(None).unwrap();
        assert_eq!(s.min_line_chars, 10);
        assert_eq!(s.name_tokens, 2);
        assert_eq!(s.default_gender, Gender::Male);
        assert!(s.lexicon_path.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = toml_file("min_line_chars = 5\ndefault_gender = \"female\"\n");
        let s = Settings::load(Some(file.path())).unwrap();
        assert_eq!(s.min_line_chars, 5);
        assert_eq!(s.name_tokens, 2);
        assert_eq!(s.default_gender, Gender::Female);
    }

    #[test]
    fn rejects_unknown_gender() {
        let file = toml_file("default_gender = \"other\"\n");
        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGender(g) if g == "other"));
    }

    #[test]
    fn rejects_zero_name_tokens() {
        let file = toml_file("name_tokens = 0\n");
        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "name_tokens", .. }));
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let vars: config::Map<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(vars))
    }

    #[test]
    fn env_overrides_file() {
        let file = toml_file("min_line_chars = 5\nname_tokens = 3\n");
        let vars = env(&[
            ("CLIENT_EXTRACT_MIN_LINE_CHARS", "4"),
            ("CLIENT_EXTRACT_DEFAULT_GENDER", "female"),
            ("OTHER_APP_NAME_TOKENS", "9"),
        ]);
        let s = Settings::load_with(Some(file.path()), vars).unwrap();
        assert_eq!(s.min_line_chars, 4);
        assert_eq!(s.name_tokens, 3);
        assert_eq!(s.default_gender, Gender::Female);
    }

    #[test]
    fn env_values_are_validated() {
        let vars = env(&[("CLIENT_EXTRACT_DEFAULT_GENDER", "x")]);
        let err = Settings::load_with(None, vars).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGender(g) if g == "x"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Settings::load(Some(Path::new("/nonexistent/client_extract.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
