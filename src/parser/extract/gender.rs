//! Best-effort male/female classification of an extracted name.
//!
//! Rules run in order and the first one with an answer wins:
//!
//! 1. [`ExplicitMarker`]: an unambiguous marker word in the surrounding text.
//! 2. [`FirstNameLookup`]: the first name is in the female or male table.
//! 3. [`FeminineSuffix`]: the first name ends in "a" and is not a known exception.
//! 4. [`WholeNameLookup`]: any token of the name is in either table.
//!
//! When nothing matches the configured default is returned, which is `Male`
//! unless overridden. That default is a statistical bias carried over on
//! purpose; callers relying on gender should treat it as a guess.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::lexicon::{fold, Lexicon};
use crate::parser::extract::fields::EMAIL_RE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(ConfigError::InvalidGender(s.to_string())),
        }
    }
}

/// One step of the inference chain.
pub trait GenderRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn infer(&self, name: &str, context: Option<&str>, lexicon: &Lexicon) -> Option<Gender>;
}

pub struct ExplicitMarker;
pub struct FirstNameLookup;
pub struct FeminineSuffix;
pub struct WholeNameLookup;

impl GenderRule for ExplicitMarker {
    fn name(&self) -> &'static str {
        "explicit_marker"
    }

    fn infer(&self, _name: &str, context: Option<&str>, lexicon: &Lexicon) -> Option<Gender> {
        let context = EMAIL_RE.replace_all(context?, " ");
        let words: Vec<&str> = context
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .collect();
        let female = words.iter().any(|w| lexicon.is_female_marker(w));
        let male = words.iter().any(|w| lexicon.is_male_marker(w));

        match (female, male) {
            (true, false) => Some(Gender::Female),
            (false, true) => Some(Gender::Male),
            _ => None,
        }
    }
}

impl GenderRule for FirstNameLookup {
    fn name(&self) -> &'static str {
        "first_name"
    }

    fn infer(&self, name: &str, _context: Option<&str>, lexicon: &Lexicon) -> Option<Gender> {
        lookup(first_name(name)?, lexicon)
    }
}

impl GenderRule for FeminineSuffix {
    fn name(&self) -> &'static str {
        "feminine_suffix"
    }

    fn infer(&self, name: &str, _context: Option<&str>, lexicon: &Lexicon) -> Option<Gender> {
        let first = first_name(name)?;
        (fold(first).ends_with('a') && !lexicon.is_suffix_exception(first)).then_some(Gender::Female)
    }
}

impl GenderRule for WholeNameLookup {
    fn name(&self) -> &'static str {
        "whole_name"
    }

    fn infer(&self, name: &str, _context: Option<&str>, lexicon: &Lexicon) -> Option<Gender> {
        name.split_whitespace().find_map(|token| lookup(token, lexicon))
    }
}

fn first_name(name: &str) -> Option<&str> {
    name.split_whitespace().next()
}

fn lookup(token: &str, lexicon: &Lexicon) -> Option<Gender> {
    if lexicon.is_female_name(token) {
        Some(Gender::Female)
    } else if lexicon.is_male_name(token) {
        Some(Gender::Male)
    } else {
        None
    }
}

/// Ordered rule chain with a fallback.
pub struct GenderInference {
    rules: Vec<Box<dyn GenderRule>>,
    default: Gender,
}

impl GenderInference {
    pub fn new(default: Gender) -> Self {
        GenderInference {
            rules: vec![
                Box::new(ExplicitMarker),
                Box::new(FirstNameLookup),
                Box::new(FeminineSuffix),
                Box::new(WholeNameLookup),
            ],
            default,
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn GenderRule>>, default: Gender) -> Self {
        GenderInference { rules, default }
    }

    pub fn infer(&self, name: &str, context: Option<&str>, lexicon: &Lexicon) -> Gender {
        self.explain(name, context, lexicon).0
    }

    /// The inferred gender and the rule that decided it (`"default"` on fallback).
    pub fn explain(&self, name: &str, context: Option<&str>, lexicon: &Lexicon) -> (Gender, &'static str) {
        self.rules
            .iter()
            .find_map(|rule| rule.infer(name, context, lexicon).map(|g| (g, rule.name())))
            .unwrap_or((self.default, "default"))
    }
}

impl Default for GenderInference {
    fn default() -> Self {
        GenderInference::new(Gender::Male)
    }
}
