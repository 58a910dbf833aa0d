//! Operator-supplied inputs: keywords, topics and tone.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;

macro_rules! trimmed_text {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Trims the raw value, rejecting it if nothing is left.
            pub fn parse(raw: &str) -> Result<Self, ConfigError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ConfigError::invalid($field, "must not be empty"));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the value as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ConfigError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

trimmed_text!(
    /// A keyword to write about. Always trimmed and non-empty.
    Keyword,
    "keyword"
);

trimmed_text!(
    /// A topic paired with each keyword. Always trimmed and non-empty.
    Topic,
    "topic"
);

/// Writing tone applied to every article of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tone {
    /// Light-hearted.
    #[default]
    Funny,
    /// Grave.
    Serious,
    /// Factual.
    Informative,
}

impl Tone {
    /// All tones, in the order offered to the operator.
    pub const ALL: [Self; 3] = [Self::Funny, Self::Serious, Self::Informative];

    /// Returns the display name used in prompts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Funny => "Funny",
            Self::Serious => "Serious",
            Self::Informative => "Informative",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownTone(wanted.to_string()))
    }
}
