//! Builder configurations: one named variant per text encoding.

use crate::data::TextEncoderConfig;
use crate::error::{ImdbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ImdbError;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| ImdbError::InvalidVersion(s.to_string()))?;

        match parts[..] {
            [major, minor, patch] => Ok(Self::new(major, minor, patch)),
            _ => Err(ImdbError::InvalidVersion(s.to_string())),
        }
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl TryFrom<String> for Version {
    type Error = ImdbError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Names of every available configuration, in declaration order.
pub const CONFIG_NAMES: [&str; 4] = ["plain_text", "bytes", "subwords8k", "subwords32k"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImdbReviewsConfig {
    pub name: &'static str,
    pub version: Version,
    pub description: &'static str,
    pub text_encoder: TextEncoderConfig,
}

impl ImdbReviewsConfig {
    pub fn plain_text() -> Self {
        Self {
            name: "plain_text",
            version: Version::new(0, 0, 1),
            description: "Plain text",
            text_encoder: TextEncoderConfig::PlainText,
        }
    }

    pub fn bytes() -> Self {
        Self {
            name: "bytes",
            version: Version::new(0, 0, 1),
            description: "Uses byte-level text encoding",
            text_encoder: TextEncoderConfig::Bytes,
        }
    }

    pub fn subwords8k() -> Self {
        Self {
            name: "subwords8k",
            version: Version::new(0, 0, 1),
            description: "Uses a subword text encoder with 8k vocab size",
            text_encoder: TextEncoderConfig::Subwords { vocab_size: 1 << 13 },
        }
    }

    pub fn subwords32k() -> Self {
        Self {
            name: "subwords32k",
            version: Version::new(0, 0, 1),
            description: "Uses a subword text encoder with 32k vocab size",
            text_encoder: TextEncoderConfig::Subwords { vocab_size: 1 << 15 },
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::plain_text(),
            Self::bytes(),
            Self::subwords8k(),
            Self::subwords32k(),
        ]
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "plain_text" => Ok(Self::plain_text()),
            "bytes" => Ok(Self::bytes()),
            "subwords8k" => Ok(Self::subwords8k()),
            "subwords32k" => Ok(Self::subwords32k()),
            other => Err(ImdbError::UnknownConfig {
                name: other.to_string(),
                available: CONFIG_NAMES.to_vec(),
            }),
        }
    }
}

impl FromStr for ImdbReviewsConfig {
    type Err = ImdbError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}
