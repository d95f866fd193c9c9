use crate::constants::TOKEN_LENGTH;
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

const TOKEN_ALPHABET: [char; 36] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Id of one merged highlight rectangle.
///
/// Ids are derived from the page and the rectangle's position in the merged
/// output, so recomputing the same selection yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HighlightId(Arc<str>);

impl HighlightId {
    pub fn new<S>(s: S) -> Self
    where
        S: AsRef<str>,
    {
        HighlightId(Arc::from(s.as_ref()))
    }

    pub fn for_page(page: u32, ordinal: usize) -> Self {
        HighlightId::new(format!("hl-p{}-{}", page, ordinal))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for HighlightId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for HighlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for HighlightId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HighlightId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(HighlightId(Arc::from(s)))
    }
}

/// Identifies one click episode. A decay callback only clears the active
/// highlight if it still carries the current token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActiveToken(Arc<str>);

impl ActiveToken {
    pub fn mint() -> Self {
        ActiveToken(Arc::from(nanoid!(TOKEN_LENGTH, &TOKEN_ALPHABET)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActiveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
