//! JSON Pointer (RFC 6901).

use crate::error::{PatchError, PatchResult};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A parsed JSON Pointer.
///
/// The empty pointer `""` addresses the whole document. Every other pointer
/// is a `/`-separated list of reference tokens, with `~1` standing for `/`
/// and `~0` for `~` inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// Returns the pointer to the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a pointer from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::InvalidPointer`] if the text does not start with
    /// `/` (and is not empty) or contains a `~` not followed by `0` or `1`.
    pub fn parse(text: &str) -> PatchResult<Self> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        let rest = text
            .strip_prefix('/')
            .ok_or_else(|| PatchError::invalid_pointer(text, "must start with '/'"))?;

        let tokens = rest
            .split('/')
            .map(|raw| unescape(raw).ok_or_else(|| PatchError::invalid_pointer(text, "bad '~' escape")))
            .collect::<PatchResult<Vec<_>>>()?;

        Ok(Self { tokens })
    }

    /// Returns the reference tokens, unescaped.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Returns true if this pointer addresses the document root.
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns a pointer to the child `token` of this location.
    #[must_use]
    pub fn child(&self, token: impl Into<String>) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(token.into());
        Self { tokens }
    }

    /// Splits the pointer into its parent and last token.
    ///
    /// Returns `None` for the root pointer.
    pub fn split_last(&self) -> Option<(JsonPointer, &str)> {
        let (last, parent) = self.tokens.split_last()?;
        Some((
            JsonPointer {
                tokens: parent.to_vec(),
            },
            last.as_str(),
        ))
    }

    /// Returns true if `other` is strictly below this location.
    pub fn is_proper_prefix_of(&self, other: &JsonPointer) -> bool {
        other.tokens.len() > self.tokens.len() && other.tokens.starts_with(&self.tokens)
    }

    /// Looks up the addressed value.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.tokens.iter().try_fold(document, |current, token| match current {
            Value::Object(map) => map.get(token),
            Value::Array(items) => parse_index(token).and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Looks up the addressed value for mutation.
    pub fn resolve_mut<'a>(&self, document: &'a mut Value) -> Option<&'a mut Value> {
        self.tokens.iter().try_fold(document, |current, token| match current {
            Value::Object(map) => map.get_mut(token),
            Value::Array(items) => parse_index(token).and_then(move |i| items.get_mut(i)),
            _ => None,
        })
    }
}

/// Parses an array index token: `0` or a decimal without leading zeros.
pub(crate) fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", token.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

impl FromStr for JsonPointer {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for JsonPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JsonPointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}
