use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque user payload held at the root of a pointer tree.
///
/// The pointer layer never interprets content; it only moves it between the
/// caller and the root record.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Content(Vec<u8>);

impl Content {
    /// Wrap raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The content as UTF-8, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Consume and return the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "Content({s:?})"),
            None => write!(f, "Content({} bytes)", self.0.len()),
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Content {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl PartialEq<&str> for Content {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_keeps_bytes() {
        let c = Content::from("MYDATA");
        assert_eq!(c.as_bytes(), b"MYDATA");
        assert_eq!(c.as_str(), Some("MYDATA"));
        assert_eq!(c, "MYDATA");
        assert_eq!(c.len(), 6);
    }

    #[test]
    fn binary_content_has_no_str() {
        let c = Content::new(vec![0xff, 0xfe]);
        assert!(c.as_str().is_none());
        assert_eq!(format!("{c:?}"), "Content(2 bytes)");
    }

    #[test]
    fn debug_and_display() {
        let c = Content::from("x");
        assert_eq!(format!("{c:?}"), "Content(\"x\")");
        assert_eq!(c.to_string(), "x");
    }

    #[test]
    fn default_is_empty() {
        assert!(Content::default().is_empty());
    }
}
