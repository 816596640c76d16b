//! Entry definition
//!
//! A single key/value pair read out of the store.

/// A key/value pair owned by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Raw key bytes
    pub key: Vec<u8>,

    /// Raw value bytes (opaque to the store)
    pub value: Vec<u8>,
}

impl Entry {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Key as text, replacing invalid UTF-8 sequences
    pub fn key_lossy(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }

    /// Value as text, replacing invalid UTF-8 sequences
    pub fn value_lossy(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}
