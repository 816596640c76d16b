//! Key matchers
//!
//! Predicates deciding which keys a scan counts and returns.

use regex::bytes::Regex;

use crate::error::Result;

/// Decides whether a key belongs to a scan
pub trait KeyMatcher: Send + Sync {
    fn matches(&self, key: &[u8]) -> bool;
}

/// Unanchored regular expression over the raw key bytes
///
/// The empty pattern matches every key.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// Compile `pattern`, failing with `InvalidPattern` on bad syntax
    pub fn compile(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl KeyMatcher for RegexMatcher {
    fn matches(&self, key: &[u8]) -> bool {
        self.regex.is_match(key)
    }
}

/// Keys starting with a fixed byte prefix
#[derive(Debug, Clone)]
pub struct PrefixMatcher {
    prefix: Vec<u8>,
}

impl PrefixMatcher {
    pub fn new(prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl KeyMatcher for PrefixMatcher {
    fn matches(&self, key: &[u8]) -> bool {
        key.starts_with(&self.prefix)
    }
}

/// Every key
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl KeyMatcher for MatchAll {
    fn matches(&self, _key: &[u8]) -> bool {
        true
    }
}
