// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! API key table.
//!
//! Keys come from a single configuration string of comma-separated
//! `key:label` pairs. The table is rebuilt from that string on every lookup,
//! so there is no cached state to invalidate.

use std::collections::HashMap;

const PAIR_SEPARATOR: char = ',';
const KEY_LABEL_SEPARATOR: char = ':';

/// Maps opaque API keys to the label of the caller that owns them.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    source: String,
}

impl CredentialStore {
    /// Create a store backed by the given `key:label,key:label` string.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Parse the configuration string into a key → label table.
    ///
    /// Each pair is split on its first `:`. Pairs missing either half are
    /// dropped; a repeated key keeps its last label.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.source
            .split(PAIR_SEPARATOR)
            .filter_map(|pair| {
                let (key, label) = pair.split_once(KEY_LABEL_SEPARATOR)?;
                let (key, label) = (key.trim(), label.trim());
                if key.is_empty() || label.is_empty() {
                    return None;
                }
                Some((key.to_string(), label.to_string()))
            })
            .collect()
    }

    /// Look up the caller label for a key.
    pub fn resolve(&self, key: &str) -> Option<String> {
        self.snapshot().remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_keys() {
        let store = CredentialStore::new("k1:Partner One,k2:Partner Two");

        assert_eq!(store.resolve("k1").as_deref(), Some("Partner One"));
        assert_eq!(store.resolve("k2").as_deref(), Some("Partner Two"));
        assert_eq!(store.resolve("k3"), None);
    }

    #[test]
    fn test_malformed_pairs_dropped() {
        let store = CredentialStore::new("nolabel:,:nokey,bare,,good:label");
        let table = store.snapshot();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("good").map(String::as_str), Some("label"));
    }

    #[test]
    fn test_split_on_first_separator() {
        let store = CredentialStore::new("key:label:with:colons");
        assert_eq!(store.resolve("key").as_deref(), Some("label:with:colons"));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let store = CredentialStore::new("dup:first,dup:second");
        assert_eq!(store.resolve("dup").as_deref(), Some("second"));
    }

    #[test]
    fn test_whitespace_trimmed() {
        let store = CredentialStore::new(" a : Alpha , b:Beta ");
        assert_eq!(store.resolve("a").as_deref(), Some("Alpha"));
        assert_eq!(store.resolve("b").as_deref(), Some("Beta"));
    }

    #[test]
    fn test_empty_source() {
        let store = CredentialStore::default();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.resolve(""), None);
    }
}
