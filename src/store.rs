//! Process-local state shared between requests.
//!
//! Handlers only see the [`Store`] trait so the in-memory maps can be swapped
//! for a bounded or external implementation.

use cryptoxide::{digest::Digest as _, sha2::Sha256};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use crate::model::SourceFile;

pub trait Store<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;

    fn put(&self, key: K, value: V);

    fn clear(&self);
}

/// Unbounded map with last-write-wins semantics. Nothing is ever evicted.
#[derive(Debug)]
pub struct MemoryStore<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> MemoryStore<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Store<K, V> for MemoryStore<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn put(&self, key: K, value: V) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, value);
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

fn feed(hasher: &mut Sha256, value: &str) {
    hasher.input(&(value.len() as u64).to_le_bytes());
    hasher.input(value.as_bytes());
}

/// Key for the analysis cache.
///
/// Every field is length-prefixed before hashing, so the key depends only on
/// the values and their order, never on how a request happened to be encoded.
pub fn analysis_cache_key(language: &str, files: &[SourceFile]) -> String {
    let mut hasher = Sha256::new();

    feed(&mut hasher, language);
    hasher.input(&(files.len() as u64).to_le_bytes());

    for file in files {
        feed(&mut hasher, &file.path);
        feed(&mut hasher, &file.content);
        match &file.language {
            Some(language) => {
                hasher.input(&[1]);
                feed(&mut hasher, language);
            }
            None => hasher.input(&[0]),
        }
    }

    format!("{}_{}", language, hasher.result_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites_and_clears() {
        let store: MemoryStore<String, usize> = MemoryStore::new();

        store.put("a".to_string(), 1);
        store.put("a".to_string(), 2);
        store.put("b".to_string(), 3);

        assert_eq!(store.get(&"a".to_string()), Some(2));
        assert_eq!(store.len(), 2);

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.get(&"b".to_string()), None);
    }

    #[test]
    fn cache_key_is_stable_for_identical_input() {
        let files = vec![SourceFile::new("src/main.rs", "fn main() {}")];

        assert_eq!(
            analysis_cache_key("rust", &files),
            analysis_cache_key("rust", &files.clone())
        );
    }

    #[test]
    fn cache_key_distinguishes_field_boundaries() {
        let left = vec![SourceFile::new("ab", "c")];
        let right = vec![SourceFile::new("a", "bc")];

        assert_ne!(
            analysis_cache_key("rust", &left),
            analysis_cache_key("rust", &right)
        );
    }

    #[test]
    fn cache_key_depends_on_language_and_file_language() {
        let plain = vec![SourceFile::new("x", "y")];
        let mut tagged = plain.clone();
        tagged[0].language = Some("python".to_string());

        assert_ne!(
            analysis_cache_key("python", &plain),
            analysis_cache_key("python", &tagged)
        );
        assert_ne!(
            analysis_cache_key("python", &plain),
            analysis_cache_key("rust", &plain)
        );
        assert!(analysis_cache_key("python", &plain).starts_with("python_"));
    }
}
