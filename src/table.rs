use std::collections::HashMap;
use tracing::debug;

/// Trim and lowercase a word. Applied to vocabulary keys on insert and to
/// every query word before lookup.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// One word and its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyEntry {
    pub word: String,
    pub vector: Vec<f64>,
}

/// Insertion-ordered word -> vector mapping, filled by a loader and then
/// handed to `AnalogyEngine::build`. Dimensions are not checked here; the
/// engine does that when it takes ownership.
#[derive(Debug, Default)]
pub struct VectorTable {
    entries: Vec<VocabularyEntry>,
    index: HashMap<String, usize>,
    duplicates: usize,
}

impl VectorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        VectorTable {
            entries: Vec::with_capacity(n),
            index: HashMap::with_capacity(n),
            duplicates: 0,
        }
    }

    /// Insert a word. The key is normalised first; if the normalised key is
    /// already present the new vector is dropped and `false` is returned.
    pub fn insert(&mut self, word: &str, vector: Vec<f64>) -> bool {
        let word = normalize(word);
        if self.index.contains_key(&word) {
            debug!(word = %word, "dropping duplicate vocabulary entry");
            self.duplicates += 1;
            return false;
        }
        self.index.insert(word.clone(), self.entries.len());
        self.entries.push(VocabularyEntry { word, vector });
        true
    }

    pub fn get(&self, word: &str) -> Option<&VocabularyEntry> {
        self.index.get(&normalize(word)).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of inserts rejected because their key was already present.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<VocabularyEntry> {
        self.entries
    }
}

impl<S: AsRef<str>> FromIterator<(S, Vec<f64>)> for VectorTable {
    fn from_iter<I: IntoIterator<Item = (S, Vec<f64>)>>(iter: I) -> Self {
        let mut table = VectorTable::new();
        for (word, vector) in iter {
            table.insert(word.as_ref(), vector);
        }
        table
    }
}
