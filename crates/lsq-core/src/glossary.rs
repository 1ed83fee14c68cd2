use crate::catalog::Catalog;

/// A term the learner has unlocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryEntry {
    /// The word or phrase.
    pub word: String,
    /// Its meaning.
    pub meaning: String,
    /// Title of the mission that taught it.
    pub mission: String,
}

/// The terms of every passed mission, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    entries: Vec<GlossaryEntry>,
}

impl Glossary {
    /// Collect the terms of the first `completed` missions.
    ///
    /// `completed` is the mission pointer; values past the end of the
    /// catalog unlock everything.
    pub fn unlocked(catalog: &Catalog, completed: usize) -> Self {
        let entries = catalog
            .missions()
            .iter()
            .take(completed)
            .map(|m| GlossaryEntry {
                word: m.term.word.clone(),
                meaning: m.term.meaning.clone(),
                mission: m.title.clone(),
            })
            .collect();
        Self { entries }
    }

    /// All unlocked entries.
    pub fn entries(&self) -> &[GlossaryEntry] {
        &self.entries
    }

    /// Number of unlocked terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is unlocked yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose word or meaning contains `query` (case-insensitive).
    pub fn filter(&self, query: &str) -> Vec<&GlossaryEntry> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                needle.is_empty()
                    || e.word.to_lowercase().contains(&needle)
                    || e.meaning.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
