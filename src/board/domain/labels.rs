//! Free-form work-item labels.

use serde::{Deserialize, Serialize};

/// Maximum number of suggestions returned by [`LabelSet::suggest`].
pub const SUGGESTION_LIMIT: usize = 6;

/// Ordered set of labels, case-preserved and unique ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Normalizes raw label input.
    ///
    /// Trims, drops trailing `;`/`,` separators and collapses inner runs of
    /// whitespace. Returns `None` when nothing is left.
    #[must_use]
    pub fn normalize(raw: &str) -> Option<String> {
        let stripped = raw
            .trim()
            .trim_end_matches(|ch: char| ch == ';' || ch == ',' || ch.is_whitespace());
        let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        (!collapsed.is_empty()).then_some(collapsed)
    }

    /// Adds a label after normalization.
    ///
    /// Returns `false` when the input normalizes to nothing or a label with
    /// the same case-folded text is already present.
    pub fn insert(&mut self, raw: &str) -> bool {
        let Some(label) = Self::normalize(raw) else {
            return false;
        };
        if self.contains(&label) {
            return false;
        }
        self.0.push(label);
        true
    }

    /// Removes the label with exactly this text.
    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != label);
        self.0.len() != before
    }

    /// Removes and returns the most recently added label.
    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    /// Returns `true` when a label matches ignoring case.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        let folded = label.to_lowercase();
        self.0.iter().any(|existing| existing.to_lowercase() == folded)
    }

    /// Iterates labels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of labels.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there are no labels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Suggests known labels containing `query`, skipping ones already set.
    ///
    /// Matching ignores case; an empty query yields nothing.
    #[must_use]
    pub fn suggest<'a>(&self, query: &str, known: &'a [String]) -> Vec<&'a str> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        known
            .iter()
            .filter(|candidate| {
                !self.contains(candidate) && candidate.to_lowercase().contains(&needle)
            })
            .take(SUGGESTION_LIMIT)
            .map(String::as_str)
            .collect()
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(value: Vec<String>) -> Self {
        value.into_iter().collect()
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(value: LabelSet) -> Self {
        value.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut labels = Self::new();
        for raw in iter {
            labels.insert(raw.as_ref());
        }
        labels
    }
}
