//! Document data model shared by the caches, the service client and the
//! reducer.
//!
//! Page content is immutable once decoded and is always handed around behind
//! an `Arc`, so cache hits never copy word lists.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Positive page identifier. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct PageNumber(u32);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(1);

    /// Returns `None` for zero, negative and out-of-range input.
    pub fn new(raw: i64) -> Option<Self> {
        if raw <= 0 {
            return None;
        }
        u32::try_from(raw).ok().map(PageNumber)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn previous(self) -> Option<PageNumber> {
        if self.0 > 1 {
            Some(PageNumber(self.0 - 1))
        } else {
            None
        }
    }

    pub fn next(self) -> Option<PageNumber> {
        self.0.checked_add(1).map(PageNumber)
    }

    pub fn is_first(self) -> bool {
        self.0 == 1
    }
}

impl TryFrom<i64> for PageNumber {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        PageNumber::new(raw).ok_or_else(|| format!("page number must be positive, got {raw}"))
    }
}

impl From<PageNumber> for u32 {
    fn from(page: PageNumber) -> Self {
        page.0
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(pub u64);

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NarratorId(pub u64);

impl fmt::Display for NarratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One addressable word unit on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// Page payload as returned by `GET /pages/{n}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageContent {
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl PageContent {
    /// Word ids in reading order; the key set for an annotation refresh.
    pub fn word_ids(&self) -> Vec<WordId> {
        self.lines
            .iter()
            .flat_map(|line| line.words.iter().map(|word| word.id))
            .collect()
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|line| line.words.len()).sum()
    }

    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.lines
            .iter()
            .flat_map(|line| line.words.iter())
            .find(|word| word.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Narrator {
    pub id: NarratorId,
    #[serde(default)]
    pub title: String,
}

/// Wire record for one per-word annotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variation {
    pub word_id: WordId,
    pub narrator_id: NarratorId,
    pub content: String,
}

impl Variation {
    pub fn key(&self) -> AnnotationKey {
        AnnotationKey {
            word_id: self.word_id,
            narrator_id: self.narrator_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationKey {
    pub word_id: WordId,
    pub narrator_id: NarratorId,
}

/// Snapshot of every annotation known for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSet {
    entries: HashMap<AnnotationKey, String>,
}

impl AnnotationSet {
    pub fn from_variations(variations: impl IntoIterator<Item = Variation>) -> Self {
        let entries = variations
            .into_iter()
            .map(|variation| (variation.key(), variation.content))
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &AnnotationKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Annotation to show in place of `word`, honouring the narrator filter.
    ///
    /// The first selected narrator (in selection order) with an entry wins.
    pub fn variant_for(&self, word: WordId, selected: &[NarratorId]) -> Option<(NarratorId, &str)> {
        selected.iter().find_map(|narrator| {
            let key = AnnotationKey {
                word_id: word,
                narrator_id: *narrator,
            };
            self.get(&key).map(|text| (*narrator, text))
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_page(page: u32) -> PageContent {
    let base = u64::from(page) * 100;
    PageContent {
        lines: (0..2u64)
            .map(|line| Line {
                id: base + line,
                words: (0..3u64)
                    .map(|idx| Word {
                        id: WordId(base + line * 10 + idx),
                        content: format!("w{page}-{line}-{idx}"),
                    })
                    .collect(),
            })
            .collect(),
    }
}
