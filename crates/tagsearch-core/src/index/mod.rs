//! The label → ranked image list mapping.
//!
//! Construction is split into two phases. A [`TagIndexBuilder`] accepts hits
//! in arrival order during indexing; [`TagIndexBuilder::finish`] sorts every
//! list and hands back an immutable [`TagIndex`] that query paths share
//! freely across threads.

mod builder;

pub use builder::TagIndexBuilder;

use serde::Serialize;
use std::collections::HashMap;

use crate::types::LabelHit;

/// Frozen, query-ready tag index.
///
/// Every hit list is sorted by non-increasing confidence. Ties keep the order
/// in which the hits were inserted, which follows the input image order.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    entries: HashMap<String, Vec<LabelHit>>,
}

/// One label with its ranked hits, borrowed from the index for export.
#[derive(Debug, Serialize)]
pub struct LabelRecord<'a> {
    pub label: &'a str,
    pub hits: &'a [LabelHit],
}

impl TagIndex {
    pub(crate) fn from_sorted(entries: HashMap<String, Vec<LabelHit>>) -> Self {
        Self { entries }
    }

    /// Up to `limit` image references for `label`, best first.
    ///
    /// An unknown label yields an empty list.
    pub fn lookup(&self, label: &str, limit: usize) -> Vec<&str> {
        self.hits(label)
            .iter()
            .take(limit)
            .map(|hit| hit.image.as_str())
            .collect()
    }

    /// All ranked hits for `label`, empty if the label is unknown.
    pub fn hits(&self, label: &str) -> &[LabelHit] {
        self.entries.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every label present in the index, in no particular order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Number of distinct labels.
    pub fn label_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of hits across all labels.
    pub fn hit_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels with their hits, ordered by label for stable output.
    pub fn records(&self) -> Vec<LabelRecord<'_>> {
        let mut records: Vec<LabelRecord<'_>> = self
            .entries
            .iter()
            .map(|(label, hits)| LabelRecord {
                label: label.as_str(),
                hits: hits.as_slice(),
            })
            .collect();
        records.sort_by(|a, b| a.label.cmp(b.label));
        records
    }
}
