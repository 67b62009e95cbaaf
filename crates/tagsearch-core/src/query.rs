//! Read-only queries over a finished [`TagIndex`].
//!
//! The service owns nothing but a shared handle to the index and the result
//! cap. Unknown labels are not errors: they produce an empty answer.

use std::sync::Arc;

use crate::index::TagIndex;

/// Default number of images returned per search.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Search and label listing over a shared index.
#[derive(Debug, Clone)]
pub struct QueryService {
    index: Arc<TagIndex>,
    limit: usize,
}

impl QueryService {
    pub fn new(index: Arc<TagIndex>, limit: usize) -> Self {
        Self { index, limit }
    }

    /// Top-ranked image references for `label`, at most `limit` of them.
    pub fn search_refs(&self, label: &str) -> Vec<&str> {
        self.index.lookup(label, self.limit)
    }

    /// Comma-joined top-ranked image references; empty if the label is unknown.
    pub fn search(&self, label: &str) -> String {
        self.search_refs(label).join(",")
    }

    /// All known labels, sorted so autocomplete output is stable.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.index.labels().collect();
        labels.sort_unstable();
        labels
    }

    /// Comma-joined list of every known label.
    pub fn fetch_tags(&self) -> String {
        self.labels().join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TagIndexBuilder;
    use crate::types::LabelHit;

    fn service(limit: usize) -> QueryService {
        let mut builder = TagIndexBuilder::new();
        builder.insert("cat", LabelHit::new("a", 0.9));
        builder.insert("cat", LabelHit::new("b", 0.4));
        builder.insert("dog", LabelHit::new("b", 0.7));
        builder.insert("cat", LabelHit::new("c", 0.99));
        for i in 0..15 {
            builder.insert("sky", LabelHit::new(format!("s{i:02}"), 1.0 - i as f64 / 100.0));
        }
        QueryService::new(Arc::new(builder.finish(None)), limit)
    }

    #[test]
    fn test_search_joins_ranked_refs() {
        let service = service(DEFAULT_SEARCH_LIMIT);
        assert_eq!(service.search("cat"), "c,a,b");
        assert_eq!(service.search("dog"), "b");
    }

    #[test]
    fn test_search_unknown_label_is_empty_string() {
        let service = service(DEFAULT_SEARCH_LIMIT);
        assert_eq!(service.search("bird"), "");
        assert_eq!(service.search(""), "");
    }

    #[test]
    fn test_search_caps_results() {
        let service = service(DEFAULT_SEARCH_LIMIT);
        let refs = service.search_refs("sky");
        assert_eq!(refs.len(), 10);
        assert_eq!(refs[0], "s00");
        assert_eq!(refs[9], "s09");
    }

    #[test]
    fn test_fetch_tags_lists_every_label() {
        let service = service(DEFAULT_SEARCH_LIMIT);
        assert_eq!(service.fetch_tags(), "cat,dog,sky");
        assert_eq!(service.labels(), vec!["cat", "dog", "sky"]);
    }

    #[test]
    fn test_fetch_tags_empty_index() {
        let service = QueryService::new(Arc::new(TagIndex::default()), 10);
        assert_eq!(service.fetch_tags(), "");
        assert_eq!(service.search("cat"), "");
    }

    #[test]
    fn test_concurrent_readers() {
        let service = service(DEFAULT_SEARCH_LIMIT);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                std::thread::spawn(move || service.search("cat"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "c,a,b");
        }
    }
}
