//! Deduplicating annotation cache.

use crate::site::{SiteAnnotation, SiteRecord};
use std::collections::HashMap;

/// Append-only cache of site annotations keyed by site id.
///
/// The cache never holds two entries with the same id and never updates an
/// entry in place: if a later batch carries a known id with different
/// fields, the first cached copy silently wins. Merging is therefore
/// idempotent and commutative per id, which is what lets fetch completions
/// apply in completion order without coordination.
#[derive(Debug, Default)]
pub struct AnnotationCache {
    entries: HashMap<String, SiteAnnotation>,
}

impl AnnotationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a batch of records, returning only the annotations that were
    /// actually added (ids not previously cached).
    ///
    /// Duplicate ids inside the batch collapse to their first occurrence.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = SiteRecord>) -> Vec<SiteAnnotation> {
        let mut accepted = Vec::new();

        for record in incoming {
            if self.entries.contains_key(&record.id) {
                continue;
            }
            let annotation = SiteAnnotation::from_record(record);
            self.entries
                .insert(annotation.id().to_string(), annotation.clone());
            accepted.push(annotation);
        }

        accepted
    }

    /// Look up an annotation by site id.
    pub fn get(&self, id: &str) -> Option<&SiteAnnotation> {
        self.entries.get(id)
    }

    /// Check whether a site id is already cached.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of cached annotations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over cached annotations in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SiteAnnotation> {
        self.entries.values()
    }
}
