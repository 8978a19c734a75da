//! Interactive narrowing of the catalog.

use super::{Catalog, CatalogEntry};

/// Whether `entry` matches the search `query`.
///
/// An empty query matches everything; otherwise the query must appear in
/// the identifier, ignoring case.
pub fn matches(entry: &CatalogEntry, query: &str) -> bool {
    query.is_empty()
        || entry
            .identifier()
            .to_lowercase()
            .contains(&query.to_lowercase())
}

impl Catalog {
    /// Entries matching `query`, in catalog order.
    ///
    /// Always evaluated over the whole catalog, so widening a query brings
    /// entries back.
    pub fn filter(&self, query: &str) -> Vec<&CatalogEntry> {
        self.iter().filter(|entry| matches(entry, query)).collect()
    }
}
