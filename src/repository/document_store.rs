// ==========================================
// Appliance Registry - Document store trait
// ==========================================
// Responsibility: collection-scoped document access
// Implementor: SqliteDocumentStore (one table per collection)
// Rule: the store never rewrites createdAt on update
// ==========================================

use crate::domain::document::{Document, Filter};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

/// Page window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Page {
    /// 1-based page number; page 0 is treated as page 1
    pub fn of(page: u64, limit: u64) -> Self {
        Self {
            skip: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }

    /// Every match; the limit stays within SQLite's signed range
    pub fn all() -> Self {
        Self {
            skip: 0,
            limit: i64::MAX as u64,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::of(1, 10)
    }
}

// ==========================================
// DocumentStore Trait
// ==========================================
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// First document matching `filter`
    async fn find_one(&self, collection: &str, filter: &Filter) -> RepositoryResult<Option<Document>>;

    /// Documents matching `filter`, newest (createdAt) first
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        page: Page,
    ) -> RepositoryResult<Vec<Document>>;

    /// Documents where any of `fields` contains `text` (case-insensitive),
    /// newest (createdAt) first
    async fn search(
        &self,
        collection: &str,
        fields: &[&str],
        text: &str,
        page: Page,
    ) -> RepositoryResult<Vec<Document>>;

    /// Total number of `search` matches across all pages
    async fn count_matching(&self, collection: &str, fields: &[&str], text: &str) -> RepositoryResult<u64>;

    /// Inserts a document; returns the assigned `_id`
    async fn insert(&self, collection: &str, document: Document) -> RepositoryResult<String>;

    /// Sets `changes` on the first match, leaving `createdAt` and `_id` alone
    ///
    /// # Returns
    /// - true: a document matched and was updated
    /// - false: nothing matched
    async fn update_fields(
        &self,
        collection: &str,
        filter: &Filter,
        changes: Document,
    ) -> RepositoryResult<bool>;

    async fn count(&self, collection: &str) -> RepositoryResult<u64>;

    /// Deletes the first match; returns whether anything was deleted
    async fn delete_one(&self, collection: &str, filter: &Filter) -> RepositoryResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window() {
        assert_eq!(Page::of(1, 10), Page { skip: 0, limit: 10 });
        assert_eq!(Page::of(3, 25), Page { skip: 50, limit: 25 });
        assert_eq!(Page::of(0, 10).skip, 0);
    }
}
