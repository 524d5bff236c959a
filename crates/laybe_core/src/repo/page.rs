//! Page request/response shapes shared by both stores.
//!
//! # Invariants
//! - `page_size` must be positive; values above `MAX_PAGE_SIZE` are clamped.
//! - Ordering always ends with `id ASC`, so slices are stable across calls.

use super::{RepoError, RepoResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Sort direction for page queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Scalar field a page can be sorted by.
pub trait SortField: Copy {
    /// Backing column name. Must be a trusted identifier.
    fn column(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropositionSortField {
    #[default]
    Id,
    Type,
    Text,
    ConnectionType,
}

impl SortField for PropositionSortField {
    fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Type => "type",
            Self::Text => "text",
            Self::ConnectionType => "connection_type",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArgumentSortField {
    #[default]
    Id,
    Type,
}

impl SortField for ArgumentSortField {
    fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Type => "type",
        }
    }
}

/// Page selection: zero-based index, size, sort field and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<F> {
    pub page_index: u32,
    pub page_size: u32,
    pub sort: F,
    pub direction: SortDirection,
}

impl<F: SortField + Default> PageRequest<F> {
    /// Page sorted by `id` ascending.
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index,
            page_size,
            sort: F::default(),
            direction: SortDirection::Ascending,
        }
    }
}

impl<F: SortField + Default> Default for PageRequest<F> {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

impl<F: SortField> PageRequest<F> {
    /// Replaces sort field and direction.
    pub fn sorted_by(mut self, sort: F, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    /// Returns the applied page size after validation and clamping.
    pub fn effective_page_size(&self) -> RepoResult<u32> {
        if self.page_size == 0 {
            return Err(RepoError::InvalidPageRequest(
                "page_size must be greater than 0".to_string(),
            ));
        }
        Ok(self.page_size.min(MAX_PAGE_SIZE))
    }

    pub(crate) fn order_by_sql(&self) -> String {
        let column = self.sort.column();
        let direction = self.direction.as_sql();
        if column == "id" {
            format!("ORDER BY id {direction}")
        } else {
            format!("ORDER BY {column} {direction}, id ASC")
        }
    }

    pub(crate) fn offset(&self, page_size: u32) -> i64 {
        i64::from(self.page_index) * i64::from(page_size)
    }
}

/// One page slice plus the total count used for pagination headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_index: u32,
    /// Applied (clamped) page size.
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page_index) + 1 < self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ArgumentSortField, Page, PageRequest, PropositionSortField, SortDirection, MAX_PAGE_SIZE,
    };
    use crate::repo::RepoError;

    #[test]
    fn default_request_sorts_by_id_ascending() {
        let request = PageRequest::<PropositionSortField>::default();
        assert_eq!(request.page_index, 0);
        assert_eq!(request.order_by_sql(), "ORDER BY id ASC");
    }

    #[test]
    fn non_id_sort_appends_id_tie_break() {
        let request = PageRequest::new(1, 10)
            .sorted_by(PropositionSortField::Text, SortDirection::Descending);
        assert_eq!(request.order_by_sql(), "ORDER BY text DESC, id ASC");

        let request =
            PageRequest::new(0, 10).sorted_by(ArgumentSortField::Id, SortDirection::Descending);
        assert_eq!(request.order_by_sql(), "ORDER BY id DESC");
    }

    #[test]
    fn zero_page_size_is_rejected_and_large_sizes_are_clamped() {
        let zero = PageRequest::<ArgumentSortField>::new(0, 0);
        assert!(matches!(
            zero.effective_page_size(),
            Err(RepoError::InvalidPageRequest(_))
        ));

        let huge = PageRequest::<ArgumentSortField>::new(0, MAX_PAGE_SIZE + 1);
        assert_eq!(huge.effective_page_size().unwrap(), MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_uses_applied_page_size() {
        let request = PageRequest::<PropositionSortField>::new(2, 10);
        assert_eq!(request.offset(10), 20);
    }

    #[test]
    fn page_reports_total_pages_and_next() {
        let page = Page::<i64> {
            items: Vec::new(),
            total_count: 25,
            page_index: 1,
            page_size: 10,
        };
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());

        let last = Page::<i64> {
            page_index: 2,
            ..page
        };
        assert!(!last.has_next());
    }
}
