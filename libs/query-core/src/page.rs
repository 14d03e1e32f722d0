use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::request::{PageDataRequest, SortDirection};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }
}

/// Offset pagination directive handed to the executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Append `field` ascending unless the sort already mentions it.
    pub fn ensure_tiebreaker(mut self, field: &str) -> Self {
        if !self.sort.iter().any(|o| o.field == field) {
            self.sort.push(SortOrder::asc(field));
        }
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    pub default: u64,
    pub max: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default: 50,
            max: 1000,
        }
    }
}

impl PageLimits {
    pub fn clamp(&self, size: u64) -> u64 {
        let size = if size == 0 { self.default } else { size };
        size.clamp(1, self.max.max(1))
    }
}

/// Builds [`PageRequest`]s for one entity.
#[derive(Clone, Debug)]
pub struct PageRequestBuilder {
    identity: String,
    limits: PageLimits,
}

impl PageRequestBuilder {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            limits: PageLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sort fields require a direction; no sort fields means ascending by identity.
    pub fn build(
        &self,
        page: u64,
        size: u64,
        sort_fields: &[String],
        direction: Option<SortDirection>,
    ) -> CompileResult<PageRequest> {
        let sort = if sort_fields.is_empty() {
            vec![SortOrder::asc(&self.identity)]
        } else {
            let direction = direction.ok_or(CompileError::MissingDirection)?;
            sort_fields
                .iter()
                .map(|field| SortOrder {
                    field: field.clone(),
                    direction,
                })
                .collect()
        };
        let size = self.limits.clamp(size);
        // executors multiply page by size unchecked and bind the offset as i64
        if page.checked_mul(size).map_or(true, |offset| offset > i64::MAX as u64) {
            return Err(CompileError::invalid_request("page", "offset out of range"));
        }
        Ok(PageRequest { page, size, sort })
    }

    pub fn from_request(&self, req: &PageDataRequest) -> CompileResult<PageRequest> {
        self.build(req.page, req.size, req.sort_fields(), req.sort_direction)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }
}
