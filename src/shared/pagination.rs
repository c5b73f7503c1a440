//! Pagination and list query parsing
//!
//! List endpoints accept `page`, `limit`, `sortBy` and `order` (plus post
//! filters) as raw query strings so that malformed values surface as field
//! validation errors instead of opaque extractor rejections.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{FieldError, SharedError};
use crate::shared::post::Category;

/// Largest page size a client may request
pub const MAX_LIMIT: u32 = 100;
/// Default page size for post listings
pub const DEFAULT_POST_LIMIT: u32 = 10;
/// Default page size for comment listings
pub const DEFAULT_COMMENT_LIMIT: u32 = 20;

/// Pagination block returned with every list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub pages: u64,
    pub limit: u32,
}

impl Pagination {
    pub fn new(total: u64, request: PageRequest) -> Self {
        Self {
            total,
            page: request.page,
            pages: total.div_ceil(u64::from(request.limit)),
            limit: request.limit,
        }
    }
}

/// A validated page window (page is 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Views,
    Likes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Post ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostSort {
    pub field: SortField,
    pub order: SortOrder,
    /// Pinned posts come before everything else
    pub pinned_first: bool,
}

impl PostSort {
    /// Newest first, no pinning
    pub fn newest() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
            pinned_first: false,
        }
    }
}

impl Default for PostSort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
            pinned_first: true,
        }
    }
}

/// Raw list query string
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Parsed `GET /api/posts` parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PostListParams {
    pub page: PageRequest,
    pub sort: PostSort,
    pub category: Option<Category>,
    pub author: Option<Uuid>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit.to_string());
        self
    }

    pub fn sort_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = Some(sort_field_name(field).to_string());
        self.order = Some(match order {
            SortOrder::Asc => "asc".to_string(),
            SortOrder::Desc => "desc".to_string(),
        });
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category.as_str().to_string());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn author(mut self, author: Uuid) -> Self {
        self.author = Some(author.to_string());
        self
    }

    /// Validate `page` and `limit`
    pub fn page_request(&self, default_limit: u32) -> Result<PageRequest, SharedError> {
        let mut errors = Vec::new();
        let page = self.parse_window(default_limit, &mut errors);
        finish(page, errors)
    }

    /// Validate every post listing parameter, reporting all failures at once
    pub fn post_params(&self) -> Result<PostListParams, SharedError> {
        let mut errors = Vec::new();
        let page = self.parse_window(DEFAULT_POST_LIMIT, &mut errors);

        let field = match self.sort_by.as_deref() {
            None => SortField::CreatedAt,
            Some("createdAt") => SortField::CreatedAt,
            Some("updatedAt") => SortField::UpdatedAt,
            Some("views") => SortField::Views,
            Some("likes") => SortField::Likes,
            Some(_) => {
                errors.push(FieldError::new("sortBy", "Invalid sort field"));
                SortField::CreatedAt
            }
        };
        let order = match self.order.as_deref() {
            None | Some("desc") => SortOrder::Desc,
            Some("asc") => SortOrder::Asc,
            Some(_) => {
                errors.push(FieldError::new("order", "Order must be asc or desc"));
                SortOrder::Desc
            }
        };

        let category = match non_blank(&self.category) {
            None => None,
            Some(raw) => match raw.parse::<Category>() {
                Ok(category) => Some(category),
                Err(_) => {
                    errors.push(FieldError::new("category", "Please choose a valid category"));
                    None
                }
            },
        };

        let author = match non_blank(&self.author) {
            None => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push(FieldError::new("author", "Not a valid ID"));
                    None
                }
            },
        };

        let params = PostListParams {
            page,
            sort: PostSort {
                field,
                order,
                pinned_first: field == SortField::CreatedAt,
            },
            category,
            author,
            search: non_blank(&self.search).map(str::to_string),
        };
        finish(params, errors)
    }

    fn parse_window(&self, default_limit: u32, errors: &mut Vec<FieldError>) -> PageRequest {
        let page = match non_blank(&self.page) {
            None => 1,
            Some(raw) => match raw.parse::<u32>() {
                Ok(page) if page >= 1 => page,
                _ => {
                    errors.push(FieldError::new("page", "Page must be an integer of at least 1"));
                    1
                }
            },
        };
        let limit = match non_blank(&self.limit) {
            None => default_limit,
            Some(raw) => match raw.parse::<u32>() {
                Ok(limit) if (1..=MAX_LIMIT).contains(&limit) => limit,
                _ => {
                    errors.push(FieldError::new("limit", "Limit must be an integer between 1 and 100"));
                    default_limit
                }
            },
        };
        PageRequest::new(page, limit)
    }
}

fn sort_field_name(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "createdAt",
        SortField::UpdatedAt => "updatedAt",
        SortField::Views => "views",
        SortField::Likes => "likes",
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn finish<T>(value: T, errors: Vec<FieldError>) -> Result<T, SharedError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(SharedError::validation_errors(errors))
    }
}
