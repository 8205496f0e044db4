/// Offset pagination over an already filtered and ordered result set
use crate::errors::{ApiError, ApiResult};
use std::collections::HashMap;

pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_OFFSET: usize = 0;

/// A validated `(limit, offset)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Read `limit` and `offset` from raw query parameters.
    ///
    /// Missing or empty values fall back to the defaults; negative or
    /// non-numeric values are rejected.
    pub fn from_params(params: &HashMap<String, String>) -> ApiResult<Self> {
        Ok(Self {
            limit: parse_bound(params, "limit", DEFAULT_LIMIT)?,
            offset: parse_bound(params, "offset", DEFAULT_OFFSET)?,
        })
    }
}

fn parse_bound(params: &HashMap<String, String>, key: &str, default: usize) -> ApiResult<usize> {
    let raw = match params.get(key).map(|s| s.trim()) {
        None | Some("") => return Ok(default),
        Some(raw) => raw,
    };

    let n = raw.parse::<i64>().map_err(|_| {
        ApiError::InvalidPagination(format!("{} must be an integer, got '{}'", key, raw))
    })?;
    if n < 0 {
        return Err(ApiError::InvalidPagination(format!(
            "{} must be >= 0, got {}",
            key, n
        )));
    }
    usize::try_from(n)
        .map_err(|_| ApiError::InvalidPagination(format!("{} is too large: {}", key, n)))
}

/// One page of results plus the size of the full set it was cut from
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Slice a page out of `ordered` without reordering it.
///
/// `total` is always the length of `ordered`, never the page size.
pub fn paginate<T>(ordered: Vec<T>, request: PageRequest) -> Page<T> {
    let total = ordered.len();
    let items = ordered
        .into_iter()
        .skip(request.offset)
        .take(request.limit)
        .collect();
    Page { items, total }
}
