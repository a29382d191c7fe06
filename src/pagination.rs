//! Page-number pagination for the list endpoints.
//!
//! Pagination only kicks in when the request carries a non-empty `page`
//! parameter. Without it the list endpoints answer with a bare array.

use axum::http::Uri;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

pub const PAGE_PARAM: &str = "page";
pub const PER_PAGE_PARAM: &str = "per_page";
pub const DEFAULT_PER_PAGE: i64 = 2;
pub const MAX_PER_PAGE: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-indexed.
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// `None` when pagination was not requested.
    ///
    /// A `page` that is not a positive integer falls back to the first page.
    /// `per_page` falls back to the default when missing or not positive and
    /// is clamped to [`MAX_PER_PAGE`].
    pub fn from_params(params: &HashMap<String, String>) -> Option<Self> {
        let raw_page = params.get(PAGE_PARAM).filter(|v| !v.is_empty())?;

        let page = raw_page
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|p| *p > 0)
            .unwrap_or(1);

        let per_page = params
            .get(PER_PAGE_PARAM)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map(|n| n.min(MAX_PER_PAGE))
            .unwrap_or(DEFAULT_PER_PAGE);

        Some(PageRequest { page, per_page })
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn has_next(&self, count: i64) -> bool {
        self.page.saturating_mul(self.per_page) < count
    }
}

/// Response envelope for a paginated listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(request: PageRequest, count: i64, results: Vec<T>, base_url: &str, uri: &Uri) -> Self {
        let next = request
            .has_next(count)
            .then(|| page_link(base_url, uri, Some(request.page + 1)));

        let previous = match request.page {
            1 => None,
            // the first page is linked without an explicit page number
            2 => Some(page_link(base_url, uri, None)),
            page => Some(page_link(base_url, uri, Some(page - 1))),
        };

        Page {
            count,
            next,
            previous,
            results,
        }
    }
}

/// A list endpoint's answer: the bare array, or one page of it.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Listing<T> {
    All(Vec<T>),
    Paged(Page<T>),
}

/// Absolute link to the current path with `page` replaced (or removed).
///
/// Other parameters keep their original encoding and are ordered by name.
fn page_link(base_url: &str, uri: &Uri, page: Option<i64>) -> String {
    let mut pairs: Vec<(String, String)> = uri
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let key = segment.split('=').next().unwrap_or("");
            (key.to_string(), segment.to_string())
        })
        .filter(|(key, _)| key != PAGE_PARAM)
        .collect();

    if let Some(page) = page {
        pairs.push((PAGE_PARAM.to_string(), format!("{}={}", PAGE_PARAM, page)));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let query = pairs
        .into_iter()
        .map(|(_, segment)| segment)
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        format!("{}{}", base_url, uri.path())
    } else {
        format!("{}{}?{}", base_url, uri.path(), query)
    }
}
