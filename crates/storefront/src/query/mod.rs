//! # List Queries
//!
//! Every listing page (products, blog posts, flashcard decks) is driven by the
//! same parameter bundle, [`ListQuery`], and the same pure function, [`run`].
//!
//! ## Pipeline
//!
//! 1. **Category**: exact match, unless the query asks for [`ALL_CATEGORIES`] (or is blank).
//! 2. **Search**: case-insensitive substring match against the entity's search fields.
//!    A blank search term matches everything.
//! 3. **Price**: inclusive `[price_min, price_max]`. An absent bound is open.
//!    Entities without a price (everything but products) skip this step.
//! 4. **Sort**: stable sort by [`SortKey`]. `Unsorted` keeps collection order.
//! 5. **Paginate**: `items[(page-1)*page_size .. page*page_size]`.
//!
//! ## Permissiveness
//!
//! Nothing is clamped. A page past the end yields an empty `items` but keeps the
//! real `total`; `price_min > price_max` simply matches nothing.
//!
//! [`run`] has no side effects. Latency, errors and caching are layered on top
//! by [`crate::executor`] and [`crate::cache`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

use crate::model::Entity;

pub mod params;

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "all";

pub const DEFAULT_PAGE_SIZE: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// `created_at` descending.
    Newest,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    /// Collection order.
    #[default]
    #[serde(rename = "none")]
    Unsorted,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::RatingDesc => "rating-desc",
            Self::Unsorted => "none",
        }
    }

    /// Unknown keys leave the order unchanged rather than failing.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "price-asc" | "price_asc" => Ok(Self::PriceAsc),
            "price-desc" | "price_desc" => Ok(Self::PriceDesc),
            "rating-desc" | "rating_desc" | "rating" => Ok(Self::RatingDesc),
            "" | "none" => Ok(Self::Unsorted),
            other => Err(format!("Unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: String,
    pub search: String,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub sort: SortKey,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search: String::new(),
            price_min: None,
            price_max: None,
            sort: SortKey::Unsorted,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Pages are 1-based; 0 is bumped to 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn matches_all_categories(&self) -> bool {
        let category = self.category.trim();
        category.is_empty() || category == ALL_CATEGORIES
    }

    /// Canonical string used as the result-cache key.
    /// Two queries that would produce the same page produce the same key.
    pub fn cache_key(&self) -> String {
        let category = if self.matches_all_categories() {
            ALL_CATEGORIES
        } else {
            self.category.as_str()
        };
        let bound = |b: Option<f64>| b.map(|v| v.to_string()).unwrap_or_default();
        form_urlencoded::Serializer::new(String::new())
            .append_pair("category", category)
            .append_pair("search", &self.search.trim().to_lowercase())
            .append_pair("min", &bound(self.price_min))
            .append_pair("max", &bound(self.price_max))
            .append_pair("sort", self.sort.as_str())
            .append_pair("page", &self.page.max(1).to_string())
            .append_pair("size", &self.page_size.max(1).to_string())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<E> {
    pub items: Vec<E>,
    /// Count after filtering, before pagination.
    pub total: usize,
    pub page: u32,
    pub total_pages: u32,
}

impl<E> QueryResult<E> {
    pub fn empty(query: &ListQuery) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: query.page,
            total_pages: 0,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Filter, sort and paginate `collection` according to `query`.
pub fn run<E: Entity>(collection: &[E], query: &ListQuery) -> QueryResult<E> {
    let needle = query.search.trim().to_lowercase();

    let mut matched: Vec<&E> = collection
        .iter()
        .filter(|e| matches_category(*e, query))
        .filter(|e| matches_search(*e, &needle))
        .filter(|e| matches_price(*e, query))
        .collect();

    sort_entities(&mut matched, query.sort);

    let total = matched.len();
    let page_size = query.page_size.max(1) as usize;
    let start = (query.page.max(1) as usize - 1).saturating_mul(page_size);

    let items = matched
        .into_iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();

    QueryResult {
        items,
        total,
        page: query.page,
        total_pages: total.div_ceil(page_size) as u32,
    }
}

fn matches_category<E: Entity>(entity: &E, query: &ListQuery) -> bool {
    query.matches_all_categories() || entity.category() == query.category
}

fn matches_search<E: Entity>(entity: &E, needle: &str) -> bool {
    needle.is_empty()
        || entity
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

fn matches_price<E: Entity>(entity: &E, query: &ListQuery) -> bool {
    let Some(price) = entity.price() else {
        return true;
    };
    query.price_min.map_or(true, |min| price >= min)
        && query.price_max.map_or(true, |max| price <= max)
}

/// Stable sort; entities missing the sort field go last in either direction.
fn sort_entities<E: Entity>(items: &mut [&E], sort: SortKey) {
    match sort {
        SortKey::Newest => items.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
        SortKey::PriceAsc => items.sort_by(|a, b| compare_optional(a.price(), b.price(), false)),
        SortKey::PriceDesc => items.sort_by(|a, b| compare_optional(a.price(), b.price(), true)),
        SortKey::RatingDesc => {
            items.sort_by(|a, b| compare_optional(a.rating(), b.rating(), true))
        }
        SortKey::Unsorted => {}
    }
}

fn compare_optional(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
