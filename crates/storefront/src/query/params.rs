//! Page parameters: a URL query string in, a [`ListQuery`] and [`TestFlags`] out.
//!
//! Parsing never fails. Unknown keys are ignored and malformed numbers fall
//! back to the defaults, so a hand-edited URL still renders a page.

use url::form_urlencoded;

use super::{ListQuery, SortKey};
use crate::simulate::TestFlags;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageParams {
    pub query: ListQuery,
    pub flags: TestFlags,
}

/// Parse `input` (with or without a leading `?`) over the default query.
///
/// The `force*` flags are only honoured when `dev_toggles` is set; otherwise
/// they are dropped silently.
pub fn parse(input: &str, dev_toggles: bool) -> PageParams {
    parse_over(input, ListQuery::default(), dev_toggles)
}

/// Like [`parse`], but keys absent from `input` keep their value from `base`.
pub fn parse_over(input: &str, base: ListQuery, dev_toggles: bool) -> PageParams {
    let raw = input.trim().trim_start_matches('?');
    let mut query = base;
    let mut flags = TestFlags::default();

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        let value = value.trim();
        match key.as_ref() {
            "page" => {
                if let Some(page) = parse_positive(value) {
                    query.page = page;
                }
            }
            "limit" | "pageSize" => {
                if let Some(size) = parse_positive(value) {
                    query.page_size = size;
                }
            }
            "category" | "categoryId" => query.category = value.to_string(),
            "search" | "q" => query.search = value.to_string(),
            "sort" => query.sort = SortKey::parse_lenient(value),
            "minPrice" => query.price_min = parse_price(value),
            "maxPrice" => query.price_max = parse_price(value),
            "forceError" if dev_toggles => flags.force_error = is_truthy(value),
            "forceEmpty" if dev_toggles => flags.force_empty = is_truthy(value),
            "forceSlow" if dev_toggles => flags.force_slow = is_truthy(value),
            _ => {}
        }
    }

    PageParams { query, flags }
}

/// Render a query back to a canonical query string. Default values are omitted.
pub fn to_query_string(query: &ListQuery) -> String {
    let defaults = ListQuery::default();
    let mut out = form_urlencoded::Serializer::new(String::new());

    if query.page != defaults.page {
        out.append_pair("page", &query.page.to_string());
    }
    if query.page_size != defaults.page_size {
        out.append_pair("limit", &query.page_size.to_string());
    }
    if !query.matches_all_categories() {
        out.append_pair("category", &query.category);
    }
    if !query.search.trim().is_empty() {
        out.append_pair("search", query.search.trim());
    }
    if query.sort != SortKey::Unsorted {
        out.append_pair("sort", query.sort.as_str());
    }
    if let Some(min) = query.price_min {
        out.append_pair("minPrice", &min.to_string());
    }
    if let Some(max) = query.price_max {
        out.append_pair("maxPrice", &max.to_string());
    }
    out.finish()
}

fn parse_positive(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|n| *n >= 1)
}

fn parse_price(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|p| p.is_finite())
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "yes" | "")
}
