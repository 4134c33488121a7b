//! Query-string codec for [`FilterState`].
//!
//! The encoded query string is the bookmarkable form of the list state, so the
//! key names and encodings here are a stable external contract:
//!
//! | Key         | Field       | Encoding                                   |
//! |-------------|-------------|--------------------------------------------|
//! | `search`    | `search`    | percent-escaped text                       |
//! | `category`  | `category`  | percent-escaped text                       |
//! | `tags`      | `tags`      | comma-joined, each member escaped          |
//! | `steps`     | `min_steps` | decimal integer                            |
//! | `sortBy`    | `sort_by`   | `PREPTIME`, `COOKTIME`, `STEPS`, `DATE`    |
//! | `sortOrder` | `sort_order`| `asc`, `desc`                              |
//! | `page`      | `page`      | decimal integer, omitted when 1            |
//! | `limit`     | `limit`     | decimal integer, omitted when the default  |
//!
//! Keys are always written in the order above and default values are left
//! out, so `encode(decode(s))` is a fixed point.

use std::borrow::Cow;

use crate::filter::{DEFAULT_PAGE_LIMIT, FilterState, MAX_PAGE_LIMIT};

pub const KEY_SEARCH: &str = "search";
pub const KEY_CATEGORY: &str = "category";
pub const KEY_TAGS: &str = "tags";
pub const KEY_STEPS: &str = "steps";
pub const KEY_SORT_BY: &str = "sortBy";
pub const KEY_SORT_ORDER: &str = "sortOrder";
pub const KEY_PAGE: &str = "page";
pub const KEY_LIMIT: &str = "limit";

/// Encode a filter state as a query string (without the leading `?`).
pub fn encode(filter: &FilterState) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    if !filter.search.is_empty() {
        pairs.push((KEY_SEARCH, escape(&filter.search)));
    }
    if !filter.category.is_empty() {
        pairs.push((KEY_CATEGORY, escape(&filter.category)));
    }
    if !filter.tags.is_empty() {
        let joined = filter
            .tags
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| escape(t))
            .collect::<Vec<_>>()
            .join(",");
        if !joined.is_empty() {
            pairs.push((KEY_TAGS, joined));
        }
    }
    if let Some(steps) = filter.min_steps {
        pairs.push((KEY_STEPS, steps.to_string()));
    }
    if let Some(by) = filter.sort_by {
        pairs.push((KEY_SORT_BY, by.as_str().to_string()));
    }
    if let Some(order) = filter.sort_order {
        pairs.push((KEY_SORT_ORDER, order.as_str().to_string()));
    }
    if filter.page > 1 {
        pairs.push((KEY_PAGE, filter.page.to_string()));
    }
    if filter.limit != DEFAULT_PAGE_LIMIT {
        pairs.push((KEY_LIMIT, filter.limit.to_string()));
    }

    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a query string into a filter state.
///
/// Never fails: unknown keys are ignored, malformed values fall back to their
/// defaults, and a leading `?` is accepted.
pub fn decode(query: &str) -> FilterState {
    let mut filter = FilterState::default();
    let query = query.strip_prefix('?').unwrap_or(query);

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = unescape(raw_key);

        match key.as_ref() {
            KEY_SEARCH => filter.search = unescape(raw_value).into_owned(),
            KEY_CATEGORY => filter.category = unescape(raw_value).into_owned(),
            KEY_TAGS => {
                // Split before unescaping: an escaped comma belongs to the tag.
                filter.tags = raw_value
                    .split(',')
                    .map(|segment| unescape(segment).into_owned())
                    .filter(|tag| !tag.is_empty())
                    .collect();
            }
            KEY_STEPS => filter.min_steps = unescape(raw_value).trim().parse().ok(),
            KEY_SORT_BY => filter.sort_by = unescape(raw_value).parse().ok(),
            KEY_SORT_ORDER => filter.sort_order = unescape(raw_value).parse().ok(),
            KEY_PAGE => filter.page = decode_page(&unescape(raw_value)),
            KEY_LIMIT => filter.limit = decode_limit(&unescape(raw_value)),
            _ => {}
        }
    }

    if filter.sort_by.is_some() && filter.sort_order.is_none() {
        filter.sort_order = Some(Default::default());
    }

    filter
}

fn decode_page(value: &str) -> u32 {
    match value.trim().parse::<i64>() {
        Ok(page) if page >= 1 => u32::try_from(page).unwrap_or(u32::MAX),
        _ => 1,
    }
}

fn decode_limit(value: &str) -> u32 {
    match value.trim().parse::<i64>() {
        Ok(limit) if limit > 0 => u32::try_from(limit.min(i64::from(MAX_PAGE_LIMIT)))
            .unwrap_or(MAX_PAGE_LIMIT),
        _ => DEFAULT_PAGE_LIMIT,
    }
}

fn escape(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Percent-decode a query component, treating `+` as a space. Invalid UTF-8
/// sequences are replaced rather than rejected.
fn unescape(value: &str) -> Cow<'_, str> {
    if !value.contains(['%', '+']) {
        return Cow::Borrowed(value);
    }
    let spaced = value.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}
