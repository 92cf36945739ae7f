//! Generic list view: search, filter, sort and paginate.
//!
//! Every resource list in the API goes through [`apply_list_query`]; a
//! resource only has to describe which text is searchable and how to
//! produce a sort value for each key it supports.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::error::CoreError;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 200;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// Query string accepted by every list and export endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring search.
    pub q: Option<String>,
    /// Sort key; must be one of the resource's [`Listable::SORT_KEYS`].
    pub sort: Option<String>,
    #[serde(default)]
    pub dir: SortDir,
    /// 1-based page number.
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Exact match on the resource's status, when it has one.
    pub status: Option<String>,
    /// Exact match on the resource's category, when it has one.
    pub category: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Comparable value extracted from a record for sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Missing,
}

impl SortValue {
    /// Text sorts case-insensitively.
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_lowercase())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        value.map(Self::text).unwrap_or(Self::Missing)
    }

    pub fn number(value: impl Into<f64>) -> Self {
        Self::Number(value.into())
    }

    pub fn opt_number<N: Into<f64>>(value: Option<N>) -> Self {
        value.map(Self::number).unwrap_or(Self::Missing)
    }

    /// Timestamps sort by epoch milliseconds.
    pub fn time(value: crate::types::Timestamp) -> Self {
        Self::Number(value.timestamp_millis() as f64)
    }

    /// Missing values sort after everything else in ascending order.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Missing, Self::Missing) => Ordering::Equal,
            (Self::Missing, _) => Ordering::Greater,
            (_, Self::Missing) => Ordering::Less,
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

/// A record that can be listed through [`apply_list_query`].
pub trait Listable {
    /// Keys accepted by `?sort=`.
    const SORT_KEYS: &'static [&'static str];

    /// Text fields searched by `?q=`.
    fn search_fields(&self) -> Vec<&str>;

    /// Sort value for one of [`Self::SORT_KEYS`].
    fn sort_value(&self, key: &str) -> SortValue;

    fn status(&self) -> Option<&str> {
        None
    }

    fn category(&self) -> Option<&str> {
        None
    }
}

/// One page of a filtered, sorted list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Number of records after filtering, before pagination.
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

/// Filter and sort without paginating. Used directly by exports.
pub fn filter_and_sort<T: Listable>(items: Vec<T>, query: &ListQuery) -> Result<Vec<T>, CoreError> {
    if let Some(key) = query.sort.as_deref() {
        if !T::SORT_KEYS.contains(&key) {
            return Err(CoreError::Validation(format!(
                "Invalid sort key '{key}'. Must be one of: {}",
                T::SORT_KEYS.join(", ")
            )));
        }
    }

    let needle = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut items: Vec<T> = items
        .into_iter()
        .filter(|item| match &needle {
            Some(n) => item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(n.as_str())),
            None => true,
        })
        .filter(|item| match query.status.as_deref() {
            Some(s) => item.status() == Some(s),
            None => true,
        })
        .filter(|item| match query.category.as_deref() {
            Some(c) => item.category() == Some(c),
            None => true,
        })
        .collect();

    if let Some(key) = query.sort.as_deref() {
        // Stable sort keeps the repository order for ties.
        items.sort_by(|a, b| {
            let ord = a.sort_value(key).compare(&b.sort_value(key));
            match query.dir {
                SortDir::Asc => ord,
                SortDir::Desc => ord.reverse(),
            }
        });
    }

    Ok(items)
}

/// Filter, sort and cut out the requested page.
pub fn apply_list_query<T: Listable>(items: Vec<T>, query: &ListQuery) -> Result<ListPage<T>, CoreError> {
    let filtered = filter_and_sort(items, query)?;
    let total = filtered.len();
    let page = query.page();
    let page_size = query.page_size();
    let skip = (page as usize - 1).saturating_mul(page_size as usize);

    let items = filtered
        .into_iter()
        .skip(skip)
        .take(page_size as usize)
        .collect();

    Ok(ListPage {
        items,
        total,
        page,
        page_size,
    })
}
