//! Generic pagination query contract for list endpoints
//!
//! Query parameters arrive as strings (`?offset=10&limit=25`). The schema keeps
//! them as numeric strings with bounds, the same way the server checks them,
//! and [`PaginationQuery`] is the typed result once they validate.

use super::forms::{FieldSpec, FormSchema, FormValues, NumberBound, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

pub const SORT_KEYS: &[&str] = &["id"];
pub const ORDER_KEYS: &[&str] = &["asc", "desc"];

pub const DEFAULT_OFFSET: &str = "0";
pub const DEFAULT_LIMIT: &str = "50";

pub fn pagination_schema() -> Arc<FormSchema> {
    static SCHEMA: OnceLock<Arc<FormSchema>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            Arc::new(
                FormSchema::new("pagination")
                    .field(FieldSpec::text("q", "Search query").optional())
                    .field(FieldSpec::text("sort", "Sort by").one_of(SORT_KEYS).default_value("id"))
                    .field(
                        FieldSpec::text("order", "Sort order")
                            .one_of(ORDER_KEYS)
                            .default_value("asc"),
                    )
                    .field(
                        FieldSpec::text("offset", "Offset")
                            .default_value(DEFAULT_OFFSET)
                            .number(
                                NumberBound::AtLeast(0.0),
                                "Must be a number greater than or equal to 0",
                            ),
                    )
                    .field(
                        FieldSpec::text("limit", "Limit")
                            .default_value(DEFAULT_LIMIT)
                            .number(NumberBound::GreaterThan(0.0), "Must be a number greater than 0"),
                    ),
            )
        })
        .clone()
}

/// Sort key for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Id,
}

impl SortKey {
    pub fn as_key(self) -> &'static str {
        match self {
            SortKey::Id => "id",
        }
    }
}

/// Sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

/// Raw query parameters as received, every key optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPaginationQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl RawPaginationQuery {
    /// Fill defaults for absent keys, then validate. A blank number counts
    /// as zero.
    pub fn validate(&self) -> Result<PaginationQuery, ValidationErrors> {
        let schema = pagination_schema();
        let mut values = schema.defaults();
        for (name, raw) in [
            ("q", &self.q),
            ("sort", &self.sort),
            ("order", &self.order),
            ("offset", &self.offset),
            ("limit", &self.limit),
        ] {
            match raw {
                Some(raw) if is_count(name) && raw.trim().is_empty() => values.set(name, "0"),
                Some(raw) => values.set(name, raw.as_str()),
                None => {}
            }
        }
        schema.validate(&values)?;
        Ok(PaginationQuery::from_validated(&values))
    }
}

/// Validated pagination query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationQuery {
    pub q: Option<String>,
    pub sort: SortKey,
    pub order: SortOrder,
    pub offset: u64,
    pub limit: u64,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            q: None,
            sort: SortKey::Id,
            order: SortOrder::Asc,
            offset: 0,
            limit: 50,
        }
    }
}

impl PaginationQuery {
    fn from_validated(values: &FormValues) -> Self {
        let order = match values.text("order") {
            "desc" => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        Self {
            q: values.optional_text("q"),
            sort: SortKey::Id,
            order,
            offset: parse_count(values.text("offset")),
            limit: parse_count(values.text("limit")).max(1),
        }
    }

    /// Move to the next page
    pub fn next_page(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            ..self.clone()
        }
    }

    /// Move to the previous page, stopping at the first
    pub fn prev_page(&self) -> Self {
        Self {
            offset: self.offset.saturating_sub(self.limit),
            ..self.clone()
        }
    }

    /// 1-based page number for display
    pub fn page_number(&self) -> u64 {
        self.offset / self.limit.max(1) + 1
    }

    /// Query pairs for a list request
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        pairs.push(("sort", self.sort.as_key().to_string()));
        pairs.push(("order", self.order.as_key().to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

fn is_count(name: &str) -> bool {
    matches!(name, "offset" | "limit")
}

/// Numeric strings passed validation; fractions are truncated
fn parse_count(text: &str) -> u64 {
    text.trim()
        .parse::<f64>()
        .map(|n| n.max(0.0).trunc() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn raw(offset: Option<&str>, limit: Option<&str>) -> RawPaginationQuery {
        RawPaginationQuery {
            offset: offset.map(str::to_string),
            limit: limit.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_unspecified_query_uses_defaults() {
        let query = RawPaginationQuery::default().validate().unwrap();
        assert_eq!(query, PaginationQuery::default());
        assert_eq!(query.sort, SortKey::Id);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, 50);
    }

    #[test]
    fn test_limit_must_be_positive() {
        for bad in ["0", "-5", "abc"] {
            let errors = raw(None, Some(bad)).validate().unwrap_err();
            assert_eq!(errors.first("limit"), Some("Must be a number greater than 0"));
            assert!(!errors.contains("offset"));
        }
    }

    #[test]
    fn test_offset_must_not_be_negative() {
        let errors = raw(Some("-1"), None).validate().unwrap_err();
        assert_eq!(
            errors.first("offset"),
            Some("Must be a number greater than or equal to 0")
        );
    }

    #[test]
    fn test_unknown_sort_and_order_rejected() {
        let query = RawPaginationQuery {
            sort: Some("name".to_string()),
            order: Some("up".to_string()),
            ..Default::default()
        };
        let errors = query.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["order", "sort"]);
    }

    #[test]
    fn test_desc_order_and_search() {
        let query = RawPaginationQuery {
            q: Some("acme".to_string()),
            order: Some("desc".to_string()),
            offset: Some("100".to_string()),
            limit: Some("25".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("q", "acme".to_string()),
                ("sort", "id".to_string()),
                ("order", "desc".to_string()),
                ("offset", "100".to_string()),
                ("limit", "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_deserializes_from_query_json() {
        let raw: RawPaginationQuery = serde_json::from_str(r#"{"limit": "10"}"#).unwrap();
        assert_eq!(raw.validate().unwrap().limit, 10);
    }

    #[test]
    fn test_paging() {
        let first = PaginationQuery {
            limit: 10,
            ..Default::default()
        };
        let second = first.next_page();
        assert_eq!(second.offset, 10);
        assert_eq!(second.page_number(), 2);
        assert_eq!(second.prev_page().offset, 0);
        assert_eq!(first.prev_page().offset, 0);
    }

    #[test]
    fn test_blank_offset_is_zero() {
        let query = raw(Some(""), Some("20")).validate().unwrap();
        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, 20);

        let errors = raw(None, Some(" ")).validate().unwrap_err();
        assert_eq!(errors.first("limit"), Some("Must be a number greater than 0"));
    }

    #[test]
    fn test_next_page_saturates() {
        let last = PaginationQuery {
            offset: u64::MAX - 5,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(last.next_page().offset, u64::MAX);
    }

    proptest! {
        #[test]
        fn limit_validity_follows_sign(limit in -1000_i64..1000_i64) {
            let result = raw(None, Some(&limit.to_string())).validate();
            prop_assert_eq!(result.is_ok(), limit > 0);
        }

        #[test]
        fn offset_validity_follows_sign(offset in -1000_i64..1000_i64) {
            let result = raw(Some(&offset.to_string()), None).validate();
            prop_assert_eq!(result.is_ok(), offset >= 0);
        }
    }
}
