//! Request and response types for `POST /site-list/v2/sites/query`.
//!
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.
//! Optional request fields are skipped entirely when unset, so the wire
//! body never carries `null` placeholders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ── Request ──────────────────────────────────────────────────────────

/// Sort direction accepted by Wix query endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(format!("expected 'ASC' or 'DESC', got '{other}'")),
        }
    }
}

/// One sort criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sorting {
    pub field_name: String,
    #[serde(default)]
    pub order: SortOrder,
}

/// Cursor-based paging window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPaging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Body of a site-list query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySitesRequest {
    /// Wix filter expression, passed through opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<Sorting>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_paging: Option<CursorPaging>,
}

impl QuerySitesRequest {
    /// The cheapest possible query: one site, no filter.
    ///
    /// Serializes to exactly `{"cursorPaging":{"limit":1}}`.
    pub fn probe() -> Self {
        Self {
            cursor_paging: Some(CursorPaging {
                limit: Some(1),
                cursor: None,
            }),
            ..Self::default()
        }
    }

    /// Same query, continued from `cursor`.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        let paging = self.cursor_paging.get_or_insert_with(CursorPaging::default);
        paging.cursor = Some(cursor.into());
        self
    }
}

/// Wire body of a query, built directly from the typed fields.
///
/// Matches the `Serialize` output but cannot fail, so request builders
/// can embed it without an error path.
impl From<&QuerySitesRequest> for Value {
    fn from(request: &QuerySitesRequest) -> Self {
        let mut body = Map::new();
        if let Some(filter) = &request.filter {
            body.insert("filter".into(), Value::Object(filter.clone()));
        }
        if let Some(sort) = &request.sort {
            let sort = sort
                .iter()
                .map(|s| {
                    let mut entry = Map::new();
                    entry.insert("fieldName".into(), Value::String(s.field_name.clone()));
                    entry.insert("order".into(), Value::String(s.order.as_str().into()));
                    Value::Object(entry)
                })
                .collect();
            body.insert("sort".into(), Value::Array(sort));
        }
        if let Some(paging) = &request.cursor_paging {
            let mut entry = Map::new();
            if let Some(limit) = paging.limit {
                entry.insert("limit".into(), Value::from(limit));
            }
            if let Some(cursor) = &paging.cursor {
                entry.insert("cursor".into(), Value::String(cursor.clone()));
            }
            body.insert("cursorPaging".into(), Value::Object(entry));
        }
        Value::Object(body)
    }
}

// ── Response ─────────────────────────────────────────────────────────

/// A Wix site, as returned by the site-list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub premium: bool,
    /// ISO 8601 date-time.
    #[serde(default)]
    pub created_date: Option<String>,
    /// ISO 8601 date-time.
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub editor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,
    /// Catch-all for fields not modeled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of a site-list query.
///
/// Generic over the site representation so callers that must pass sites
/// through untouched can decode them as raw JSON objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct QueryResponse<S = Site> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub sites: Vec<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<QueryMetadata>,
}

impl<S> QueryResponse<S> {
    /// Continuation cursor for the next page, if the API returned one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.cursors.as_ref())
            .and_then(|c| c.next.as_deref())
            .filter(|next| !next.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMetadata {
    #[serde(default)]
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursors: Option<Cursors>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn probe_body_is_minimal() {
        let body = serde_json::to_value(QuerySitesRequest::probe()).expect("serializes");
        assert_eq!(body, json!({ "cursorPaging": { "limit": 1 } }));
    }

    #[test]
    fn empty_request_serializes_to_empty_object() {
        let body = serde_json::to_value(QuerySitesRequest::default()).expect("serializes");
        assert_eq!(body, json!({}));
    }

    #[test]
    fn with_cursor_keeps_limit() {
        let body = QuerySitesRequest::probe().with_cursor("abc");
        assert_eq!(
            serde_json::to_value(body).expect("serializes"),
            json!({ "cursorPaging": { "limit": 1, "cursor": "abc" } })
        );
    }

    #[test]
    fn json_body_matches_serialized_form() {
        let mut filter = Map::new();
        filter.insert("published".into(), json!({ "$eq": true }));
        let full = QuerySitesRequest {
            filter: Some(filter),
            sort: Some(vec![Sorting {
                field_name: "updatedDate".into(),
                order: SortOrder::Desc,
            }]),
            ..QuerySitesRequest::probe().with_cursor("c1")
        };

        for request in [QuerySitesRequest::default(), QuerySitesRequest::probe(), full] {
            assert_eq!(
                Value::from(&request),
                serde_json::to_value(&request).expect("serializes")
            );
        }
    }

    #[test]
    fn sort_order_wire_format() {
        assert_eq!(serde_json::to_value(SortOrder::Desc).expect("serializes"), json!("DESC"));
        assert_eq!("ASC".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert!("asc".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }

    #[test]
    fn site_keeps_unmodelled_fields() {
        let raw = json!({
            "id": "site-1",
            "displayName": "Shop",
            "name": "shop",
            "published": true,
            "premium": false,
            "createdDate": "2024-01-01T00:00:00Z",
            "updatedDate": "2024-02-01T00:00:00Z",
            "editorType": "EDITOR",
            "namespace": "WIX"
        });
        let site: Site = serde_json::from_value(raw.clone()).expect("deserializes");

        assert_eq!(site.display_name, "Shop");
        assert!(site.view_url.is_none());
        assert_eq!(site.extra.get("namespace"), Some(&json!("WIX")));
        assert_eq!(serde_json::to_value(&site).expect("serializes"), raw);
    }

    #[test]
    fn missing_or_null_sites_decode_as_empty() {
        let absent: QueryResponse = serde_json::from_value(json!({})).expect("deserializes");
        let null: QueryResponse = serde_json::from_value(json!({ "sites": null })).expect("deserializes");

        assert!(absent.sites.is_empty());
        assert!(null.sites.is_empty());
    }

    #[test]
    fn next_cursor_ignores_empty_values() {
        let with_next: QueryResponse<Value> = serde_json::from_value(json!({
            "sites": [],
            "metadata": { "count": 0, "cursors": { "next": "c2" } }
        }))
        .expect("deserializes");
        let empty_next: QueryResponse<Value> = serde_json::from_value(json!({
            "sites": [],
            "metadata": { "count": 0, "cursors": { "next": "" } }
        }))
        .expect("deserializes");

        assert_eq!(with_next.next_cursor(), Some("c2"));
        assert_eq!(empty_next.next_cursor(), None);
    }
}
