//! The `wixSites` node: query the sites of a Wix account.

use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use wix_api::{CursorPaging, QueryResponse, QuerySitesRequest, SortOrder, Sorting};

use crate::credentials::{WixApiCredential, sites_query_request};
use crate::description::{
    CredentialRequirement, NodeDefaults, NodeDescription, NodeProperty, PropertyChoice, PropertyType,
};
use crate::host::{
    ExecuteContext, ExecutionItem, HostError, HttpRequester, NodeApiError, RequestError,
    return_json_array,
};

pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 100;

/// Queries sites from Wix using filters, sorting and paging.
#[derive(Debug, Clone, Copy, Default)]
pub struct WixSites;

impl WixSites {
    pub const NAME: &'static str = "wixSites";

    pub fn description() -> NodeDescription {
        NodeDescription {
            display_name: "Wix Sites".into(),
            name: Self::NAME.into(),
            icon: "file:wix.svg".into(),
            group: vec!["transform".into()],
            version: 1,
            description: "Query sites from Wix using filters, sorting and paging".into(),
            usable_as_tool: true,
            defaults: NodeDefaults {
                name: "Wix Sites".into(),
            },
            inputs: vec!["main".into()],
            outputs: vec!["main".into()],
            credentials: vec![CredentialRequirement {
                name: WixApiCredential::NAME.into(),
                required: true,
            }],
            properties: vec![
                NodeProperty::new("Filter (JSON)", "filter", PropertyType::Json, json!({}))
                    .description("Filter in the Wix API format"),
                NodeProperty::new("Sort", "sort", PropertyType::Collection, json!({}))
                    .placeholder("Add sort field")
                    .fields(vec![
                        NodeProperty::new("Field Name", "fieldName", PropertyType::String, "displayName"),
                        NodeProperty::new("Order", "order", PropertyType::Options, "ASC").choices(vec![
                            PropertyChoice::new("ASC", "ASC"),
                            PropertyChoice::new("DESC", "DESC"),
                        ]),
                    ]),
                NodeProperty::new("Limit", "limit", PropertyType::Number, DEFAULT_LIMIT)
                    .range(1.0, f64::from(MAX_LIMIT))
                    .description("Max number of results to return"),
                NodeProperty::new("Cursor", "cursor", PropertyType::String, "")
                    .description("Cursor returned from a previous request"),
            ],
        }
    }

    /// Run one query and emit every returned site as an output item.
    ///
    /// Parameters are read for the first input item; one query is issued
    /// per execution. Returns one output channel.
    pub async fn execute<C: ExecuteContext>(&self, ctx: &C) -> Result<Vec<Vec<ExecutionItem>>, NodeApiError> {
        match self.query(ctx).await {
            Ok(items) => Ok(vec![items]),
            Err(err) => {
                if !matches!(err, RequestError::UpstreamApi(_)) {
                    warn!(node = %ctx.node().name, error = %err, "wrapping unclassified failure");
                }
                Err(err.into_node_error(ctx.node()))
            }
        }
    }

    async fn query<C: ExecuteContext>(&self, ctx: &C) -> Result<Vec<ExecutionItem>, RequestError> {
        let credentials = WixApiCredential::from_resolved(&ctx.get_credentials(WixApiCredential::NAME)?)?;
        let params = QueryParameters::resolve(ctx, 0)?;
        let body = build_query_body(&params);
        debug!(
            limit = params.limit,
            has_filter = body.filter.is_some(),
            has_sort = body.sort.is_some(),
            has_cursor = !params.cursor.is_empty(),
            "querying wix sites"
        );

        let raw = ctx
            .helpers()
            .http_request(sites_query_request(&credentials, &body))
            .await?;
        let response: QueryResponse<Map<String, Value>> =
            serde_json::from_value(raw).map_err(RequestError::failure)?;

        debug!(count = response.sites.len(), "wix sites received");
        Ok(return_json_array(response.sites))
    }
}

// ── Parameters ───────────────────────────────────────────────────────

/// The `sort` collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortParameter {
    /// Empty means "no sort".
    pub field_name: String,
    pub order: SortOrder,
}

/// Node parameters after host resolution and defaulting.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    pub filter: Map<String, Value>,
    pub sort: SortParameter,
    pub limit: u32,
    /// Empty means "first page".
    pub cursor: String,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            filter: Map::new(),
            sort: SortParameter::default(),
            limit: DEFAULT_LIMIT,
            cursor: String::new(),
        }
    }
}

impl QueryParameters {
    /// Read all parameters for `item_index`, applying defaults for unset
    /// ones. Values are only type-checked; range limits are the host's job.
    pub fn resolve<C: ExecuteContext>(ctx: &C, item_index: usize) -> Result<Self, HostError> {
        let mut params = Self::default();

        if let Some(value) = non_null(ctx.get_node_parameter("filter", item_index)) {
            params.filter = match value {
                Value::Object(map) => map,
                other => return Err(invalid("filter", "a JSON object", &other)),
            };
        }

        if let Some(value) = non_null(ctx.get_node_parameter("sort", item_index)) {
            let sort = match value {
                Value::Object(sort) => sort,
                other => return Err(invalid("sort", "a collection", &other)),
            };
            if let Some(field) = non_null(sort.get("fieldName").cloned()) {
                params.sort.field_name = match field {
                    Value::String(s) => s,
                    other => return Err(invalid("sort.fieldName", "a string", &other)),
                };
            }
            if let Some(order) = non_null(sort.get("order").cloned()) {
                params.sort.order = order
                    .as_str()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| invalid("sort.order", "'ASC' or 'DESC'", &order))?;
            }
        }

        if let Some(value) = non_null(ctx.get_node_parameter("limit", item_index)) {
            params.limit = as_limit(&value).ok_or_else(|| invalid("limit", "a non-negative integer", &value))?;
        }

        if let Some(value) = non_null(ctx.get_node_parameter("cursor", item_index)) {
            params.cursor = match value {
                Value::String(s) => s,
                other => return Err(invalid("cursor", "a string", &other)),
            };
        }

        Ok(params)
    }
}

/// Assemble the query body, omitting every empty input.
pub fn build_query_body(params: &QueryParameters) -> QuerySitesRequest {
    QuerySitesRequest {
        filter: (!params.filter.is_empty()).then(|| params.filter.clone()),
        sort: (!params.sort.field_name.is_empty()).then(|| {
            vec![Sorting {
                field_name: params.sort.field_name.clone(),
                order: params.sort.order,
            }]
        }),
        cursor_paging: Some(CursorPaging {
            limit: Some(params.limit),
            cursor: (!params.cursor.is_empty()).then(|| params.cursor.clone()),
        }),
    }
}

fn non_null(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

fn as_limit(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    // Hosts that store numbers as floats hand back e.g. `50.0`.
    let f = value.as_f64()?;
    if f.fract() != 0.0 || f < 0.0 || f > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    let limit = f as u32;
    Some(limit)
}

fn invalid(name: &str, expected: &'static str, actual: &Value) -> HostError {
    HostError::InvalidParameter {
        name: name.into(),
        expected,
        actual: actual.to_string(),
    }
}
