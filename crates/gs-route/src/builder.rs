use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use serde::Serialize;
use uuid::Uuid;

/// Scheme and path every import token starts with.
pub const TOKEN_PREFIX: &str = "v2rayTun://import_route/";

/// Error type for route packaging.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("domain list is empty")]
    EmptyList,
    #[error("Failed to serialize route: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Caller-supplied route settings.
#[derive(Debug, Clone)]
pub struct RouteOptions {
    pub name: String,
    pub outbound_tag: String,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            outbound_tag: "direct".to_string(),
        }
    }
}

/// Routing configuration in the v2rayTun import layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub name: String,
    pub domain_strategy: String,
    pub id: String,
    pub domain_matcher: String,
    pub rules: Vec<RouteRule>,
    pub balancers: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRule {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub domain: Vec<String>,
    #[serde(rename = "outboundTag")]
    pub outbound_tag: String,
    #[serde(rename = "__name__")]
    pub name: String,
}

/// Build a single-rule route sending `domains` to the configured outbound.
pub fn build_route(domains: Vec<String>, opts: &RouteOptions) -> Result<Route, RouteError> {
    if domains.is_empty() {
        return Err(RouteError::EmptyList);
    }

    Ok(Route {
        name: opts.name.clone(),
        domain_strategy: "AsIs".to_string(),
        id: Uuid::new_v4().to_string(),
        domain_matcher: "hybrid".to_string(),
        rules: vec![RouteRule {
            id: Uuid::new_v4().to_string(),
            kind: "field".to_string(),
            domain: domains,
            outbound_tag: opts.outbound_tag.clone(),
            name: opts.name.clone(),
        }],
        balancers: Vec::new(),
    })
}

/// Serialize `route` to JSON and wrap it as an import token.
pub fn encode_token(route: &Route) -> Result<String, RouteError> {
    let json = serde_json::to_vec(route)?;
    Ok(format!("{}{}", TOKEN_PREFIX, URL_SAFE.encode(json)))
}
