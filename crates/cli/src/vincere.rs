//! Vincere REST API client.
//!
//! Authenticates with the OAuth2 refresh-token flow and caches the returned
//! `id_token` until shortly before it expires. Only the read endpoints
//! needed to export positions are implemented.

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};
use shared::pagination::{is_exhausted, OffsetPage};
use tokio::sync::RwLock;

use crate::config::VincereConfig;

pub const DEFAULT_AUTH_URL: &str = "https://id.vincere.io/oauth2/token";
pub const DEFAULT_API_BASE_URL: &str = "https://lighthouse-careers.vincere.io/api/v2";

/// Fields requested from the position search.
const SEARCH_FIELDS: &str = "id,job_title,company_name,created_date,last_update,job_status";

/// Search queries tried in order until one is accepted. `None` sends no `q`.
const SEARCH_QUERIES: [Option<&str>; 4] = [
    Some("id:[1 TO *]"),
    Some("*:*"),
    Some("job_title:*"),
    None,
];

/// Token lifetime assumed when the auth response omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// Tokens are refreshed this long before they expire.
const TOKEN_REFRESH_MARGIN_SECS: u64 = 300;

/// Error type for Vincere API operations.
#[derive(Debug, thiserror::Error)]
pub enum VincereError {
    #[error("Missing Vincere configuration: {0}")]
    MissingCredentials(String),

    #[error("Vincere authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vincere API error: {status} - {body}")]
    Api { status: StatusCode, body: String },

    #[error("Unexpected Vincere response: {0}")]
    UnexpectedResponse(String),

    #[error("Position search failed for every query form")]
    SearchUnavailable,
}

/// Cached `id_token` with expiry tracking.
struct CachedToken {
    id_token: String,
    refresh_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: SearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    items: Vec<JsonValue>,
    total: Option<usize>,
}

/// Vincere API client.
pub struct VincereClient {
    client: Client,
    config: VincereConfig,
    token_cache: RwLock<Option<CachedToken>>,
}

impl VincereClient {
    /// Create a client. Fails when any credential is blank.
    pub fn new(config: VincereConfig) -> Result<Self, VincereError> {
        if config.client_id.trim().is_empty()
            || config.api_key.trim().is_empty()
            || config.refresh_token.trim().is_empty()
        {
            return Err(VincereError::MissingCredentials(
                "client_id, api_key and refresh_token are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            token_cache: RwLock::new(None),
        })
    }

    /// Get a valid `id_token`, refreshing if necessary.
    async fn id_token(&self) -> Result<String, VincereError> {
        {
            let cache = self.token_cache.read().await;
            if let Some(ref token) = *cache {
                if Instant::now() < token.refresh_at {
                    return Ok(token.id_token.clone());
                }
            }
        }

        let token = self.authenticate().await?;
        let id_token = token.id_token.clone();
        *self.token_cache.write().await = Some(token);
        Ok(id_token)
    }

    async fn invalidate_token(&self) {
        *self.token_cache.write().await = None;
    }

    /// Exchange the refresh token for a new `id_token`.
    async fn authenticate(&self) -> Result<CachedToken, VincereError> {
        tracing::debug!(auth_url = %self.config.auth_url, "Authenticating with Vincere");

        let response = self
            .client
            .post(&self.config.auth_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", self.config.refresh_token.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VincereError::Auth(format!("{} {}", status, error_text)));
        }

        let token_response: TokenResponse = response.json().await?;
        let id_token = token_response
            .id_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| VincereError::Auth("no id_token returned".to_string()))?;

        Ok(CachedToken {
            id_token,
            refresh_at: Instant::now() + token_lifetime(token_response.expires_in),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.config.api_base_url.trim_end_matches('/'), endpoint)
        }
    }

    /// Authenticated GET. A 401 is retried once with a fresh token and an
    /// empty body decodes as `{}`.
    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<JsonValue, VincereError> {
        let url = self.url(endpoint);
        let mut retried = false;

        loop {
            let token = self.id_token().await?;
            let response = self
                .client
                .get(&url)
                .query(query)
                .header("accept", "application/json")
                .header("id-token", token)
                .header("x-api-key", &self.config.api_key)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && !retried {
                tracing::debug!(endpoint, "Token rejected, re-authenticating");
                self.invalidate_token().await;
                retried = true;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(VincereError::Api { status, body });
            }

            let text = response.text().await?;
            return decode_body(&text);
        }
    }

    async fn search_page(
        &self,
        query: Option<&str>,
        page: OffsetPage,
    ) -> Result<SearchResult, VincereError> {
        let endpoint = format!("/position/search/fl={}", SEARCH_FIELDS);
        let mut params = Vec::with_capacity(3);
        if let Some(q) = query {
            params.push(("q", q.to_string()));
        }
        params.push(("start", page.start.to_string()));
        params.push(("limit", page.limit.to_string()));

        let value = self.get(&endpoint, &params).await?;
        serde_json::from_value::<SearchResponse>(value)
            .map(|response| response.result)
            .map_err(|e| VincereError::UnexpectedResponse(format!("position search: {}", e)))
    }

    /// Ids of every position, in search order.
    ///
    /// A page that fails after the first one ends paging; what was already
    /// fetched is kept.
    pub async fn list_position_ids(&self) -> Result<Vec<i64>, VincereError> {
        let mut page = OffsetPage::first(self.config.page_size);

        let mut accepted = None;
        for query in SEARCH_QUERIES {
            match self.search_page(query, page).await {
                Ok(result) => {
                    tracing::info!(
                        query = query.unwrap_or("<none>"),
                        total = ?result.total,
                        "Position search accepted"
                    );
                    accepted = Some((query, result));
                    break;
                }
                Err(e) => {
                    tracing::warn!(query = query.unwrap_or("<none>"), error = %e, "Position search rejected");
                }
            }
        }
        let (query, mut result) = accepted.ok_or(VincereError::SearchUnavailable)?;
        let total = result.total;

        let mut ids = Vec::new();
        let mut fetched = 0;
        loop {
            let page_len = result.items.len();
            fetched += page_len;
            ids.extend(result.items.iter().filter_map(position_id));
            tracing::info!(
                page = page.number(),
                items = page_len,
                fetched,
                total = ?total,
                "Fetched search page"
            );

            if is_exhausted(fetched, total, page_len, page.limit) {
                break;
            }

            page = page.next();
            result = match self.search_page(query, page).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(start = page.start, error = %e, "Search page failed, stopping");
                    break;
                }
            };
        }

        Ok(ids)
    }

    /// Full position details.
    pub async fn fetch_position(&self, id: i64) -> Result<JsonValue, VincereError> {
        self.get(&format!("/position/{}", id), &[]).await
    }

    /// Custom fields of a position.
    pub async fn fetch_custom_fields(&self, id: i64) -> Result<Vec<JsonValue>, VincereError> {
        let value = self.get(&format!("/position/{}/customfields", id), &[]).await?;
        Ok(custom_fields_list(value))
    }

    /// One export record: `{ "job": ..., "custom_fields": { key: field } }`.
    ///
    /// A custom field failure is logged and yields no custom fields.
    pub async fn fetch_job_record(&self, id: i64) -> Result<JsonValue, VincereError> {
        let job = self.fetch_position(id).await?;

        let custom_fields = match self.fetch_custom_fields(id).await {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!(position_id = id, error = %e, "Could not fetch custom fields");
                Vec::new()
            }
        };

        Ok(json!({
            "job": job,
            "custom_fields": index_custom_fields(custom_fields),
        }))
    }
}

fn token_lifetime(expires_in: Option<u64>) -> Duration {
    let secs = expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
    Duration::from_secs(secs.saturating_sub(TOKEN_REFRESH_MARGIN_SECS))
}

fn decode_body(text: &str) -> Result<JsonValue, VincereError> {
    if text.trim().is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(text).map_err(|e| VincereError::UnexpectedResponse(e.to_string()))
}

/// Position id from a search item. Ids arrive as numbers or numeric strings.
fn position_id(item: &JsonValue) -> Option<i64> {
    match item.get("id")? {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The customfields endpoint answers with a list or with `{ "data": [...] }`.
fn custom_fields_list(value: JsonValue) -> Vec<JsonValue> {
    match value {
        JsonValue::Array(fields) => fields,
        JsonValue::Object(mut object) => match object.remove("data") {
            Some(JsonValue::Array(fields)) => fields,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Index fields by `key`. Fields without a string key are dropped; a
/// repeated key keeps the last field.
fn index_custom_fields(fields: Vec<JsonValue>) -> Map<String, JsonValue> {
    let mut indexed = Map::new();
    for field in fields {
        let Some(key) = field.get("key").and_then(JsonValue::as_str).map(str::to_string) else {
            continue;
        };
        indexed.insert(key, field);
    }
    indexed
}
