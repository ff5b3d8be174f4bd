//! Stateless request builder and response parser for the suggestion API.
//!
//! # Design
//! `SuggestionApi` holds only the immutable `Config`. Each operation has a
//! `build_*` method producing an `HttpRequest`; every endpoint answers with
//! the same `{"suggestions": [...]}` envelope, so one `parse_suggestions`
//! interprets all responses. Callers with their own HTTP stack can drive
//! these directly; `SuggestionClient` wires them to a `Transport`.

use serde_json::Value;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::{AddressQuery, GeolocateQuery};
use crate::types::{Params, Suggestion, SuggestionType, Suggestions};

pub const SUGGEST_PATH: &str = "rs/suggest";
pub const FIND_BY_ID_PARTY_PATH: &str = "rs/findById/party";
pub const GEOLOCATE_ADDRESS_PATH: &str = "rs/geolocate/address";

/// Stateless request builder and response parser for the suggestion API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller executes the round-trip between
/// `build_*` and `parse_suggestions`, or hands both to `SuggestionClient`.
#[derive(Debug, Clone)]
pub struct SuggestionApi {
    config: Config,
}

impl SuggestionApi {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn suggest_url(&self, kind: SuggestionType) -> String {
        self.config
            .endpoint_url(&format!("{SUGGEST_PATH}/{}", kind.as_str()))
    }

    pub fn find_by_id_url(&self) -> String {
        self.config.endpoint_url(FIND_BY_ID_PARTY_PATH)
    }

    pub fn geolocate_url(&self) -> String {
        self.config.endpoint_url(GEOLOCATE_ADDRESS_PATH)
    }

    /// `fields` are sent as-is; the service rejects keys it does not know.
    pub fn build_suggest(&self, kind: SuggestionType, fields: Params) -> ApiResult<HttpRequest> {
        self.build_request(HttpMethod::Post, self.suggest_url(kind), fields)
    }

    pub fn build_suggest_address(&self, query: &AddressQuery) -> ApiResult<HttpRequest> {
        let params = query.to_params()?;
        self.build_suggest(SuggestionType::Address, params)
    }

    pub fn build_geolocate_address(&self, query: &GeolocateQuery) -> ApiResult<HttpRequest> {
        let params = query.to_params()?;
        self.build_request(HttpMethod::Post, self.geolocate_url(), params)
    }

    /// `id` may be an INN, OGRN or the service's internal HID; its format is
    /// not checked locally. `query` always wins over an `extra` entry.
    pub fn build_party_by_id(&self, id: &str, extra: Params) -> ApiResult<HttpRequest> {
        let mut params = extra;
        params.insert("query".to_string(), Value::from(id));
        self.build_request(HttpMethod::Post, self.find_by_id_url(), params)
    }

    /// Checks the query/coordinates invariant, then serializes `params`.
    pub fn build_request(
        &self,
        method: HttpMethod,
        url: String,
        params: Params,
    ) -> ApiResult<HttpRequest> {
        if !has_query(&params) && !has_coordinates(&params) {
            return Err(ApiError::malformed("empty request"));
        }

        let body = match method {
            HttpMethod::Get => None,
            HttpMethod::Post => Some(
                serde_json::to_string(&params)
                    .map_err(|e| ApiError::malformed(format!("cannot encode parameters: {e}")))?,
            ),
        };

        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            (
                "Authorization".to_string(),
                format!("Token {}", self.config.token()),
            ),
        ];
        headers.extend(self.config.custom_headers.iter().cloned());

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: self.config.timeout,
        })
    }

    pub fn parse_suggestions(&self, response: HttpResponse) -> ApiResult<Suggestions> {
        if response.status != 200 {
            return Err(ApiError::from_status(response.status, response.body));
        }

        let root: Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::ResponseParseError { message: e.to_string() })?;

        // Valid JSON without a `suggestions` list is an empty answer.
        let raw = match root {
            Value::Object(mut map) => map.remove("suggestions").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        if raw.is_null() {
            return Err(ApiError::EmptyResult);
        }

        let items: Vec<Suggestion> = serde_json::from_value(raw)
            .map_err(|e| ApiError::ResponseParseError { message: e.to_string() })?;
        if items.first().map_or(true, Suggestion::is_empty) {
            return Err(ApiError::EmptyResult);
        }
        Suggestions::new(items).ok_or(ApiError::EmptyResult)
    }
}

fn has_query(params: &Params) -> bool {
    match params.get("query") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(_) => true,
    }
}

fn has_coordinates(params: &Params) -> bool {
    let present = |key: &str| !matches!(params.get(key), None | Some(Value::Null));
    present("lat") && present("lon")
}
