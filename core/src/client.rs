//! Transport-backed client for the suggestion API.
//!
//! # Design
//! `SuggestionClient` pairs the stateless `SuggestionApi` with a `Transport`.
//! Every public operation builds its request, then funnels through the single
//! private `execute`: one round-trip, no retries, every failure surfaced on
//! first occurrence. The client holds no mutable state, so concurrent calls
//! are as safe as the transport they share.

use tracing::{debug, instrument, warn};

use crate::api::SuggestionApi;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpRequest, Transport};
use crate::query::{AddressQuery, GeolocateQuery};
use crate::types::{Params, SuggestionType, Suggestions};

/// Synchronous client for the suggestion API over a pluggable `Transport`.
///
/// Each call validates locally, sends one request and interprets the answer.
/// Configuration is fixed at construction; the client never retries.
pub struct SuggestionClient<T> {
    api: SuggestionApi,
    transport: T,
}

impl<T: Transport> SuggestionClient<T> {
    /// Fails with `ApiError::Configuration` when `token` is empty.
    pub fn new(token: impl Into<String>, transport: T) -> ApiResult<Self> {
        let config = Config::with_token(token)?;
        Ok(Self::with_config(config, transport))
    }

    pub fn with_config(config: Config, transport: T) -> Self {
        Self {
            api: SuggestionApi::new(config),
            transport,
        }
    }

    pub fn api(&self) -> &SuggestionApi {
        &self.api
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[instrument(skip_all, fields(kind = %kind))]
    pub fn suggest(&self, kind: SuggestionType, fields: Params) -> ApiResult<Suggestions> {
        let request = self.api.build_suggest(kind, fields)?;
        self.execute(request)
    }

    #[instrument(skip_all, fields(kind = "address"))]
    pub fn suggest_address(&self, query: &AddressQuery) -> ApiResult<Suggestions> {
        let request = self.api.build_suggest_address(query)?;
        self.execute(request)
    }

    #[instrument(skip_all, fields(endpoint = "geolocate/address"))]
    pub fn geolocate_address(&self, query: &GeolocateQuery) -> ApiResult<Suggestions> {
        let request = self.api.build_geolocate_address(query)?;
        self.execute(request)
    }

    #[instrument(skip_all, fields(endpoint = "findById/party"))]
    pub fn party_by_id(&self, id: &str, extra: Params) -> ApiResult<Suggestions> {
        let request = self.api.build_party_by_id(id, extra)?;
        self.execute(request)
    }

    fn execute(&self, request: HttpRequest) -> ApiResult<Suggestions> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let response = self.transport.send(&request).map_err(|e| {
            warn!(error = %e, "transport failure");
            ApiError::from(e)
        })?;

        match self.api.parse_suggestions(response) {
            Ok(suggestions) => {
                debug!(count = suggestions.len(), "suggestions received");
                Ok(suggestions)
            }
            Err(err) => {
                if let Some(status) = err.status() {
                    warn!(status, error = %err, "request rejected");
                } else {
                    debug!(error = %err, "response not usable");
                }
                Err(err)
            }
        }
    }
}

#[cfg(feature = "ureq")]
impl SuggestionClient<crate::transport::UreqTransport> {
    /// Client configured from `DADATA_*` environment variables.
    pub fn from_env() -> ApiResult<Self> {
        let config = Config::from_env()?;
        let transport = crate::transport::UreqTransport::new();
        Ok(Self::with_config(config, transport))
    }
}

impl<T> std::fmt::Debug for SuggestionClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionClient")
            .field("config", self.api.config())
            .finish_non_exhaustive()
    }
}
