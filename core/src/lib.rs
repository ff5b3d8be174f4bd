//! Synchronous client for the DaData suggestion API.
//!
//! # Overview
//! Wraps the suggestion (`rs/suggest/{type}`), lookup-by-identifier
//! (`rs/findById/party`) and reverse-geocoding (`rs/geolocate/address`)
//! endpoints. Requests are JSON `POST`s authenticated with
//! `Authorization: Token <token>`; responses are `{"suggestions": [...]}`.
//!
//! # Design
//! - `SuggestionApi` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_suggestions` consumes an `HttpResponse` (host-does-IO).
//! - `SuggestionClient` runs the round-trip through any `Transport`;
//!   `UreqTransport` is the default blocking implementation.
//! - Token and options are injected explicitly; only `Config::from_env`
//!   reads the environment.
//! - Successful calls always return a non-empty `Suggestions` list.
//!
//! ```no_run
//! use dadata_core::{AddressQuery, SuggestionClient, UreqTransport};
//!
//! let client = SuggestionClient::new("my-token", UreqTransport::new())?;
//! let found = client.suggest_address(&AddressQuery::new("москва сухонская").count(3))?;
//! for s in &found {
//!     println!("{}", s.value().unwrap_or_default());
//! }
//! # Ok::<(), dadata_core::ApiError>(())
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
#[cfg(any(test, feature = "mocks"))]
pub mod mock;
pub mod query;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use api::SuggestionApi;
pub use client::SuggestionClient;
pub use config::{Config, ConfigBuilder};
pub use error::{ApiError, ApiResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use query::{AddressQuery, GeolocateQuery};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Language, Params, Suggestion, SuggestionType, Suggestions};
