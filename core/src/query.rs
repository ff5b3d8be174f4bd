//! Typed queries for the address-oriented endpoints.
//!
//! Both queries validate in the same order (count, radius, language) and turn
//! into the `Params` body only once validation passes.

use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::types::{Language, Params};

/// Upper bound on `count` accepted by the service.
pub const MAX_COUNT: u32 = 20;
pub const DEFAULT_COUNT: u32 = 10;

/// Upper bound on `radius_meters` for reverse geocoding.
pub const MAX_RADIUS_METERS: u32 = 100;
pub const DEFAULT_RADIUS_METERS: u32 = 100;

pub fn validate_count(count: u32) -> ApiResult<()> {
    if count > MAX_COUNT {
        return Err(ApiError::malformed(format!(
            "the count can't be greater than {MAX_COUNT}"
        )));
    }
    Ok(())
}

pub fn validate_radius_meters(radius_meters: u32) -> ApiResult<()> {
    if radius_meters > MAX_RADIUS_METERS {
        return Err(ApiError::malformed(format!(
            "the radius meters can't be greater than {MAX_RADIUS_METERS}"
        )));
    }
    Ok(())
}

pub fn validate_language(language: &str) -> ApiResult<Language> {
    language.parse()
}

/// Address suggestion query.
///
/// ```
/// use dadata_core::AddressQuery;
///
/// let query = AddressQuery::new("москва сухонская")
///     .count(5)
///     .language("en")
///     .field("from_bound", serde_json::json!({"value": "street"}));
/// assert!(query.to_params().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AddressQuery {
    pub query: String,
    pub count: u32,
    pub language: String,
    /// Extra body fields; these win over the defaults on key conflicts.
    pub extra: Params,
}

impl AddressQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            count: DEFAULT_COUNT,
            language: Language::default().to_string(),
            extra: Params::new(),
        }
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn fields(mut self, fields: Params) -> Self {
        self.extra.extend(fields);
        self
    }

    pub fn to_params(&self) -> ApiResult<Params> {
        validate_count(self.count)?;
        let language = validate_language(&self.language)?;

        let mut params = Params::new();
        params.insert("query".to_string(), Value::from(self.query.as_str()));
        params.insert("count".to_string(), Value::from(self.count));
        params.insert("language".to_string(), Value::from(language.as_str()));
        params.extend(self.extra.clone());
        Ok(params)
    }
}

/// Reverse-geocoding query around a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub struct GeolocateQuery {
    pub lat: f64,
    pub lon: f64,
    pub count: u32,
    pub radius_meters: u32,
    pub language: String,
}

impl GeolocateQuery {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            count: DEFAULT_COUNT,
            radius_meters: DEFAULT_RADIUS_METERS,
            language: Language::default().to_string(),
        }
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn radius_meters(mut self, radius_meters: u32) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Non-finite coordinates serialize as `null` and later fail the
    /// query/coordinates presence check.
    pub fn to_params(&self) -> ApiResult<Params> {
        validate_count(self.count)?;
        validate_radius_meters(self.radius_meters)?;
        let language = validate_language(&self.language)?;

        let mut params = Params::new();
        params.insert("lat".to_string(), Value::from(self.lat));
        params.insert("lon".to_string(), Value::from(self.lon));
        params.insert("language".to_string(), Value::from(language.as_str()));
        params.insert("count".to_string(), Value::from(self.count));
        params.insert("radius_meters".to_string(), Value::from(self.radius_meters));
        Ok(params)
    }
}
