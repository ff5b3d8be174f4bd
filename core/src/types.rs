//! Domain types for the suggestion API.
//!
//! # Design
//! Suggestion objects are passed through verbatim as JSON objects; no local
//! schema is imposed beyond a few convenience accessors. Category and
//! language are closed enums that serialize to the upstream wire strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Request parameters sent as the JSON body.
pub type Params = Map<String, Value>;

/// Entity categories the service can suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    /// Organizations and sole proprietors.
    Party,
    Address,
    Bank,
    /// Person names.
    Fio,
    Email,
    /// Passport issuing offices.
    FmsUnit,
    /// Tax offices.
    FnsUnit,
    PostalOffice,
    /// Magistrate courts.
    RegionCourt,
    Country,
    Currency,
    /// Activity classifier codes.
    Okved2,
    /// Product classifier codes.
    Okpd2,
}

impl SuggestionType {
    /// Alias of `Party`.
    pub const ORGANIZATION: SuggestionType = SuggestionType::Party;

    pub const ALL: [SuggestionType; 13] = [
        SuggestionType::Party,
        SuggestionType::Address,
        SuggestionType::Bank,
        SuggestionType::Fio,
        SuggestionType::Email,
        SuggestionType::FmsUnit,
        SuggestionType::FnsUnit,
        SuggestionType::PostalOffice,
        SuggestionType::RegionCourt,
        SuggestionType::Country,
        SuggestionType::Currency,
        SuggestionType::Okved2,
        SuggestionType::Okpd2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionType::Party => "party",
            SuggestionType::Address => "address",
            SuggestionType::Bank => "bank",
            SuggestionType::Fio => "fio",
            SuggestionType::Email => "email",
            SuggestionType::FmsUnit => "fms_unit",
            SuggestionType::FnsUnit => "fns_unit",
            SuggestionType::PostalOffice => "postal_office",
            SuggestionType::RegionCourt => "region_court",
            SuggestionType::Country => "country",
            SuggestionType::Currency => "currency",
            SuggestionType::Okved2 => "okved2",
            SuggestionType::Okpd2 => "okpd2",
        }
    }
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestionType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SuggestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ApiError::malformed(format!("unknown suggestion type: {s}")))
    }
}

/// Response language accepted by the address endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            other => Err(ApiError::malformed(format!(
                "unexpected value of the language field: {other}. Expected: `ru` or `en`"
            ))),
        }
    }
}

/// A single suggestion object, exactly as the service returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Suggestion(Map<String, Value>);

impl Suggestion {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Short display form, e.g. `г Москва, ул Сухонская`.
    pub fn value(&self) -> Option<&str> {
        self.0.get("value").and_then(Value::as_str)
    }

    pub fn unrestricted_value(&self) -> Option<&str> {
        self.0.get("unrestricted_value").and_then(Value::as_str)
    }

    /// The structured `data` object.
    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.0.get("data").and_then(Value::as_object)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Suggestion {
    fn from(map: Map<String, Value>) -> Self {
        Suggestion(map)
    }
}

/// Non-empty, ordered list of suggestions from one call.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestions(Vec<Suggestion>);

impl Suggestions {
    /// Returns `None` for an empty list.
    pub(crate) fn new(items: Vec<Suggestion>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Suggestions(items))
        }
    }

    /// The suggestion when exactly one was returned.
    pub fn single(&self) -> Option<&Suggestion> {
        match self.0.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn first(&self) -> &Suggestion {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Suggestion> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Suggestion] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Suggestion> {
        self.0
    }
}

impl IntoIterator for Suggestions {
    type Item = Suggestion;
    type IntoIter = std::vec::IntoIter<Suggestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Suggestions {
    type Item = &'a Suggestion;
    type IntoIter = std::slice::Iter<'a, Suggestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn suggestion(value: Value) -> Suggestion {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn suggestion_type_wire_strings() {
        assert_eq!(SuggestionType::FmsUnit.as_str(), "fms_unit");
        assert_eq!(SuggestionType::Okved2.to_string(), "okved2");
        assert_eq!(SuggestionType::ORGANIZATION, SuggestionType::Party);
        assert_eq!(
            serde_json::to_value(SuggestionType::PostalOffice).unwrap(),
            json!("postal_office")
        );
    }

    #[test]
    fn suggestion_type_parses_every_wire_string() {
        for kind in SuggestionType::ALL {
            assert_eq!(kind.as_str().parse::<SuggestionType>().unwrap(), kind);
        }
        assert!("org".parse::<SuggestionType>().is_err());
    }

    #[test]
    fn language_parse() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!(Language::default(), Language::Ru);
        let err = "de".parse::<Language>().unwrap_err();
        assert!(matches!(err, ApiError::MalformedRequest { .. }));
        assert!(err.to_string().contains("de"));
    }

    #[test]
    fn suggestion_accessors() {
        let s = suggestion(json!({
            "value": "г Москва",
            "unrestricted_value": "101000, г Москва",
            "data": {"city": "Москва"}
        }));
        assert_eq!(s.value(), Some("г Москва"));
        assert_eq!(s.unrestricted_value(), Some("101000, г Москва"));
        assert_eq!(s.data().unwrap()["city"], "Москва");
        assert!(s.get("missing").is_none());
    }

    #[test]
    fn single_only_for_one_item() {
        let one = Suggestions::new(vec![suggestion(json!({"value": "A"}))]).unwrap();
        assert_eq!(one.single().and_then(Suggestion::value), Some("A"));

        let two = Suggestions::new(vec![
            suggestion(json!({"value": "A"})),
            suggestion(json!({"value": "B"})),
        ])
        .unwrap();
        assert!(two.single().is_none());
        assert_eq!(two.first().value(), Some("A"));
        assert_eq!(two.len(), 2);

        assert!(Suggestions::new(Vec::new()).is_none());
    }
}
