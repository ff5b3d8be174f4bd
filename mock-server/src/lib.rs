use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tracing::info;

pub const API_PREFIX: &str = "/suggestions/api/4_1/rs";

/// Query that makes any endpoint answer 500.
pub const BOOM_QUERY: &str = "__boom__";

const MAX_COUNT: u64 = 20;
const MAX_QUERY_CHARS: usize = 300;
const DEFAULT_COUNT: u64 = 10;
const DEFAULT_RADIUS_METERS: f64 = 100.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub value: String,
    pub unrestricted_value: String,
    pub data: Value,
}

#[derive(Serialize, Deserialize)]
pub struct SuggestionsBody {
    pub suggestions: Vec<Suggestion>,
}

struct Fixture {
    kind: &'static str,
    suggestion: Suggestion,
}

struct AppState {
    token: String,
    fixtures: Vec<Fixture>,
}

type Shared = Arc<AppState>;
type Reply = Result<Json<SuggestionsBody>, (StatusCode, Json<Value>)>;

pub fn app(token: &str) -> Router {
    let state = Arc::new(AppState {
        token: token.to_string(),
        fixtures: fixtures(),
    });
    Router::new()
        .route(&format!("{API_PREFIX}/suggest/{{kind}}"), post(suggest))
        .route(&format!("{API_PREFIX}/findById/party"), post(find_party))
        .route(&format!("{API_PREFIX}/geolocate/address"), post(geolocate))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

fn fail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

/// Applies the checks every endpoint shares and returns the decoded body.
fn admit(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Map<String, Value>, (StatusCode, Json<Value>)> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "missing API key"))?;
    if auth.strip_prefix("Token ") != Some(state.token.as_str()) {
        return Err(fail(StatusCode::FORBIDDEN, "incorrect API key"));
    }

    let Ok(Json(Value::Object(params))) = body else {
        return Err(fail(StatusCode::BAD_REQUEST, "request body must be a JSON object"));
    };

    if count(&params) > MAX_COUNT {
        return Err(fail(StatusCode::PAYLOAD_TOO_LARGE, "count limit exceeded"));
    }
    let query = query(&params);
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(fail(StatusCode::PAYLOAD_TOO_LARGE, "query too long"));
    }
    if query == BOOM_QUERY {
        return Err(fail(StatusCode::INTERNAL_SERVER_ERROR, "internal error"));
    }
    Ok(params)
}

fn count(params: &Map<String, Value>) -> u64 {
    params.get("count").and_then(Value::as_u64).unwrap_or(DEFAULT_COUNT)
}

fn query(params: &Map<String, Value>) -> &str {
    params.get("query").and_then(Value::as_str).unwrap_or_default()
}

fn respond(found: Vec<Suggestion>, limit: u64) -> Json<SuggestionsBody> {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    Json(SuggestionsBody {
        suggestions: found.into_iter().take(limit).collect(),
    })
}

async fn suggest(
    State(state): State<Shared>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Reply {
    let params = admit(&state, &headers, body)?;
    if !KINDS.contains(&kind.as_str()) {
        return Err(fail(StatusCode::BAD_REQUEST, "unknown suggestion type"));
    }

    let needle = query(&params).to_lowercase();
    let found: Vec<Suggestion> = state
        .fixtures
        .iter()
        .filter(|f| f.kind == kind)
        .filter(|f| f.suggestion.unrestricted_value.to_lowercase().contains(&needle))
        .map(|f| f.suggestion.clone())
        .collect();
    info!(%kind, query = %needle, found = found.len(), "suggest");
    Ok(respond(found, count(&params)))
}

async fn find_party(
    State(state): State<Shared>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Reply {
    let params = admit(&state, &headers, body)?;
    let id = query(&params);
    let found: Vec<Suggestion> = state
        .fixtures
        .iter()
        .filter(|f| f.kind == "party")
        .filter(|f| {
            ["inn", "ogrn", "hid"]
                .iter()
                .any(|key| f.suggestion.data.get(key).and_then(Value::as_str) == Some(id))
        })
        .map(|f| f.suggestion.clone())
        .collect();
    info!(id, found = found.len(), "findById/party");
    Ok(respond(found, count(&params)))
}

async fn geolocate(
    State(state): State<Shared>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Reply {
    let params = admit(&state, &headers, body)?;
    let (Some(lat), Some(lon)) = (
        params.get("lat").and_then(Value::as_f64),
        params.get("lon").and_then(Value::as_f64),
    ) else {
        return Err(fail(StatusCode::BAD_REQUEST, "lat and lon are required"));
    };
    let radius = params
        .get("radius_meters")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_RADIUS_METERS);

    let mut nearby: Vec<(f64, Suggestion)> = state
        .fixtures
        .iter()
        .filter(|f| f.kind == "address")
        .filter_map(|f| {
            let data = &f.suggestion.data;
            let geo_lat = data.get("geo_lat")?.as_str()?.parse::<f64>().ok()?;
            let geo_lon = data.get("geo_lon")?.as_str()?.parse::<f64>().ok()?;
            let distance = haversine_meters(lat, lon, geo_lat, geo_lon);
            (distance <= radius).then(|| (distance, f.suggestion.clone()))
        })
        .collect();
    nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
    info!(lat, lon, radius, found = nearby.len(), "geolocate/address");

    let found = nearby.into_iter().map(|(_, s)| s).collect();
    Ok(respond(found, count(&params)))
}

fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
}

const KINDS: [&str; 13] = [
    "party",
    "address",
    "bank",
    "fio",
    "email",
    "fms_unit",
    "fns_unit",
    "postal_office",
    "region_court",
    "country",
    "currency",
    "okved2",
    "okpd2",
];

fn fixture(kind: &'static str, value: &str, unrestricted: &str, data: Value) -> Fixture {
    Fixture {
        kind,
        suggestion: Suggestion {
            value: value.to_string(),
            unrestricted_value: unrestricted.to_string(),
            data,
        },
    }
}

fn fixtures() -> Vec<Fixture> {
    vec![
        fixture(
            "address",
            "г Москва, ул Сухонская, д 11",
            "127642, г Москва, р-н Северное Медведково, ул Сухонская, д 11",
            json!({"postal_code": "127642", "city": "Москва", "street": "Сухонская", "house": "11",
                   "geo_lat": "55.8782557", "geo_lon": "37.65372"}),
        ),
        fixture(
            "address",
            "г Москва, ул Сухонская, д 13",
            "127642, г Москва, р-н Северное Медведково, ул Сухонская, д 13",
            json!({"postal_code": "127642", "city": "Москва", "street": "Сухонская", "house": "13",
                   "geo_lat": "55.8785009", "geo_lon": "37.6540227"}),
        ),
        fixture(
            "address",
            "г Санкт-Петербург, Невский пр-кт, д 28",
            "191186, г Санкт-Петербург, Центральный р-н, Невский пр-кт, д 28",
            json!({"postal_code": "191186", "city": "Санкт-Петербург", "street": "Невский", "house": "28",
                   "geo_lat": "59.9357", "geo_lon": "30.3259"}),
        ),
        fixture(
            "party",
            "ПАО СБЕРБАНК",
            "ПАО СБЕРБАНК",
            json!({"inn": "7707083893", "ogrn": "1027700132195", "hid": "145a83ab38c9ad95889a7b894ff57c8e",
                   "type": "LEGAL", "branch_type": "MAIN"}),
        ),
        fixture(
            "party",
            "ООО ЯНДЕКС",
            "ООО ЯНДЕКС",
            json!({"inn": "7736207543", "ogrn": "1027700229193", "hid": "ef8e2ee52d1e9b6ef7b3ad7f6a2ba0dd",
                   "type": "LEGAL", "branch_type": "MAIN"}),
        ),
        fixture(
            "bank",
            "ПАО Сбербанк",
            "ПАО Сбербанк",
            json!({"bic": "044525225", "swift": "SABRRUMM"}),
        ),
        fixture(
            "fio",
            "Иванов Иван Иванович",
            "Иванов Иван Иванович",
            json!({"surname": "Иванов", "name": "Иван", "patronymic": "Иванович", "gender": "MALE"}),
        ),
        fixture(
            "email",
            "ivan@example.com",
            "ivan@example.com",
            json!({"local": "ivan", "domain": "example.com"}),
        ),
        fixture("country", "Россия", "Российская Федерация", json!({"code": "643", "alfa2": "RU"})),
        fixture("currency", "Рубль", "Российский рубль", json!({"code": "643", "strcode": "RUB"})),
    ]
}
