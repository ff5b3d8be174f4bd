use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, SuggestionsBody, API_PREFIX, BOOM_QUERY};
use tower::ServiceExt;

const TOKEN: &str = "test-token";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(path: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(format!("{API_PREFIX}{path}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, format!("Token {TOKEN}"))
        .body(body.to_string())
        .unwrap()
}

async fn send(request: Request<String>) -> axum::response::Response {
    app(TOKEN).oneshot(request).await.unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = send(
        Request::builder()
            .method("POST")
            .uri(format!("{API_PREFIX}/suggest/address"))
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(r#"{"query":"москва"}"#.to_string())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_token_returns_403() {
    let resp = send(
        Request::builder()
            .method("POST")
            .uri(format!("{API_PREFIX}/suggest/address"))
            .header(http::header::CONTENT_TYPE, "application/json")
            .header(http::header::AUTHORIZATION, "Token nope")
            .body(r#"{"query":"москва"}"#.to_string())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn get_returns_405() {
    let resp = send(
        Request::builder()
            .uri(format!("{API_PREFIX}/findById/party"))
            .header(http::header::AUTHORIZATION, format!("Token {TOKEN}"))
            .body(String::new())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- request shape ---

#[tokio::test]
async fn malformed_json_returns_400() {
    let resp = send(json_request("/suggest/address", "{not json")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(json_request("/suggest/address", "[1,2]")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_type_returns_400() {
    let resp = send(json_request("/suggest/spaceship", r#"{"query":"x"}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn count_over_limit_returns_413() {
    let resp = send(json_request("/suggest/address", r#"{"query":"москва","count":21}"#)).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn long_query_returns_413() {
    let body = serde_json::json!({ "query": "я".repeat(301) }).to_string();
    let resp = send(json_request("/suggest/fio", &body)).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn boom_query_returns_500() {
    let body = serde_json::json!({ "query": BOOM_QUERY }).to_string();
    let resp = send(json_request("/suggest/party", &body)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- suggest ---

#[tokio::test]
async fn suggest_address_matches_substring() {
    let resp = send(json_request("/suggest/address", r#"{"query":"сухонская"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: SuggestionsBody = body_json(resp).await;
    let values: Vec<_> = body.suggestions.iter().map(|s| s.value.as_str()).collect();
    assert_eq!(
        values,
        vec!["г Москва, ул Сухонская, д 11", "г Москва, ул Сухонская, д 13"]
    );
}

#[tokio::test]
async fn suggest_respects_count() {
    let resp = send(json_request("/suggest/address", r#"{"query":"москва","count":1}"#)).await;
    let body: SuggestionsBody = body_json(resp).await;
    assert_eq!(body.suggestions.len(), 1);
}

#[tokio::test]
async fn suggest_without_match_is_empty() {
    let resp = send(json_request("/suggest/bank", r#"{"query":"несуществующий"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], br#"{"suggestions":[]}"#);
}

// --- findById ---

#[tokio::test]
async fn find_party_by_inn_and_ogrn() {
    for id in ["7707083893", "1027700132195"] {
        let body = serde_json::json!({ "query": id }).to_string();
        let resp = send(json_request("/findById/party", &body)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: SuggestionsBody = body_json(resp).await;
        assert_eq!(body.suggestions.len(), 1, "{id}");
        assert_eq!(body.suggestions[0].value, "ПАО СБЕРБАНК");
    }
}

#[tokio::test]
async fn find_party_partial_id_finds_nothing() {
    let resp = send(json_request("/findById/party", r#"{"query":"77070"}"#)).await;
    let body: SuggestionsBody = body_json(resp).await;
    assert!(body.suggestions.is_empty());
}

// --- geolocate ---

#[tokio::test]
async fn geolocate_returns_nearest_first() {
    let resp = send(json_request(
        "/geolocate/address",
        r#"{"lat":55.8785,"lon":37.6540,"radius_meters":100}"#,
    ))
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: SuggestionsBody = body_json(resp).await;
    let values: Vec<_> = body.suggestions.iter().map(|s| s.value.as_str()).collect();
    assert_eq!(
        values,
        vec!["г Москва, ул Сухонская, д 13", "г Москва, ул Сухонская, д 11"]
    );
}

#[tokio::test]
async fn geolocate_outside_radius_is_empty() {
    let resp = send(json_request("/geolocate/address", r#"{"lat":55.0,"lon":37.0}"#)).await;
    let body: SuggestionsBody = body_json(resp).await;
    assert!(body.suggestions.is_empty());
}

#[tokio::test]
async fn geolocate_without_coordinates_returns_400() {
    let resp = send(json_request("/geolocate/address", r#"{"lat":55.0}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
