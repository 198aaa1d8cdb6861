use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use loadout::config::OptimizerConfig;
use loadout::server::api::ApiState;
use loadout::server::router;
use loadout::server::routes::route_request;

fn two_slot_state() -> ApiState {
    let mut config = OptimizerConfig::default();
    config.slots = vec!["Belt".to_string(), "Necklace".to_string()];
    ApiState::new(config)
}

const OPTIMIZE_BODY: &str = r#"{
    "slots": [
        {"slot": "Belt", "items": [
            {"name": "Iron Belt", "attributes": {"Agility": 10, "Stamina": 600, "Hit Rating": 200, "Expertise Rating": 60, "Price": "100g"}},
            {"name": "Rope Belt", "attributes": {"Agility": 2, "Stamina": 500, "Hit Rating": 150, "Expertise Rating": 50, "Price": "50g"}}
        ]},
        {"slot": "Necklace", "items": [
            {"name": "Gold Chain", "attributes": {"Strength": 8, "Stamina": 500, "Hit Rating": 150, "Expertise Rating": 50, "Price": "200g"}}
        ]}
    ]
}"#;

#[test]
fn health_endpoint_returns_ok_json() {
    let response = route_request(&ApiState::default(), "GET", "/api/health", "");
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    assert!(response.body.contains("\"status\": \"ok\""));
    assert!(response.body.contains("loadout-api"));
}

#[test]
fn config_endpoint_exposes_effective_tables() {
    let response = route_request(&two_slot_state(), "GET", "/api/config", "");
    assert_eq!(response.status_code, 200);

    let payload: serde_json::Value =
        serde_json::from_str(&response.body).expect("response should be valid json");
    assert_eq!(payload["slots"], serde_json::json!(["Belt", "Necklace"]));
    assert_eq!(payload["constraints"]["Stamina"].as_f64(), Some(1000.0));
}

#[test]
fn optimize_endpoint_returns_ranked_builds() {
    let response = route_request(&two_slot_state(), "POST", "/api/optimize", OPTIMIZE_BODY);
    assert_eq!(response.status_code, 200, "{}", response.body);

    let payload: serde_json::Value =
        serde_json::from_str(&response.body).expect("response should be valid json");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["strategy"], "ranked");

    let builds = payload["results"].as_array().expect("results should be an array");
    assert!(!builds.is_empty());
    let first = &builds[0];
    assert_eq!(first["build"]["Belt"]["name"], "Iron Belt");
    assert_eq!(first["cost"].as_f64(), Some(300.0));
    assert_eq!(first["constraints"]["Stamina"].as_f64(), Some(1100.0));

    let powers: Vec<f64> = builds
        .iter()
        .map(|build| build["power"].as_f64().expect("power should be numeric"))
        .collect();
    assert!(powers.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn optimize_endpoint_runs_scan_strategy() {
    let body = OPTIMIZE_BODY.replacen('{', r#"{"strategy": "scan","#, 1);
    let response = route_request(&two_slot_state(), "POST", "/api/optimize", &body);
    assert_eq!(response.status_code, 200, "{}", response.body);

    let payload: serde_json::Value =
        serde_json::from_str(&response.body).expect("response should be valid json");
    assert_eq!(payload["strategy"], "per_objective");
    let results = payload["results"].as_array().expect("results should be an array");
    assert_eq!(results.len(), 3);

    let cheapest = results
        .iter()
        .find(|result| result["objective"] == "cost")
        .expect("cost objective should be reported");
    assert_eq!(cheapest["build"]["build"]["Belt"]["name"], "Rope Belt");
    assert_eq!(cheapest["build"]["cost"].as_f64(), Some(250.0));
}

#[test]
fn optimize_endpoint_rejects_out_of_range_limits() {
    let body = r#"{"slots": [], "max_builds": 0}"#;
    let response = route_request(&two_slot_state(), "POST", "/api/optimize", body);
    assert_eq!(response.status_code, 400);

    let payload: serde_json::Value =
        serde_json::from_str(&response.body).expect("response should be valid json");
    assert_eq!(payload["status"], "error");
    let fields: Vec<&str> = payload["errors"]
        .as_array()
        .expect("errors should be an array")
        .iter()
        .filter_map(|issue| issue["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["slots", "max_builds"]);
}

#[test]
fn optimize_endpoint_rejects_repeated_slot_names() {
    let body = r#"{
        "slots": [
            {"slot": "Belt", "items": [
                {"name": "a0", "attributes": {"Agility": 100}},
                {"name": "a1", "attributes": {"Agility": 90}}
            ]},
            {"slot": "Belt", "items": [
                {"name": "b0", "attributes": {"Agility": 10}},
                {"name": "b1", "attributes": {"Agility": 5}}
            ]}
        ]
    }"#;
    let response = route_request(&two_slot_state(), "POST", "/api/optimize", body);
    assert_eq!(response.status_code, 400, "{}", response.body);

    let payload: serde_json::Value =
        serde_json::from_str(&response.body).expect("response should be valid json");
    let issues = payload["errors"].as_array().expect("errors should be an array");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["field"], "slots");
    assert!(issues[0]["messages"][0]
        .as_str()
        .is_some_and(|message| message.contains("'Belt'")));
}

#[test]
fn optimize_endpoint_accepts_unlisted_slots() {
    let body = r#"{"slots": [{"slot": "Trinket", "items": [{"name": "Charm", "attributes": {"Stamina": 1000, "Hit Rating": 300, "Expertise Rating": 100}}]}]}"#;
    let response = route_request(&two_slot_state(), "POST", "/api/optimize", body);
    assert_eq!(response.status_code, 200, "{}", response.body);

    let payload: serde_json::Value =
        serde_json::from_str(&response.body).expect("response should be valid json");
    assert_eq!(payload["results"][0]["build"]["Trinket"]["name"], "Charm");
}

#[test]
fn optimize_endpoint_rejects_malformed_json() {
    let response = route_request(&two_slot_state(), "POST", "/api/optimize", "{not json");
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("Invalid request body"));
}

#[test]
fn score_endpoint_returns_power_and_cost() {
    let body = r#"{"name": "Rope Belt", "attributes": {"Agility": 2, "Stamina": 500, "Price": "50g"}}"#;
    let response = route_request(&ApiState::default(), "POST", "/api/score", body);
    assert_eq!(response.status_code, 200, "{}", response.body);

    let payload: serde_json::Value =
        serde_json::from_str(&response.body).expect("response should be valid json");
    assert_eq!(payload["name"], "Rope Belt");
    assert_eq!(payload["cost"].as_f64(), Some(50.0));
    assert_eq!(payload["constraints"]["Stamina"].as_f64(), Some(500.0));
}

#[tokio::test]
async fn router_serves_health_over_axum() {
    let app = router(ApiState::default());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let payload: serde_json::Value =
        serde_json::from_slice(&body).expect("response should be valid json");
    assert_eq!(payload["status"], "ok");
}

#[tokio::test]
async fn router_maps_unknown_paths_to_not_found() {
    let app = router(ApiState::default());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/missing")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
