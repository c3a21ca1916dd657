use std::io::Write;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use globalbot_api::{build_app, ApiConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    build_app(&ApiConfig::default())
        .await
        .expect("app should build")
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn chat_request(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/chat")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_catalog_size() {
    let response = app()
        .await
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["catalog"]["destinations"], 12);
    assert_eq!(parsed["catalog"]["source"], "bundled");
}

#[tokio::test]
async fn chat_returns_destination_answer_with_metadata() {
    let response = app()
        .await
        .oneshot(chat_request(json!({ "text": "3-day Japan with food picks" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;

    assert_eq!(parsed["branch"], "destination");
    assert_eq!(parsed["destination"], "Japan");
    assert_eq!(parsed["days"], 3);
    assert_eq!(parsed["transcript_len"], 3);
    assert_eq!(
        parsed["lines"][0],
        "Here is a 3-day take for Japan (Asia):"
    );
    assert!(parsed["reply_text"]
        .as_str()
        .unwrap()
        .contains("Fushimi Inari Shrine and Mount Fuji"));
    assert!(parsed["session_id"].as_str().is_some());
}

#[tokio::test]
async fn blank_chat_is_rejected() {
    let response = app()
        .await
        .oneshot(chat_request(json!({ "text": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = body_json(response).await;
    assert_eq!(parsed["error"], "empty_message");
}

#[tokio::test]
async fn session_transcript_follows_chat_turns() {
    let app = app().await;

    let first = app
        .clone()
        .oneshot(chat_request(json!({ "text": "How much does a trip cost?" })))
        .await
        .unwrap();
    let first = body_json(first).await;
    assert_eq!(first["branch"], "budget_guide");
    let session_id = first["session_id"].as_str().unwrap().to_string();

    let second = app
        .clone()
        .oneshot(chat_request(json!({
            "text": "Can you build an itinerary?",
            "session_id": &session_id
        })))
        .await
        .unwrap();
    let second = body_json(second).await;
    assert_eq!(second["branch"], "itinerary_skeleton");

    let transcript = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/v1/session?session_id={session_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(transcript.status(), StatusCode::OK);

    let transcript = body_json(transcript).await;
    let messages = transcript["messages"].as_array().unwrap();
    let roles = messages
        .iter()
        .map(|message| message["role"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(roles, vec!["bot", "user", "bot", "user", "bot"]);
    assert_eq!(messages[1]["text"], "How much does a trip cost?");
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let response = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/v1/session?session_id=missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn prompts_use_first_three_destinations() {
    let response = app()
        .await
        .oneshot(Request::builder().uri("/v1/prompts").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    assert_eq!(
        parsed["prompts"],
        json!([
            "3-day Japan with food picks",
            "Best time to visit Italy",
            "Budget for Peru in summer",
            "Weekend plan: top 5 must-dos"
        ])
    );
    assert!(parsed["greeting"].as_str().unwrap().starts_with("Hi, I am Globalbot"));
}

#[tokio::test]
async fn destinations_filter_by_region() {
    let response = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/v1/destinations?region=Asia")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    let destinations = parsed["destinations"].as_array().unwrap();
    assert!(!destinations.is_empty());
    assert!(destinations.iter().all(|d| d["region"] == "Asia"));
    assert_eq!(destinations[0]["key"], "japan");
    assert!(destinations[0]["bestTime"].is_string());
}

#[tokio::test]
async fn custom_catalog_file_drives_answers() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"name": "Bali", "region": "Asia", "bestTime": "Apr-Oct", "avgCost": "$900",
            "rating": 4.7, "reviews": 812, "highlights": ["Uluwatu"]}},
           {{"region": "Nowhere"}}]"#
    )
    .unwrap();

    let config = ApiConfig {
        catalog_path: Some(file.path().to_path_buf()),
        ..ApiConfig::default()
    };
    let app = build_app(&config).await.expect("app should build");

    let health = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let health = body_json(health).await;
    assert_eq!(health["catalog"]["destinations"], 1);
    assert_eq!(health["catalog"]["skipped"], 1);
    assert_eq!(health["metrics"]["skipped_records_total"], 1);

    let reply = app
        .oneshot(chat_request(json!({ "text": "Bali weather?" })))
        .await
        .unwrap();
    let reply = body_json(reply).await;
    assert_eq!(reply["destination"], "Bali");
    assert_eq!(
        reply["lines"][1],
        "- Best window: Apr-Oct (best weather + lighter crowds)"
    );
}

#[tokio::test]
async fn destination_lookup_by_id() {
    let app = app().await;

    let found = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/destination?id=4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(found.status(), StatusCode::OK);
    let parsed = body_json(found).await;
    assert_eq!(parsed["name"], "Peru");
    assert_eq!(parsed["highlights"][0], "Machu Picchu");

    let missing = app
        .oneshot(
            Request::builder()
                .uri("/v1/destination?id=404")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
