use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use socialmate::clients::fetcher::{FetchRequest, PageFetcher, SourceError};
use socialmate::clients::openai::{CompletionRequest, LlmClient};
use socialmate::config::Config;
use socialmate::hashtags::Platform;
use socialmate::services::Clock;
use socialmate::state::{Collaborators, SharedState};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Serves canned bodies by URL substring; everything else is a 503.
#[derive(Default)]
struct StubFetcher {
    pages: HashMap<&'static str, String>,
    calls: AtomicUsize,
}

impl StubFetcher {
    fn with_page(mut self, url_part: &'static str, body: &str) -> Self {
        self.pages.insert(url_part, body.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .iter()
            .find(|(part, _)| request.url.contains(**part))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| SourceError::Status {
                source_name: request.source_name.clone(),
                status: 503,
            })
    }
}

/// Answers hashtag prompts with a tag list and anything else with a chat line.
#[derive(Default)]
struct StubLlm {
    requests: Mutex<Vec<CompletionRequest>>,
}

#[async_trait]
impl LlmClient for StubLlm {
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        let system = &request.messages[0].content;
        if system.contains("trend analysis expert") {
            Ok("#Morning #Coffee #Travel #Sunset #Foodie #Fitness #Nature #Style \
                #Motivation #Pets #Overflow"
                .to_string())
        } else {
            Ok("Post between 18:00 and 21:00 🚀".to_string())
        }
    }
}

struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

struct TestApp {
    router: Router,
    fetcher: Arc<StubFetcher>,
    llm: Arc<StubLlm>,
    clock: Arc<ManualClock>,
    config: Config,
}

async fn spawn_app(fetcher: StubFetcher) -> TestApp {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let fetcher = Arc::new(fetcher);
    let llm = Arc::new(StubLlm::default());
    let clock = Arc::new(ManualClock(Mutex::new(Utc::now())));

    let collaborators = Collaborators {
        fetcher: fetcher.clone(),
        llm: llm.clone(),
        clock: clock.clone(),
    };

    let shared = SharedState::with_collaborators(config.clone(), collaborators)
        .await
        .expect("Failed to create shared state");
    let state = socialmate::api::create_app_state(Arc::new(shared), None);

    TestApp {
        router: socialmate::api::router(state).await,
        fetcher,
        llm,
        clock,
        config,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn tags(body: &serde_json::Value) -> Vec<String> {
    body["data"]["hashtags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap().to_string())
        .collect()
}

const INSTAGRAM_PAGE: &str = r#"
<ul class="tag-box">
  <li>#love</li> <li>#photooftheday</li> <li>#fashion</li>
  <li>#beautiful</li> <li>#happy</li>
</ul>
<style>.x { color: #03a9f4; }</style>
"#;

#[tokio::test]
async fn test_unknown_platform_lists_valid_values() {
    let app = spawn_app(StubFetcher::default()).await;

    let (status, body) = send(&app.router, get("/api/hashtags?platform=facebook")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let message = body["error"].as_str().unwrap();
    for value in ["x", "instagram", "linkedin", "tiktok"] {
        assert!(message.contains(value), "{message} should list {value}");
    }

    for alias in ["twitter", "INSTAGRAM", "%20tiktok"] {
        let (status, _) = send(&app.router, get(&format!("/api/hashtags?platform={alias}"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{alias} should be rejected");
    }

    let (status, body) = send(&app.router, get("/api/hashtags")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("tiktok"));
}

#[tokio::test]
async fn test_live_source_tags_are_cached() {
    let app = spawn_app(
        StubFetcher::default().with_page("best-hashtags.com/hashtag/instagram", INSTAGRAM_PAGE),
    )
    .await;

    let (status, first) = send(&app.router, get("/api/hashtags?platform=instagram")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        tags(&first),
        vec!["love", "photooftheday", "fashion", "beautiful", "happy"]
    );
    assert_eq!(first["data"]["isEstimated"], false);
    assert_eq!(first["data"]["cached"], false);
    assert_eq!(first["data"]["source"], "best-hashtags");

    let (status, second) = send(&app.router, get("/api/hashtags?platform=instagram")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags(&second), tags(&first));
    assert_eq!(second["data"]["cached"], true);
    assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_expired_entry_runs_chain_again() {
    let app = spawn_app(
        StubFetcher::default().with_page("best-hashtags.com/hashtag/instagram", INSTAGRAM_PAGE),
    )
    .await;

    send(&app.router, get("/api/hashtags?platform=instagram")).await;
    assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 1);

    let ttl = app.config.hashtags.ttl_for(Platform::Instagram);
    app.clock
        .advance(chrono::Duration::from_std(ttl).unwrap() + chrono::Duration::minutes(1));

    let (status, body) = send(&app.router, get("/api/hashtags?platform=instagram")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cached"], false);
    assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_instagram_without_sources_uses_generator() {
    let app = spawn_app(StubFetcher::default()).await;

    let (status, body) = send(&app.router, get("/api/hashtags?platform=instagram")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isEstimated"], true);
    assert_eq!(body["data"]["source"], "generated");

    let tags = tags(&body);
    assert_eq!(tags.len(), 10);
    assert_eq!(tags[0], "morning");
    assert!(!tags.contains(&"overflow".to_string()));

    // Every Instagram listing site was tried first.
    assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_x_failure_asks_generator_with_x_prompt() {
    let app = spawn_app(StubFetcher::default()).await;

    let (status, body) = send(&app.router, get("/api/hashtags?platform=x")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isEstimated"], true);

    let tags = tags(&body);
    assert!(tags.len() <= 10);
    assert!(tags.iter().all(|t| *t == t.to_lowercase()));

    let requests = app.llm.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].messages[0].content.contains("X (Twitter)"));
}

#[tokio::test]
async fn test_agenda_duplicate_is_rejected() {
    let app = spawn_app(StubFetcher::default()).await;

    let item = serde_json::json!({
        "date": "2026-03-01",
        "title": "Launch teaser",
        "content": "Something new is coming 🚀",
        "platform": "instagram"
    });

    let (status, created) = send(&app.router, json_request("POST", "/api/agenda", item)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_i64().unwrap();

    let duplicate = serde_json::json!({
        "date": "2026-03-05",
        "title": "Again",
        "content": "  SOMETHING new is coming 🚀 ",
        "platform": "x"
    });
    let (status, body) = send(&app.router, json_request("POST", "/api/agenda", duplicate)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["data"]["existingItem"]["id"].as_i64(), Some(id));
    assert_eq!(body["data"]["existingItem"]["date"], "2026-03-01");

    let (status, body) = send(&app.router, get("/api/agenda?date=2026-03-01")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app.router,
        json_request(
            "PATCH",
            &format!("/api/agenda/{id}"),
            serde_json::json!({ "title": "Launch day" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/agenda/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app.router,
        json_request("PATCH", "/api/agenda/999", serde_json::json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_agenda_requires_all_fields() {
    let app = spawn_app(StubFetcher::default()).await;

    let (status, body) = send(
        &app.router,
        json_request("POST", "/api/agenda", serde_json::json!({ "title": "Only" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_chat_round_trip() {
    let app = spawn_app(StubFetcher::default()).await;

    let (status, created) = send(
        &app.router,
        json_request("POST", "/api/chats", serde_json::json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let chat_id = created["data"]["chatId"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/chat",
            serde_json::json!({
                "chatId": chat_id,
                "messages": [{ "role": "user", "content": "When should I post on Instagram?" }]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reply"], "Post between 18:00 and 21:00 🚀");

    let (status, history) = send(
        &app.router,
        get(&format!("/api/history?chatId={chat_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["data"]["total"], 3);

    let (_, chats) = send(&app.router, get("/api/chats")).await;
    assert_eq!(
        chats["data"][0]["title"],
        "When should I post on Instagram?"
    );

    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/chat", serde_json::json!({ "messages": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_system_status() {
    let app = spawn_app(StubFetcher::default()).await;

    let (status, body) = send(&app.router, get("/api/system/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database_ok"], true);
    assert!(body["data"]["version"].is_string());
}
