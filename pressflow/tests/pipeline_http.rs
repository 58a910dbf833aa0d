use pressflow::cancellation::CancellationToken;
use pressflow::config::{GenerationConfig, PacingConfig, RunConfig};
use pressflow::core::{GeneratedArticle, Tone};
use pressflow::errors::PipelineError;
use pressflow::events::CollectingEventSink;
use pressflow::pipeline::run_pipeline;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{"text": text, "index": 0}]
    }))
}

async fn completions_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .and(body_string_contains("about coffee and history"))
        .respond_with(completion("\"Coffee Through the Ages\""))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .and(body_string_contains("about coffee and health"))
        .respond_with(completion("Coffee and Your Heart"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .and(body_partial_json(serde_json::json!({"max_tokens": 1000})))
        .respond_with(completion("\n\nA well-researched article."))
        .mount(&server)
        .await;
    server
}

async fn mount_login(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/wp-json/jwt-auth/v1/token"))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(serde_json::json!({"token": "jwt-abc"})),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_categories(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 3, "name": "News"},
            {"id": 7, "name": "Blog"}
        ])))
        .mount(server)
        .await;
}

fn config(completions: &MockServer, cms: &MockServer) -> RunConfig {
    RunConfig::builder()
        .keywords_text("coffee")
        .topics_text("history, health")
        .tone(Tone::Informative)
        .api_key("sk-test")
        .domain(cms.uri())
        .username("admin")
        .password("hunter2")
        .category("Blog")
        .generation(GenerationConfig::default().with_base_url(completions.uri()))
        .pacing(PacingConfig::disabled())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_coffee_run_end_to_end() {
    let completions = completions_server().await;
    let cms = MockServer::start().await;
    mount_login(&cms, 200).await;
    mount_categories(&cms).await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(header("authorization", "Bearer jwt-abc"))
        .and(body_partial_json(serde_json::json!({"status": "publish", "categories": [7]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 1})))
        .expect(2)
        .mount(&cms)
        .await;

    let sink = Arc::new(CollectingEventSink::new());
    let report = run_pipeline(
        &config(&completions, &cms),
        sink.clone(),
        Arc::new(CancellationToken::new()),
    )
    .await
    .unwrap();

    assert_eq!(
        report.articles,
        vec![
            GeneratedArticle::new("Coffee Through the Ages", "A well-researched article."),
            GeneratedArticle::new("Coffee and Your Heart", "A well-researched article."),
        ]
    );
    assert_eq!(report.results.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(sink.events_of_type("publish.batch_started").len(), 1);
    assert!(sink
        .messages()
        .contains(&"Login was successful, about to post the articles!".to_string()));
}

#[tokio::test]
async fn test_rejected_login_makes_no_post_calls() {
    let completions = completions_server().await;
    let cms = MockServer::start().await;
    mount_login(&cms, 403).await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&cms)
        .await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/posts"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&cms)
        .await;

    let err = run_pipeline(
        &config(&completions, &cms),
        Arc::new(CollectingEventSink::new()),
        Arc::new(CancellationToken::new()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, PipelineError::Auth(_)));
}

#[tokio::test]
async fn test_completion_outage_aborts_before_login() {
    let completions = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .expect(1)
        .mount(&completions)
        .await;
    let cms = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/jwt-auth/v1/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&cms)
        .await;

    let err = run_pipeline(
        &config(&completions, &cms),
        Arc::new(CollectingEventSink::new()),
        Arc::new(CancellationToken::new()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.stage(), "generation");
}

#[tokio::test]
async fn test_pre_cancelled_run_touches_nothing() {
    let completions = MockServer::start().await;
    let cms = MockServer::start().await;
    let cancel = Arc::new(CancellationToken::new());
    cancel.cancel("stopped before start");

    let report = run_pipeline(
        &config(&completions, &cms),
        Arc::new(CollectingEventSink::new()),
        cancel,
    )
    .await
    .unwrap();

    assert!(report.articles.is_empty());
    assert!(report.results.is_empty());
    assert_eq!(report.cancelled.as_deref(), Some("stopped before start"));
    assert!(completions.received_requests().await.unwrap().is_empty());
    assert!(cms.received_requests().await.unwrap().is_empty());
}
