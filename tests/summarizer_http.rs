// tests/summarizer_http.rs
//
// Summarizer clients against a local fake inference endpoint.

mod common;

use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use common::serve;
use personal_news::config::{SummarizerConfig, SummarizerKind};
use personal_news::summarize::{build_summarizer, SummarizeError};
use serde_json::{json, Value};

const MODEL: &str = "facebook/bart-large-cnn";

/// Fake HF endpoint answering with a fixed status and raw body.
async fn hf_upstream(status: StatusCode, body: &'static str) -> SummarizerConfig {
    let app = Router::new().route(
        &format!("/models/{MODEL}"),
        post(move || async move { (status, body) }),
    );
    SummarizerConfig {
        kind: SummarizerKind::HuggingFace,
        api_key: Some("hf-test".into()),
        base_url: Some(serve(app).await),
        model: None,
    }
}

#[tokio::test]
async fn hf_list_response_uses_first_candidate() {
    let cfg = hf_upstream(
        StatusCode::OK,
        r#"[{"summary_text":"  Stocks rose.  "},{"summary_text":"ignored"}]"#,
    )
    .await;
    let out = build_summarizer(&cfg).summarize("long article").await.unwrap();
    assert_eq!(out, "Stocks rose.");
}

#[tokio::test]
async fn hf_single_object_response_is_accepted() {
    let cfg = hf_upstream(StatusCode::OK, r#"{"summary_text":"One liner."}"#).await;
    let out = build_summarizer(&cfg).summarize("text").await.unwrap();
    assert_eq!(out, "One liner.");
}

#[tokio::test]
async fn hf_empty_list_or_blank_text_is_empty_summary() {
    for body in ["[]", r#"[{"summary_text":"   "}]"#, r#"[{"label":"x"}]"#] {
        let cfg = hf_upstream(StatusCode::OK, body).await;
        let err = build_summarizer(&cfg).summarize("text").await.unwrap_err();
        assert!(matches!(err, SummarizeError::EmptySummary), "body {body}: {err:?}");
    }
}

#[tokio::test]
async fn hf_non_success_status_is_upstream_error() {
    let cfg = hf_upstream(
        StatusCode::SERVICE_UNAVAILABLE,
        r#"{"error":"Model is currently loading"}"#,
    )
    .await;
    match build_summarizer(&cfg).summarize("text").await {
        Err(SummarizeError::UpstreamError { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("loading"));
        }
        other => panic!("expected UpstreamError, got {other:?}"),
    }
}

#[tokio::test]
async fn hf_garbage_body_is_malformed() {
    let cfg = hf_upstream(StatusCode::OK, "<html>gateway</html>").await;
    let err = build_summarizer(&cfg).summarize("text").await.unwrap_err();
    assert!(matches!(err, SummarizeError::MalformedResponse(_)));
}

#[tokio::test]
async fn hf_sends_bearer_key_and_inputs() {
    let app = Router::new().route(
        &format!("/models/{MODEL}"),
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            if auth != "Bearer hf-secret" {
                return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })));
            }
            let echoed = format!("echo: {}", body["inputs"].as_str().unwrap_or_default());
            (StatusCode::OK, Json(json!([{ "summary_text": echoed }])))
        }),
    );
    let cfg = SummarizerConfig {
        kind: SummarizerKind::HuggingFace,
        api_key: Some("hf-secret".into()),
        base_url: Some(serve(app).await),
        model: None,
    };
    let out = build_summarizer(&cfg).summarize("Rates unchanged").await.unwrap();
    assert_eq!(out, "echo: Rates unchanged");
}

#[tokio::test]
async fn missing_key_fails_before_any_request() {
    // Unroutable base: a request would surface as TransportFailure instead.
    let cfg = SummarizerConfig {
        kind: SummarizerKind::HuggingFace,
        api_key: None,
        base_url: Some("http://127.0.0.1:9".into()),
        model: None,
    };
    let err = build_summarizer(&cfg).summarize("text").await.unwrap_err();
    assert!(matches!(err, SummarizeError::ConfigurationMissing));

    let blank = SummarizerConfig {
        api_key: Some("   ".into()),
        ..cfg
    };
    let err = build_summarizer(&blank).summarize("text").await.unwrap_err();
    assert!(matches!(err, SummarizeError::ConfigurationMissing));
}

#[tokio::test]
async fn empty_input_is_rejected_locally() {
    let cfg = SummarizerConfig {
        kind: SummarizerKind::OpenAi,
        api_key: Some("k".into()),
        base_url: Some("http://127.0.0.1:9".into()),
        model: None,
    };
    let err = build_summarizer(&cfg).summarize("  \n ").await.unwrap_err();
    assert!(matches!(err, SummarizeError::EmptyInput));
}

#[tokio::test]
async fn unreachable_upstream_is_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let cfg = SummarizerConfig {
        kind: SummarizerKind::HuggingFace,
        api_key: Some("k".into()),
        base_url: Some(format!("http://{addr}")),
        model: None,
    };
    let err = build_summarizer(&cfg).summarize("text").await.unwrap_err();
    assert!(matches!(err, SummarizeError::TransportFailure(_)));
}

#[tokio::test]
async fn openai_chat_choice_is_used() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|Json(body): Json<Value>| async move {
            let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
            let ok = prompt.starts_with("Summarize the following article:")
                && body["max_tokens"] == 150
                && body["model"] == "gpt-4o-mini";
            if !ok {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad request" })));
            }
            (
                StatusCode::OK,
                Json(json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": " Fed holds rates. " } },
                        { "message": { "role": "assistant", "content": "second" } }
                    ]
                })),
            )
        }),
    );
    let cfg = SummarizerConfig {
        kind: SummarizerKind::OpenAi,
        api_key: Some("sk-test".into()),
        base_url: Some(serve(app).await),
        model: None,
    };
    let summarizer = build_summarizer(&cfg);
    assert_eq!(summarizer.name(), "openai");
    let out = summarizer.summarize("The Fed kept rates steady.").await.unwrap();
    assert_eq!(out, "Fed holds rates.");
}

#[tokio::test]
async fn openai_without_choices_is_empty_summary() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) }),
    );
    let cfg = SummarizerConfig {
        kind: SummarizerKind::OpenAi,
        api_key: Some("sk-test".into()),
        base_url: Some(serve(app).await),
        model: None,
    };
    let err = build_summarizer(&cfg).summarize("text").await.unwrap_err();
    assert!(matches!(err, SummarizeError::EmptySummary));
}
