//! Provider calls and health probes against a fake Generative Language API.

use ai_llm_service::{AiLlmError, LlmModelConfig, LlmProvider, LlmServiceProfiles};
use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};

const KEY: &str = "test-key";

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) == Some(KEY)
}

async fn model_action(
    Path(action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, "API key not valid").into_response();
    }
    if action.ends_with(":generateContent") {
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
        if prompt.contains("overloaded") {
            return (StatusCode::SERVICE_UNAVAILABLE, "model overloaded").into_response();
        }
        Json(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Dr. Lee "}, {"text": "is great."}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        }))
        .into_response()
    } else if action.ends_with(":batchEmbedContents") {
        let n = body["requests"].as_array().map(Vec::len).unwrap_or(0);
        let embeddings: Vec<Value> = (0..n).map(|i| json!({"values": [i as f32, 0.5]})).collect();
        Json(json!({"embeddings": embeddings})).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn model_info(Path(model): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, "API key not valid").into_response();
    }
    Json(json!({"name": format!("models/{model}")})).into_response()
}

async fn serve() -> String {
    let app = Router::new().route("/v1beta/models/{action}", get(model_info).post(model_action));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn gemini(endpoint: &str, model: &str, key: &str) -> LlmModelConfig {
    LlmModelConfig {
        provider: LlmProvider::Gemini,
        model: model.into(),
        endpoint: endpoint.into(),
        api_key: Some(key.into()),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(5),
    }
}

#[tokio::test]
async fn generates_and_embeds_through_profiles() {
    let base = serve().await;
    let llm = LlmServiceProfiles::new(
        gemini(&base, "gemini-1.5-flash", KEY),
        gemini(&base, "text-embedding-004", KEY),
        Some(5),
    )
    .unwrap();

    let out = llm.generate("Who teaches algorithms well?").await.unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].text, "Dr. Lee is great.");
    assert_eq!(out[0].finish_reason.as_deref(), Some("STOP"));

    let vectors = llm.embed(&["a".into(), "b".into(), "c".into()]).await.unwrap();
    assert_eq!(vectors, vec![vec![0.0, 0.5], vec![1.0, 0.5], vec![2.0, 0.5]]);
}

#[tokio::test]
async fn non_success_status_is_a_provider_error() {
    let base = serve().await;
    let cfg = gemini(&base, "gemini-1.5-flash", KEY);
    let llm = LlmServiceProfiles::new(cfg.clone(), cfg, None).unwrap();

    let err = llm.generate("overloaded please").await.unwrap_err();
    assert!(matches!(err, AiLlmError::Provider(_)));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn health_reports_each_distinct_profile() {
    let base = serve().await;
    let llm = LlmServiceProfiles::new(
        gemini(&base, "gemini-1.5-flash", KEY),
        gemini(&base, "text-embedding-004", "wrong-key"),
        Some(5),
    )
    .unwrap();

    let report = llm.health_all().await;
    assert_eq!(report.len(), 2);
    assert!(report[0].ok, "{}", report[0].message);
    assert_eq!(report[0].model.as_deref(), Some("gemini-1.5-flash"));
    assert!(!report[1].ok);
    assert!(report[1].message.contains("403"));
}
