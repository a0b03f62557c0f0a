//! OllamaClient against an in-process mock of the Ollama HTTP API.

use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use cafeqa_llm::{LanguageModel, LlmError, OllamaClient, OllamaConfig};
use serde_json::{json, Value};

type Captured = Arc<Mutex<Vec<Value>>>;

async fn spawn_mock(status: StatusCode, reply: Value) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route(
            "/api/generate",
            post(
                move |State(seen): State<Captured>, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        seen.lock().unwrap().push(body);
                        (status, Json(reply))
                    }
                },
            ),
        )
        .with_state(Arc::clone(&captured));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), captured)
}

fn client_for(base_url: String) -> OllamaClient {
    OllamaClient::new(OllamaConfig {
        model: "gpt-oss:120b-cloud".to_string(),
        base_url,
        temperature: 0.5,
    })
    .unwrap()
}

#[tokio::test]
async fn generate_returns_response_text() {
    let (url, captured) = spawn_mock(
        StatusCode::OK,
        json!({"model": "gpt-oss:120b-cloud", "response": "Método manual de filtrado.", "done": true}),
    )
    .await;

    let answer = client_for(url)
        .generate("Contesta en 10 palabras: ¿qué es un pour-over?")
        .await
        .unwrap();
    assert_eq!(answer, "Método manual de filtrado.");

    let seen = captured.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["model"], "gpt-oss:120b-cloud");
    assert_eq!(seen[0]["prompt"], "Contesta en 10 palabras: ¿qué es un pour-over?");
    assert_eq!(seen[0]["stream"], false);
    assert_eq!(seen[0]["options"]["temperature"], 0.5);
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let (url, _) = spawn_mock(
        StatusCode::NOT_FOUND,
        json!({"error": "model 'gpt-oss:120b-cloud' not found"}),
    )
    .await;

    let err = client_for(url).generate("hola").await.unwrap_err();
    match err {
        LlmError::Api { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let (url, _) = spawn_mock(StatusCode::OK, json!({"unexpected": true})).await;

    let err = client_for(url).generate("hola").await.unwrap_err();
    assert!(matches!(err, LlmError::Decode(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_network_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(format!("http://{addr}"))
        .generate("hola")
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Network(_)));
}
