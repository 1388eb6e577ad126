use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use mllm_editor_core::{ChatReply, ContentItem};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    items: Vec<ContentItem>,
}

async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatReply>, ApiError> {
    let has_empty_image = body.items.iter().any(|item| match item {
        ContentItem::ImageUrl { image_url } => image_url.url.is_empty(),
        ContentItem::Text { .. } => false,
    });
    if has_empty_image {
        return Err(ApiError::BadRequest("image_url.url cannot be empty".to_string()));
    }

    tracing::info!(items = body.items.len(), model = state.model.model(), "forwarding to model");
    let reply = state.model.complete(&body.items).await?;

    Ok(Json(ChatReply { reply }))
}

#[cfg(test)]
mod tests {
    use crate::routes::create_router;
    use crate::settings::AppConfig;
    use crate::state::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Stand-in for the model server: echoes the first text part back
    async fn fake_upstream(status: StatusCode) -> String {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move |Json(body): Json<Value>| async move {
                let first = body["messages"][0]["content"][0]["text"]
                    .as_str()
                    .unwrap_or("")
                    .to_string();
                let parts = body["messages"][0]["content"]
                    .as_array()
                    .map(|a| a.len())
                    .unwrap_or(0);
                let reply = json!({
                    "choices": [{ "message": { "content": format!("{first} ({parts} parts)") } }]
                });
                (status, Json(reply))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn app(upstream_url: String) -> Router {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            upstream_url,
            model: "qwen3-vl".to_string(),
            api_key: "EMPTY".to_string(),
            timeout_secs: 5,
        };
        create_router(AppState::new(&config).unwrap())
    }

    async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_chat_forwards_items_and_returns_reply() {
        let app = app(fake_upstream(StatusCode::OK).await);
        let (status, body) = post_chat(
            app,
            json!({ "items": [
                { "type": "text", "text": "Hi" },
                { "type": "image_url", "image_url": { "url": "http://x/a.png" } },
            ]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "reply": "Hi (2 parts)" }));
    }

    #[tokio::test]
    async fn test_empty_image_url_rejected() {
        let app = app(fake_upstream(StatusCode::OK).await);
        let (status, body) = post_chat(
            app,
            json!({ "items": [{ "type": "image_url", "image_url": { "url": "" } }] }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("image_url"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let app = app(fake_upstream(StatusCode::BAD_GATEWAY).await);
        let (status, body) = post_chat(app, json!({ "items": [{ "type": "text", "text": "Hi" }] })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("model server error"));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_503() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let app = app(format!("http://{addr}/v1"));
        let (status, _) = post_chat(app, json!({ "items": [{ "type": "text", "text": "Hi" }] })).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health() {
        let app = app("http://127.0.0.1:9/v1".to_string());
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "status": "ok" }));
    }
}
