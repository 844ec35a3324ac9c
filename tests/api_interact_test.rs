//! Integration tests for the interact API endpoint

mod test_utils;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use kai::providers::Provider;
    use kai::relay::{RelayError, RelayRequest};
    use mockito::Matcher;
    use reqwest::{Client, RequestBuilder};
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    use crate::test_utils::{
        app_with, body_to_json, broken_store, gemini_provider, ollama_provider, test_app,
        test_store,
    };

    fn interact_request(body: Value) -> Request<Body> {
        Request::builder()
            .uri("/interact")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn greeting() -> Value {
        json!({
            "history": [
                {"role": "model", "parts": [{"text": "Share a thought."}]},
                {"role": "user", "parts": [{"text": "Hi"}]},
            ],
            "system_prompt": "Be terse.",
        })
    }

    async fn post(app: Router, body: Value) -> (StatusCode, Value) {
        let response = app.oneshot(interact_request(body)).await.unwrap();
        let status = response.status();
        (status, body_to_json(response.into_body()).await)
    }

    /// Tests relaying a conversation to the local provider
    #[tokio::test]
    async fn it_relays_to_the_local_provider() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(json!({
                "model": "llama3:8b",
                "stream": false,
                "prompt": "System Instruction: Be terse.\n\nConversation History:\nKai: Share a thought.\nUser: Hi\nKai:",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "  Hello there.  "}"#)
            .create_async()
            .await;

        let (app, _store) = test_app(&server.url()).await;
        let (status, body) = post(app, greeting()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"aiResponse": "Hello there."}));
        mock.assert_async().await;
    }

    /// Tests relaying a conversation to the cloud provider
    #[tokio::test]
    async fn it_relays_to_the_cloud_provider() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-api-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [
                    {"role": "model", "parts": [{"text": "Share a thought."}]},
                    {"role": "user", "parts": [{"text": "Hi"}]},
                ],
                "systemInstruction": {"parts": [{"text": "Be terse."}]},
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{"content": {"role": "model", "parts": [{"text": "Hello.\n"}]}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let app = app_with(gemini_provider(&server.url()), test_store().await);
        let (status, body) = post(app, greeting()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"aiResponse": "Hello."}));
        mock.assert_async().await;
    }

    /// Tests that invalid requests never reach the provider
    #[tokio::test]
    async fn it_rejects_invalid_requests() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .expect(0)
            .create_async()
            .await;

        let (app, _store) = test_app(&server.url()).await;

        let (status, body) = post(app.clone(), json!({"system_prompt": "Be terse."})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing conversation history"}));

        let (status, body) =
            post(app.clone(), json!({"history": [], "system_prompt": "Be terse."})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing conversation history"}));

        let (status, body) = post(
            app.clone(),
            json!({"history": [{"role": "user", "text": "Hi"}], "system_prompt": "   "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing system prompt"}));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/interact")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_to_json(response.into_body()).await,
            json!({"error": "Invalid request body"})
        );

        mock.assert_async().await;
    }

    /// Tests the message returned when the provider can't be reached
    #[tokio::test]
    async fn it_reports_an_unreachable_provider() {
        let (app, _store) = test_app("http://127.0.0.1:1").await;
        let (status, body) = post(app, greeting()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Could not connect to the AI engine. Is it running?"})
        );
    }

    /// Tests the message returned when the provider responds with an error
    #[tokio::test]
    async fn it_reports_a_provider_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let (app, _store) = test_app(&server.url()).await;
        let (status, body) = post(app, greeting()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to connect to the AI service."}));
    }

    /// Tests the message returned when the provider's response has no text
    #[tokio::test]
    async fn it_reports_a_malformed_provider_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"done": true}"#)
            .create_async()
            .await;

        let (app, _store) = test_app(&server.url()).await;
        let (status, body) = post(app, greeting()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Invalid response from the AI service."}));
    }

    /// Tests that the same request sent twice is relayed twice
    #[tokio::test]
    async fn it_relays_every_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Hello."}"#)
            .expect(2)
            .create_async()
            .await;

        let (app, _store) = test_app(&server.url()).await;
        let (first_status, first) = post(app.clone(), greeting()).await;
        let (second_status, second) = post(app, greeting()).await;

        assert_eq!(first_status, StatusCode::OK);
        assert_eq!(second_status, StatusCode::OK);
        assert_eq!(first, second);
        mock.assert_async().await;
    }

    /// Tests that turns are logged when a session id is given
    #[tokio::test]
    async fn it_logs_the_turn_for_a_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Hello."}"#)
            .create_async()
            .await;

        let (app, store) = test_app(&server.url()).await;
        let mut body = greeting();
        body["session_id"] = json!("session-1");
        let (status, _) = post(app, body).await;
        assert_eq!(status, StatusCode::OK);

        // Logging happens after the response is sent
        let mut interactions = Vec::new();
        for _ in 0..50 {
            interactions = store.find_interactions("session-1").await.unwrap();
            if interactions.len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert_eq!(interactions.len(), 2);
        assert_eq!(interactions[0].turn_index, 1);
        assert_eq!(interactions[0].sender, "user");
        assert_eq!(interactions[0].message, "Hi");
        assert_eq!(interactions[1].turn_index, 2);
        assert_eq!(interactions[1].sender, "assistant");
        assert_eq!(interactions[1].message, "Hello.");
    }

    /// Tests that nothing is logged without a session id
    #[tokio::test]
    async fn it_skips_logging_without_a_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Hello."}"#)
            .create_async()
            .await;

        let (app, store) = test_app(&server.url()).await;
        let (status, _) = post(app, greeting()).await;
        assert_eq!(status, StatusCode::OK);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(store.find_interactions("").await.unwrap().is_empty());
    }

    /// Tests that a failing transcript store doesn't fail the request
    #[tokio::test]
    async fn it_responds_when_logging_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Hello."}"#)
            .create_async()
            .await;

        let app = app_with(ollama_provider(&server.url()), broken_store().await);
        let mut body = greeting();
        body["session_id"] = json!("session-1");
        let (status, body) = post(app, body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"aiResponse": "Hello."}));
    }

    /// Fails while building the outbound request
    struct FailingPayloadProvider;

    #[async_trait]
    impl Provider for FailingPayloadProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn post(&self, client: &Client) -> RequestBuilder {
            client.post("http://127.0.0.1:1/unused")
        }

        fn payload(&self, _request: &RelayRequest) -> Result<Value, RelayError> {
            Err(RelayError::Internal(anyhow::anyhow!("Failed to render prompt")))
        }

        fn extract_text<'a>(&self, _response: &'a Value) -> Option<&'a str> {
            None
        }
    }

    /// Tests that unexpected failures return a generic message
    #[tokio::test]
    async fn it_hides_unexpected_failures() {
        let app = app_with(Arc::new(FailingPayloadProvider), test_store().await);
        let (status, body) = post(app, greeting()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "An internal server error occurred."}));
    }
}
