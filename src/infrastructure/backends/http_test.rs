use anyhow::Result;
use futures::TryStreamExt;
use mockito::Matcher;
use serde_json::json;
use test_utils::full_answer_fixture;
use test_utils::login_stream_fixture;

use super::HttpBackend;
use crate::domain::models::Backend;
use crate::domain::models::ChatRequest;
use crate::domain::models::FeedbackRequest;
use crate::domain::models::Rating;
use crate::domain::models::UserRole;
use crate::domain::services::ChatSession;

impl HttpBackend {
    fn with_url(url: String) -> HttpBackend {
        return HttpBackend {
            url,
            timeout: "200".to_string(),
        };
    }
}

mod health_check {
    use super::*;

    #[tokio::test]
    async fn it_successfully_health_checks() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v1/health/db-check")
            .with_status(200)
            .with_body(r#"{"status":"ok","db_response":1}"#)
            .create();

        let backend = HttpBackend::with_url(server.url());
        let res = backend.health_check().await;

        assert!(res.is_ok());
        mock.assert();
    }

    #[tokio::test]
    async fn it_fails_health_checks() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v1/health/db-check")
            .with_status(500)
            .create();

        let backend = HttpBackend::with_url(server.url());
        let res = backend.health_check().await;

        assert!(res.is_err());
        mock.assert();
    }

    #[tokio::test]
    async fn it_fails_health_checks_on_unhealthy_status() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v1/health/db-check")
            .with_status(200)
            .with_body(r#"{"status":"error","detail":"database is down"}"#)
            .create();

        let backend = HttpBackend::with_url(server.url());
        let res = backend.health_check().await;

        insta::assert_snapshot!(res.unwrap_err().to_string(), @"Backend reported unhealthy: database is down");
        mock.assert();
    }

    #[tokio::test]
    async fn it_fails_health_checks_without_url() {
        let backend = HttpBackend::with_url("".to_string());
        let res = backend.health_check().await;

        insta::assert_snapshot!(res.unwrap_err().to_string(), @"Backend URL is not defined");
    }
}

mod stream_chat {
    use super::*;

    #[tokio::test]
    async fn it_streams_the_response_body() -> Result<()> {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/v1/chat/stream")
            .match_header("content-type", "application/json")
            .match_header("accept", "text/event-stream")
            .match_body(Matcher::Json(json!({
                "message": "How do I login?",
                "user_role": "Project Manager / Admin",
            })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(login_stream_fixture())
            .create();

        let backend = HttpBackend::with_url(server.url());
        let body = backend
            .stream_chat(ChatRequest::new(
                "How do I login?",
                Some(UserRole::ProjectManager),
            ))
            .await?;
        let chunks = body.try_collect::<Vec<_>>().await?;
        let bytes = chunks.concat();

        assert_eq!(String::from_utf8(bytes)?, login_stream_fixture());
        mock.assert();

        return Ok(());
    }

    #[tokio::test]
    async fn it_treats_an_empty_body_as_an_empty_stream() -> Result<()> {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/v1/chat/stream")
            .with_status(200)
            .create();

        let backend = HttpBackend::with_url(server.url());
        let body = backend
            .stream_chat(ChatRequest::new("How do I login?", None))
            .await?;
        let chunks = body.try_collect::<Vec<_>>().await?;

        assert!(chunks.concat().is_empty());
        mock.assert();

        return Ok(());
    }

    #[tokio::test]
    async fn it_fails_on_non_success_status() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/v1/chat/stream")
            .with_status(500)
            .with_body(r#"{"error":"Backend error"}"#)
            .create();

        let backend = HttpBackend::with_url(server.url());
        let res = backend
            .stream_chat(ChatRequest::new("How do I login?", None))
            .await;

        insta::assert_snapshot!(res.err().unwrap().to_string(), @"Network response was not ok: 500 Internal Server Error");
        mock.assert();
    }
}

mod submit_feedback {
    use super::*;

    fn feedback() -> FeedbackRequest {
        return FeedbackRequest {
            chat_session_id: "1a2b3c4d-5e6f".to_string(),
            message_id: "2".to_string(),
            rating: Rating::ThumbsUp,
            user_id: None,
            comment: None,
        };
    }

    #[tokio::test]
    async fn it_submits_feedback() -> Result<()> {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/v1/feedback/")
            .match_body(Matcher::Json(json!({
                "chat_session_id": "1a2b3c4d-5e6f",
                "message_id": "2",
                "rating": "thumbs_up",
                "user_id": null,
                "comment": null,
            })))
            .with_status(201)
            .with_body(r#"{"id":1,"created_at":"2024-01-01T00:00:00"}"#)
            .create();

        let backend = HttpBackend::with_url(server.url());
        backend.submit_feedback(feedback()).await?;
        mock.assert();

        return Ok(());
    }

    #[tokio::test]
    async fn it_fails_to_submit_feedback() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/v1/feedback/")
            .with_status(422)
            .with_body("rating is invalid")
            .create();

        let backend = HttpBackend::with_url(server.url());
        let res = backend.submit_feedback(feedback()).await;

        insta::assert_snapshot!(res.unwrap_err().to_string(), @"Feedback submission failed: 422 Unprocessable Entity - rating is invalid");
        mock.assert();
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn it_streams_an_answer_end_to_end() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/v1/chat/stream")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(full_answer_fixture())
            .create();

        let backend = HttpBackend::with_url(server.url());
        let mut session = ChatSession::new(Box::new(backend), Some(UserRole::ConstructionWorker));
        session.send_message("How do I login?").await;

        let transcript = session.transcript();
        let answer = transcript.last_assistant().unwrap();
        assert_eq!(answer.content, "Open the app and tap «Logg inn».");
        assert_eq!(answer.citations.as_ref().unwrap()[0].title, "Guide");
        assert_eq!(answer.suggested_queries.as_ref().unwrap().len(), 2);
        assert!(!transcript.awaiting_response);
        mock.assert();
    }

    #[tokio::test]
    async fn it_annotates_failed_requests_end_to_end() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/v1/chat/stream")
            .with_status(503)
            .create();

        let backend = HttpBackend::with_url(server.url());
        let mut session = ChatSession::new(Box::new(backend), None);
        session.send_message("How do I login?").await;

        let transcript = session.transcript();
        insta::assert_snapshot!(
            transcript.last_assistant().unwrap().content.trim(),
            @"[System error: Network error (Network response was not ok: 503 Service Unavailable)]"
        );
        assert!(!transcript.awaiting_response);
        mock.assert();
    }
}
