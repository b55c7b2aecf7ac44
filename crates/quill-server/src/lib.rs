//! HTTP server for the Quill blog service.
//!
//! Exposes every [`BlogService`](quill_core::BlogService) operation as a JSON
//! `POST` under `/blog.BlogService/`, streams `AllAuthors` as NDJSON, and
//! closes the store handle after a graceful shutdown.

pub mod config;
pub mod convert;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{QuillConfig, ServerConfig, StoreConfig};
pub use error::{ApiError, ApiResult, ServerError, ServerResult};
pub use server::QuillServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use quill_core::DocumentId;
    use quill_protocol::{endpoints, FrameDecoder, StreamFrame, NDJSON_CONTENT_TYPE};
    use quill_store::{DocumentStore, Filter, InMemoryDocumentStore};
    use std::sync::Arc;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app() -> Router {
        QuillServer::new(QuillConfig::default()).router()
    }

    async fn call(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn stream(app: &Router) -> (StatusCode, Option<String>, Vec<StreamFrame>) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(endpoints::ALL_AUTHORS)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let mut decoder = FrameDecoder::new();
        decoder.push(&bytes);
        let mut frames = Vec::new();
        while let Some(frame) = decoder.next_frame().unwrap() {
            frames.push(frame);
        }
        (status, content_type, frames)
    }

    fn john(email: &str) -> Value {
        json!({
            "author": {
                "firstName": "John",
                "lastName": "Doe",
                "email": email,
                "address": {
                    "city": "Nairobi",
                    "country": "Kenya",
                    "zipCode": "00101",
                    "postalAddress": "243"
                }
            }
        })
    }

    #[tokio::test]
    async fn health_endpoint() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri(endpoints::HEALTH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn author_lifecycle() {
        let app = app();
        let (status, created) = call(&app, endpoints::CREATE_AUTHOR, john("jdoe@gmail.com")).await;
        assert_eq!(status, StatusCode::OK);
        let author = &created["author"];
        let id = author["id"].as_str().unwrap().to_string();
        assert_eq!(id.len(), 24);
        assert_eq!(author["address"]["city"], "Nairobi");
        assert!(author["created"].as_str().unwrap().ends_with('Z'));
        assert!(author.get("updated").is_none());

        let (status, fetched) =
            call(&app, endpoints::FETCH_AUTHOR, json!({"authorId": id})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["author"], created["author"]);

        let address_id = author["address"]["id"].as_str().unwrap();
        let (status, updated) = call(
            &app,
            endpoints::UPDATE_AUTHOR,
            json!({
                "author": {
                    "id": id,
                    "firstName": "Jane",
                    "lastName": "Doe",
                    "email": "janedoe@yahoo.com",
                    "address": {
                        "id": address_id,
                        "city": "Mombasa",
                        "country": "Kenya",
                        "zipCode": "00570",
                        "postalAddress": "324"
                    }
                }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["author"]["firstName"], "Jane");
        assert_eq!(updated["author"]["address"]["city"], "Mombasa");
        assert!(updated["author"]["updated"].is_string());

        let (status, deleted) =
            call(&app, endpoints::DELETE_AUTHOR, json!({"authorId": id})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["deleteResponse"], "deleted 1 author(s)");

        let (status, err) = call(&app, endpoints::FETCH_AUTHOR, json!({"authorId": id})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request() {
        let (status, err) =
            call(&app(), endpoints::FETCH_BLOG, json!({"blogId": "not-hex"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "INVALID_ARGUMENT");
        assert!(err["message"].as_str().unwrap().contains("not-hex"));
    }

    #[tokio::test]
    async fn unparsable_body_is_bad_request() {
        let (status, err) = call(&app(), endpoints::CREATE_AUTHOR, json!({"author": 7})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn blog_lifecycle() {
        let app = app();
        call(&app, endpoints::CREATE_AUTHOR, john("jdoe@gmail.com")).await;

        let (status, created) = call(
            &app,
            endpoints::CREATE_BLOG,
            json!({"blog": {
                "title": "Golang in 30 mins",
                "content": "30 minutes of building a micro service",
                "writerEmail": ["jdoe@gmail.com"]
            }}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let blog = &created["blog"];
        let id = blog["id"].as_str().unwrap().to_string();
        assert_eq!(blog["authorDetails"][0]["email"], "jdoe@gmail.com");

        let (_, fetched) = call(&app, endpoints::FETCH_BLOG, json!({"blogId": id})).await;
        assert_eq!(fetched["blog"], created["blog"]);

        let (status, updated) = call(
            &app,
            endpoints::UPDATE_BLOG,
            json!({"blog": {"id": id, "title": "Rust in 30 mins", "content": "c", "writerEmail": []}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["blog"]["title"], "Rust in 30 mins");
        assert_eq!(updated["blog"]["created"], "0001-01-01T00:00:00.000Z");
        assert_eq!(updated["blog"]["authorDetails"], json!([]));

        let (_, deleted) = call(&app, endpoints::DELETE_BLOG, json!({"blogId": id})).await;
        assert_eq!(deleted["deleteResponse"], "deleted 1 blog(s)");
        let (_, deleted) = call(&app, endpoints::DELETE_BLOG, json!({"blogId": id})).await;
        assert_eq!(deleted["deleteResponse"], "deleted 0 blog(s)");
    }

    #[tokio::test]
    async fn create_blog_with_unknown_writer_is_not_found() {
        let (status, err) = call(
            &app(),
            endpoints::CREATE_BLOG,
            json!({"blog": {"title": "t", "content": "c", "writerEmail": ["ghost@x.com"]}}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn all_authors_streams_ndjson() {
        let app = app();
        let (_, content_type, frames) = stream(&app).await;
        assert_eq!(content_type.as_deref(), Some(NDJSON_CONTENT_TYPE));
        assert!(frames.is_empty());

        call(&app, endpoints::CREATE_AUTHOR, john("a@x.com")).await;
        call(&app, endpoints::CREATE_AUTHOR, john("b@x.com")).await;
        let (status, _, frames) = stream(&app).await;
        assert_eq!(status, StatusCode::OK);
        let emails: Vec<_> = frames
            .iter()
            .map(|f| match f {
                StreamFrame::Author(a) => a.email.clone(),
                StreamFrame::Error(s) => panic!("unexpected error frame {s}"),
            })
            .collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn database_name_does_not_partition_memory_store() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let posts = QuillConfig::from_toml_str("[store]\ndatabase = \"posts\"\n").unwrap();
        let writer = QuillServer::with_store(posts, store.clone()).router();
        let reader = QuillServer::with_store(QuillConfig::default(), store.clone()).router();

        let (_, created) = call(&writer, endpoints::CREATE_AUTHOR, john("jdoe@gmail.com")).await;
        let id = created["author"]["id"].clone();

        let (status, fetched) = call(&reader, endpoints::FETCH_AUTHOR, json!({"authorId": id})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["author"], created["author"]);
    }

    #[tokio::test]
    async fn all_authors_failure_is_final_frame() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let app = QuillServer::with_store(QuillConfig::default(), store.clone()).router();
        call(&app, endpoints::CREATE_AUTHOR, john("a@x.com")).await;
        let (_, broken) = call(&app, endpoints::CREATE_AUTHOR, john("b@x.com")).await;
        call(&app, endpoints::CREATE_AUTHOR, john("c@x.com")).await;

        let address_id = broken["author"]["address"]["id"].as_str().unwrap();
        let filter = Filter::by_id(DocumentId::from_hex(address_id).unwrap());
        store.delete_one("addresses", &filter).await.unwrap();

        let (status, _, frames) = stream(&app).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(frames.len(), 2);
        assert!(!frames[0].is_error());
        match &frames[1] {
            StreamFrame::Error(s) => assert_eq!(s.code, quill_protocol::StatusCode::NotFound),
            other => panic!("expected error frame, got {other:?}"),
        }
        assert_eq!(store.open_cursors(), 0);
    }
}
