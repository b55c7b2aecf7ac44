use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use futures::StreamExt;
use tracing::{error, warn};

use quill_core::{BlogService, ErrorKind};
use quill_protocol::{
    AuthorIdRequest, AuthorRequest, AuthorResponse, BlogIdRequest, BlogRequest, BlogResponse,
    DeleteResponse, HealthResponse, StreamFrame, NDJSON_CONTENT_TYPE,
};

use crate::convert;
use crate::error::ApiResult;

type Payload<T> = Result<Json<T>, JsonRejection>;

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

// ---- Authors ----

pub async fn create_author(
    State(service): State<BlogService>,
    payload: Payload<AuthorRequest>,
) -> ApiResult<Json<AuthorResponse>> {
    let Json(req) = payload?;
    let view = service.create_author(convert::new_author(req.author)).await?;
    Ok(Json(AuthorResponse {
        author: convert::author(&view),
    }))
}

pub async fn fetch_author(
    State(service): State<BlogService>,
    payload: Payload<AuthorIdRequest>,
) -> ApiResult<Json<AuthorResponse>> {
    let Json(req) = payload?;
    let view = service.fetch_author(&req.author_id).await?;
    Ok(Json(AuthorResponse {
        author: convert::author(&view),
    }))
}

pub async fn update_author(
    State(service): State<BlogService>,
    payload: Payload<AuthorRequest>,
) -> ApiResult<Json<AuthorResponse>> {
    let Json(req) = payload?;
    let view = service
        .update_author(convert::author_update(req.author))
        .await?;
    Ok(Json(AuthorResponse {
        author: convert::author(&view),
    }))
}

pub async fn delete_author(
    State(service): State<BlogService>,
    payload: Payload<AuthorIdRequest>,
) -> ApiResult<Json<DeleteResponse>> {
    let Json(req) = payload?;
    let outcome = service.delete_author(&req.author_id).await?;
    Ok(Json(DeleteResponse {
        delete_response: outcome.to_string(),
    }))
}

/// Stream every author as NDJSON.
///
/// The response is always `200`; a failure arrives as a final error frame.
/// The request body is ignored.
pub async fn all_authors(State(service): State<BlogService>) -> Response {
    let frames = service.all_authors().map(|item| {
        let frame = match item {
            Ok(view) => StreamFrame::Author(convert::author(&view)),
            Err(e) => {
                if e.kind() == ErrorKind::Internal {
                    error!(error = %e, "AllAuthors failed");
                } else {
                    warn!(error = %e, "AllAuthors failed");
                }
                StreamFrame::Error(convert::status(&e))
            }
        };
        frame.encode().map_err(std::io::Error::other)
    });
    (
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
        Body::from_stream(frames),
    )
        .into_response()
}

// ---- Posts ----

pub async fn create_blog(
    State(service): State<BlogService>,
    payload: Payload<BlogRequest>,
) -> ApiResult<Json<BlogResponse>> {
    let Json(req) = payload?;
    let view = service.create_blog(convert::new_post(req.blog)).await?;
    Ok(Json(BlogResponse {
        blog: convert::post(&view),
    }))
}

pub async fn fetch_blog(
    State(service): State<BlogService>,
    payload: Payload<BlogIdRequest>,
) -> ApiResult<Json<BlogResponse>> {
    let Json(req) = payload?;
    let view = service.fetch_blog(&req.blog_id).await?;
    Ok(Json(BlogResponse {
        blog: convert::post(&view),
    }))
}

pub async fn update_blog(
    State(service): State<BlogService>,
    payload: Payload<BlogRequest>,
) -> ApiResult<Json<BlogResponse>> {
    let Json(req) = payload?;
    let view = service.update_blog(convert::post_update(req.blog)).await?;
    Ok(Json(BlogResponse {
        blog: convert::post(&view),
    }))
}

pub async fn delete_blog(
    State(service): State<BlogService>,
    payload: Payload<BlogIdRequest>,
) -> ApiResult<Json<DeleteResponse>> {
    let Json(req) = payload?;
    let outcome = service.delete_blog(&req.blog_id).await?;
    Ok(Json(DeleteResponse {
        delete_response: outcome.to_string(),
    }))
}
