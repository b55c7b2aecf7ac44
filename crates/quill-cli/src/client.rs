//! HTTP client for the blog service.

use std::time::Duration;

use anyhow::{Context, Result};
use async_stream::stream;
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use quill_protocol::{
    endpoints, AllAuthorsRequest, Author, AuthorIdRequest, AuthorRequest, AuthorResponse,
    BlogIdRequest, BlogRequest, BlogResponse, DeleteResponse, FrameDecoder, Post, ProtocolError,
    Status, StatusCode, StreamFrame,
};

pub struct BlogClient {
    client: Client,
    base_url: String,
}

impl BlogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn call<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        debug!(base_url = %self.base_url, path, "calling blog service");
        let response = self
            .client
            .post(self.url(path))
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base_url))?;
        let response = check(response).await?;
        response.json().await.context("Failed to parse response")
    }

    pub async fn create_author(&self, author: Author) -> Result<Author> {
        let resp: AuthorResponse = self
            .call(endpoints::CREATE_AUTHOR, &AuthorRequest { author })
            .await?;
        Ok(resp.author)
    }

    pub async fn fetch_author(&self, author_id: &str) -> Result<Author> {
        let req = AuthorIdRequest {
            author_id: author_id.to_string(),
        };
        let resp: AuthorResponse = self.call(endpoints::FETCH_AUTHOR, &req).await?;
        Ok(resp.author)
    }

    pub async fn update_author(&self, author: Author) -> Result<Author> {
        let resp: AuthorResponse = self
            .call(endpoints::UPDATE_AUTHOR, &AuthorRequest { author })
            .await?;
        Ok(resp.author)
    }

    pub async fn delete_author(&self, author_id: &str) -> Result<String> {
        let req = AuthorIdRequest {
            author_id: author_id.to_string(),
        };
        let resp: DeleteResponse = self.call(endpoints::DELETE_AUTHOR, &req).await?;
        Ok(resp.delete_response)
    }

    /// Open the author stream.
    ///
    /// The request is sent before returning; the stream then yields authors
    /// until the body ends. A terminal error frame becomes the last item.
    pub async fn all_authors(&self) -> Result<impl Stream<Item = Result<Author>>> {
        let response = self
            .client
            .post(self.url(endpoints::ALL_AUTHORS))
            .json(&AllAuthorsRequest::default())
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base_url))?;
        let response = check(response).await?;

        Ok(stream! {
            let mut decoder = FrameDecoder::new();
            let mut body = std::pin::pin!(response.bytes_stream());

            loop {
                match decoder.next_frame() {
                    Ok(Some(frame)) => {
                        let last = frame.is_error();
                        yield author_from_frame(frame);
                        if last {
                            return;
                        }
                        continue;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        yield Err(e.into());
                        return;
                    }
                }
                match body.next().await {
                    Some(Ok(chunk)) => decoder.push(&chunk),
                    Some(Err(e)) => {
                        yield Err(anyhow::Error::new(e).context("Author stream interrupted"));
                        return;
                    }
                    None => break,
                }
            }

            match decoder.finish() {
                Ok(Some(frame)) => yield author_from_frame(frame),
                Ok(None) => {}
                Err(e) => yield Err(e.into()),
            }
        })
    }

    pub async fn create_blog(&self, blog: Post) -> Result<Post> {
        let resp: BlogResponse = self.call(endpoints::CREATE_BLOG, &BlogRequest { blog }).await?;
        Ok(resp.blog)
    }

    pub async fn fetch_blog(&self, blog_id: &str) -> Result<Post> {
        let req = BlogIdRequest {
            blog_id: blog_id.to_string(),
        };
        let resp: BlogResponse = self.call(endpoints::FETCH_BLOG, &req).await?;
        Ok(resp.blog)
    }

    pub async fn update_blog(&self, blog: Post) -> Result<Post> {
        let resp: BlogResponse = self.call(endpoints::UPDATE_BLOG, &BlogRequest { blog }).await?;
        Ok(resp.blog)
    }

    pub async fn delete_blog(&self, blog_id: &str) -> Result<String> {
        let req = BlogIdRequest {
            blog_id: blog_id.to_string(),
        };
        let resp: DeleteResponse = self.call(endpoints::DELETE_BLOG, &req).await?;
        Ok(resp.delete_response)
    }
}

/// Turn a non-success response into a [`ProtocolError::Remote`].
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let remote = serde_json::from_str::<Status>(&body).unwrap_or_else(|_| {
        Status::new(StatusCode::Internal, format!("HTTP {status}: {body}"))
    });
    Err(ProtocolError::Remote(remote).into())
}

fn author_from_frame(frame: StreamFrame) -> Result<Author> {
    match frame {
        StreamFrame::Author(author) => Ok(author),
        StreamFrame::Error(status) => Err(ProtocolError::Remote(status).into()),
    }
}
