/// HTTP paths for the blog service methods.
pub mod endpoints {
    pub const SERVICE: &str = "blog.BlogService";

    pub const CREATE_AUTHOR: &str = "/blog.BlogService/CreateAuthor";
    pub const FETCH_AUTHOR: &str = "/blog.BlogService/FetchAuthor";
    pub const UPDATE_AUTHOR: &str = "/blog.BlogService/UpdateAuthor";
    pub const DELETE_AUTHOR: &str = "/blog.BlogService/DeleteAuthor";
    pub const ALL_AUTHORS: &str = "/blog.BlogService/AllAuthors";

    pub const CREATE_BLOG: &str = "/blog.BlogService/CreateBlog";
    pub const FETCH_BLOG: &str = "/blog.BlogService/FetchBlog";
    pub const UPDATE_BLOG: &str = "/blog.BlogService/UpdateBlog";
    pub const DELETE_BLOG: &str = "/blog.BlogService/DeleteBlog";

    pub const HEALTH: &str = "/health";
}

/// Content type of the `AllAuthors` response body.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}
