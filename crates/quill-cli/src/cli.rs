use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:50051";

#[derive(Parser)]
#[command(
    name = "quill",
    about = "Quill: authors, addresses and blog posts over a document store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the blog service
    Serve(ServeArgs),
    /// Create an author and its address
    CreateAuthor(CreateAuthorArgs),
    /// Show an author with its address
    FetchAuthor(AuthorIdArgs),
    /// Overwrite an author and one of its addresses
    UpdateAuthor(UpdateAuthorArgs),
    /// Delete an author and every address it references
    DeleteAuthor(AuthorIdArgs),
    /// Stream every author
    AllAuthors(RemoteArgs),
    /// Create a blog post
    CreateBlog(CreateBlogArgs),
    /// Show a blog post with its writers
    FetchBlog(BlogIdArgs),
    /// Replace a blog post
    UpdateBlog(UpdateBlogArgs),
    /// Delete a blog post
    DeleteBlog(BlogIdArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Listen address, overriding the configuration file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args, Clone)]
pub struct RemoteArgs {
    /// Base URL of the blog service
    #[arg(long, default_value = DEFAULT_SERVER)]
    pub server: String,
}

#[derive(Args)]
pub struct AddressFields {
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub country: String,
    #[arg(long)]
    pub zip_code: String,
    #[arg(long)]
    pub postal_address: String,
}

#[derive(Args)]
pub struct CreateAuthorArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[command(flatten)]
    pub address: AddressFields,
}

#[derive(Args)]
pub struct UpdateAuthorArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    pub id: String,
    /// The address to overwrite; it becomes the author's only address
    #[arg(long)]
    pub address_id: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[command(flatten)]
    pub address: AddressFields,
}

#[derive(Args)]
pub struct AuthorIdArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    pub id: String,
}

#[derive(Args)]
pub struct CreateBlogArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub content: String,
    /// Writer email, repeatable
    #[arg(long = "writer-email")]
    pub writer_emails: Vec<String>,
}

#[derive(Args)]
pub struct UpdateBlogArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    pub id: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub content: String,
    #[arg(long = "writer-email")]
    pub writer_emails: Vec<String>,
}

#[derive(Args)]
pub struct BlogIdArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    pub id: String,
}
