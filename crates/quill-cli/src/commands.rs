use anyhow::Context;
use colored::Colorize;
use futures::StreamExt;
use serde::Serialize;
use tracing::{debug, info};

use quill_protocol::{Address, Author, Post};
use quill_server::{QuillConfig, QuillServer};

use crate::cli::*;
use crate::client::BlogClient;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::CreateAuthor(args) => cmd_create_author(args, format).await,
        Command::FetchAuthor(args) => {
            let client = BlogClient::new(&args.remote.server)?;
            let author = client.fetch_author(&args.id).await?;
            print_author(&author, format)
        }
        Command::UpdateAuthor(args) => cmd_update_author(args, format).await,
        Command::DeleteAuthor(args) => {
            let client = BlogClient::new(&args.remote.server)?;
            let outcome = client.delete_author(&args.id).await?;
            print_outcome(&outcome, format)
        }
        Command::AllAuthors(args) => cmd_all_authors(args, format).await,
        Command::CreateBlog(args) => {
            let client = BlogClient::new(&args.remote.server)?;
            let post = client
                .create_blog(Post {
                    title: args.title,
                    content: args.content,
                    writer_email: args.writer_emails,
                    ..Post::default()
                })
                .await?;
            print_post(&post, format)
        }
        Command::FetchBlog(args) => {
            let client = BlogClient::new(&args.remote.server)?;
            let post = client.fetch_blog(&args.id).await?;
            print_post(&post, format)
        }
        Command::UpdateBlog(args) => {
            let client = BlogClient::new(&args.remote.server)?;
            let post = client
                .update_blog(Post {
                    id: args.id,
                    title: args.title,
                    content: args.content,
                    writer_email: args.writer_emails,
                    ..Post::default()
                })
                .await?;
            print_post(&post, format)
        }
        Command::DeleteBlog(args) => {
            let client = BlogClient::new(&args.remote.server)?;
            let outcome = client.delete_blog(&args.id).await?;
            print_outcome(&outcome, format)
        }
    }
}

/// Configuration file (or defaults) with the command-line bind address on top.
fn server_config(args: &ServeArgs) -> anyhow::Result<QuillConfig> {
    let mut config = match &args.config {
        Some(path) => QuillConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => QuillConfig::default(),
    };
    if let Some(bind) = args.bind {
        debug!(%bind, "bind address overridden on the command line");
        config.server.bind_addr = bind;
    }
    info!(
        bind = %config.server.bind_addr,
        database = %config.store.database,
        "server configuration resolved"
    );
    Ok(config)
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(&args)?;
    println!(
        "{} Quill blog service on {} (database: {})",
        "▶".green().bold(),
        config.server.bind_addr.to_string().bold(),
        config.store.database.cyan()
    );
    QuillServer::new(config).serve().await?;
    println!("{} Server stopped.", "✓".green());
    Ok(())
}

fn address(fields: AddressFields, id: String) -> Address {
    Address {
        id,
        city: fields.city,
        country: fields.country,
        zip_code: fields.zip_code,
        postal_address: fields.postal_address,
    }
}

async fn cmd_create_author(args: CreateAuthorArgs, format: OutputFormat) -> anyhow::Result<()> {
    let client = BlogClient::new(&args.remote.server)?;
    let author = client
        .create_author(Author {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            address: Some(address(args.address, String::new())),
            ..Author::default()
        })
        .await?;
    print_author(&author, format)
}

async fn cmd_update_author(args: UpdateAuthorArgs, format: OutputFormat) -> anyhow::Result<()> {
    let client = BlogClient::new(&args.remote.server)?;
    let author = client
        .update_author(Author {
            id: args.id,
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            address: Some(address(args.address, args.address_id)),
            ..Author::default()
        })
        .await?;
    print_author(&author, format)
}

async fn cmd_all_authors(args: RemoteArgs, format: OutputFormat) -> anyhow::Result<()> {
    let client = BlogClient::new(&args.server)?;
    let mut authors = std::pin::pin!(client.all_authors().await?);
    let mut count = 0usize;
    while let Some(author) = authors.next().await {
        let author = author.with_context(|| format!("Stream failed after {count} author(s)"))?;
        count += 1;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&author)?),
            OutputFormat::Text => {
                if count > 1 {
                    println!();
                }
                for line in author_lines(&author) {
                    println!("{line}");
                }
            }
        }
    }
    if matches!(format, OutputFormat::Text) {
        println!("{} {} author(s)", "✓".green(), count.to_string().bold());
    }
    Ok(())
}

// ---- Rendering ----

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_author(author: &Author, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(author),
        OutputFormat::Text => {
            for line in author_lines(author) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn print_post(post: &Post, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(post),
        OutputFormat::Text => {
            for line in post_lines(post) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn print_outcome(outcome: &str, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "deleteResponse": outcome })),
        OutputFormat::Text => {
            println!("{} {}", "✓".green().bold(), outcome);
            Ok(())
        }
    }
}

fn author_lines(author: &Author) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} {} <{}>",
        author.id.yellow(),
        author.first_name.bold(),
        author.last_name.bold(),
        author.email.cyan()
    )];
    if let Some(address) = &author.address {
        lines.push(format!(
            "  Address: {}, {}, {} {} ({})",
            address.postal_address,
            address.city,
            address.country,
            address.zip_code,
            address.id.dimmed()
        ));
    }
    lines.push(format!("  Created: {}", author.created));
    if !author.updated.is_empty() {
        lines.push(format!("  Updated: {}", author.updated));
    }
    lines
}

fn post_lines(post: &Post) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", post.id.yellow(), post.title.bold()),
        format!("  {}", post.content),
        format!("  Writers: {}", post.writer_email.join(", ").cyan()),
    ];
    for author in &post.author_details {
        lines.push(format!(
            "    {} {} <{}>",
            author.first_name, author.last_name, author.email
        ));
    }
    lines.push(format!("  Created: {}", post.created));
    if !post.updated.is_empty() {
        lines.push(format!("  Updated: {}", post.updated));
    }
    lines
}
