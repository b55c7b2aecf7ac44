use std::fmt;
use std::sync::Arc;

use async_stream::stream;
use futures::Stream;
use tracing::{debug, info, warn};

use quill_store::DocumentStore;
use quill_types::Timestamp;

use crate::accessor::{AddressAccessor, AuthorAccessor, PostAccessor};
use crate::assemble;
use crate::codec::{self, IdKind};
use crate::error::{ErrorKind, ServiceResult};
use crate::model::{Address, Author, AuthorUpdate, NewAuthor, NewPost, Post, PostUpdate};
use crate::view::{AuthorView, PostView};

/// Result of a delete operation, reported as text rather than as an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub entity: &'static str,
    pub deleted: u64,
}

impl DeleteOutcome {
    /// Returns `true` when nothing matched.
    pub fn is_noop(&self) -> bool {
        self.deleted == 0
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deleted {} {}(s)", self.deleted, self.entity)
    }
}

/// Cascade coordinator behind every RPC method.
///
/// Each operation is a fixed, strictly sequential series of accessor calls.
/// The first failing step aborts the operation and earlier writes are left in
/// place; the only tolerated failures are individual address deletions while
/// deleting an author. Timestamps are taken once at operation entry.
///
/// The service holds no mutable state besides the shared store handle, so it
/// is cheap to clone into concurrently running requests. Concurrent
/// operations on the same author may interleave; the loser of a race sees
/// `NotFound`.
#[derive(Clone)]
pub struct BlogService {
    addresses: AddressAccessor,
    authors: AuthorAccessor,
    posts: PostAccessor,
}

impl BlogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            addresses: AddressAccessor::new(Arc::clone(&store)),
            authors: AuthorAccessor::new(Arc::clone(&store)),
            posts: PostAccessor::new(store),
        }
    }

    // ---- Authors ----

    /// Insert the address, then the author referencing it.
    ///
    /// If the author insert fails the address stays behind, unreferenced.
    pub async fn create_author(&self, input: NewAuthor) -> ServiceResult<AuthorView> {
        info!(op = "create_author", email = %input.email, "CreateAuthor invoked");
        let now = Timestamp::now();

        let mut address = Address {
            id: None,
            city: input.address.city,
            country: input.address.country,
            zip_code: input.address.zip_code,
            postal_address: input.address.postal_address,
            created: now,
            updated: None,
        };
        let address_id = self.addresses.insert(&address).await?;
        address.id = Some(address_id);

        let mut author = Author {
            id: None,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            address_ids: vec![codec::encode(&address_id)],
            created: now,
            updated: None,
        };
        let author_id = match self.authors.insert(&author).await {
            Ok(id) => id,
            Err(e) => {
                warn!(address_id = %address_id, error = %e, "author insert failed; address left orphaned");
                return Err(e);
            }
        };
        author.id = Some(author_id);

        Ok(assemble::author_view(&author, Some(&address)))
    }

    pub async fn fetch_author(&self, author_id: &str) -> ServiceResult<AuthorView> {
        info!(op = "fetch_author", author_id, "FetchAuthor invoked");
        let id = codec::decode(IdKind::Author, author_id)?;
        let author = self.authors.find_by_id(&id).await?;
        self.resolve_author(author).await
    }

    /// Overwrite the address named in the request, then the author.
    ///
    /// The author's address references collapse to exactly that one address;
    /// any others it referenced are left unreferenced.
    pub async fn update_author(&self, input: AuthorUpdate) -> ServiceResult<AuthorView> {
        info!(
            op = "update_author",
            author_id = %input.id,
            address_id = %input.address.id,
            "UpdateAuthor invoked"
        );
        let now = Timestamp::now();
        let author_id = codec::decode(IdKind::Author, &input.id)?;
        let address_id = codec::decode(IdKind::Address, &input.address.id)?;

        let mut address = self.addresses.find_by_id(&address_id).await?;
        address.city = input.address.city;
        address.country = input.address.country;
        address.zip_code = input.address.zip_code;
        address.postal_address = input.address.postal_address;
        address.updated = Some(now);
        self.addresses.replace(&address_id, &address).await?;

        let mut author = self.authors.find_by_id(&author_id).await?;
        author.first_name = input.first_name;
        author.last_name = input.last_name;
        author.email = input.email;
        author.address_ids = vec![codec::encode(&address_id)];
        author.updated = Some(now);
        self.authors.replace(&author_id, &author).await?;

        Ok(assemble::author_view(&author, Some(&address)))
    }

    /// Delete every address the author references, then the author.
    ///
    /// Address references that cannot be decoded or deleted are logged and
    /// skipped. An author that does not exist yields a zero-count outcome.
    pub async fn delete_author(&self, author_id: &str) -> ServiceResult<DeleteOutcome> {
        info!(op = "delete_author", author_id, "DeleteAuthor invoked");
        let id = codec::decode(IdKind::Author, author_id)?;

        let author = match self.authors.find_by_id(&id).await {
            Ok(author) => author,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(author_id, "no author to delete");
                return Ok(DeleteOutcome {
                    entity: "author",
                    deleted: 0,
                });
            }
            Err(e) => return Err(e),
        };

        for raw in &author.address_ids {
            let address_id = match codec::decode(IdKind::Address, raw) {
                Ok(address_id) => address_id,
                Err(e) => {
                    warn!(author_id, address_id = %raw, error = %e, "skipping undecodable address reference");
                    continue;
                }
            };
            match self.addresses.delete_by_id(&address_id).await {
                Ok(0) => debug!(author_id, address_id = %raw, "address already gone"),
                Ok(_) => debug!(author_id, address_id = %raw, "address deleted"),
                Err(e) => {
                    warn!(author_id, address_id = %raw, error = %e, "address delete failed; continuing");
                }
            }
        }

        let deleted = self.authors.delete_by_id(&id).await?;
        Ok(DeleteOutcome {
            entity: "author",
            deleted,
        })
    }

    /// Stream every author, each joined with its address.
    ///
    /// The first failure ends the stream with that error. The underlying
    /// cursor is released when the stream ends, fails, or is dropped by the
    /// consumer.
    pub fn all_authors(&self) -> impl Stream<Item = ServiceResult<AuthorView>> + Send + 'static {
        let service = self.clone();
        stream! {
            info!(op = "all_authors", "AllAuthors invoked");
            let mut cursor = match service.authors.find_all().await {
                Ok(cursor) => cursor,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let mut sent = 0usize;
            loop {
                let step = match cursor.next().await {
                    Ok(Some(author)) => service.resolve_author(author).await.map(Some),
                    Ok(None) => Ok(None),
                    Err(e) => Err(e),
                };
                match step {
                    Ok(Some(view)) => {
                        sent += 1;
                        yield Ok(view);
                    }
                    Ok(None) => break,
                    Err(e) => {
                        if let Err(close_err) = cursor.close().await {
                            warn!(error = %close_err, "failed to close author cursor");
                        }
                        warn!(sent, error = %e, "AllAuthors aborted");
                        yield Err(e);
                        return;
                    }
                }
            }

            if let Err(e) = cursor.close().await {
                warn!(error = %e, "failed to close author cursor");
            }
            debug!(sent, "AllAuthors completed");
        }
    }

    // ---- Posts ----

    /// Persist the post, then resolve each writer by email.
    ///
    /// Writers are not validated before the write: an unknown email fails
    /// the call with `NotFound` after the post is already stored.
    pub async fn create_blog(&self, input: NewPost) -> ServiceResult<PostView> {
        info!(op = "create_blog", title = %input.title, writers = input.writer_emails.len(), "CreateBlog invoked");
        let now = Timestamp::now();

        let mut post = Post {
            id: None,
            title: input.title,
            content: input.content,
            writer_emails: input.writer_emails,
            created: now,
            updated: None,
        };
        let id = self.posts.insert(&post).await?;
        post.id = Some(id);

        let authors = self.resolve_writers(&post.writer_emails).await?;
        Ok(assemble::post_view(&post, authors))
    }

    pub async fn fetch_blog(&self, blog_id: &str) -> ServiceResult<PostView> {
        info!(op = "fetch_blog", blog_id, "FetchBlog invoked");
        let id = codec::decode(IdKind::Post, blog_id)?;
        let post = self.posts.find_by_id(&id).await?;
        let authors = self.resolve_writers(&post.writer_emails).await?;
        Ok(assemble::post_view(&post, authors))
    }

    /// Replace the whole post body.
    ///
    /// The replacement carries the zero creation timestamp, and the returned
    /// view is built from the request without resolving writers.
    pub async fn update_blog(&self, input: PostUpdate) -> ServiceResult<PostView> {
        info!(op = "update_blog", blog_id = %input.id, "UpdateBlog invoked");
        let now = Timestamp::now();
        let id = codec::decode(IdKind::Post, &input.id)?;

        let post = Post {
            id: Some(id),
            title: input.title,
            content: input.content,
            writer_emails: input.writer_emails,
            created: Timestamp::zero(),
            updated: Some(now),
        };
        self.posts.replace(&id, &post).await?;
        Ok(assemble::post_view(&post, Vec::new()))
    }

    pub async fn delete_blog(&self, blog_id: &str) -> ServiceResult<DeleteOutcome> {
        info!(op = "delete_blog", blog_id, "DeleteBlog invoked");
        let id = codec::decode(IdKind::Post, blog_id)?;
        let deleted = self.posts.delete_by_id(&id).await?;
        Ok(DeleteOutcome {
            entity: "blog",
            deleted,
        })
    }

    // ---- Joins ----

    /// Resolve every address the author references.
    ///
    /// Any failure aborts. The view has one address slot, so the last
    /// resolved address wins.
    async fn resolve_address(&self, author: &Author) -> ServiceResult<Option<Address>> {
        let mut resolved = None;
        for raw in &author.address_ids {
            let id = codec::decode(IdKind::Address, raw)?;
            resolved = Some(self.addresses.find_by_id(&id).await?);
        }
        Ok(resolved)
    }

    async fn resolve_author(&self, author: Author) -> ServiceResult<AuthorView> {
        let address = self.resolve_address(&author).await?;
        Ok(assemble::author_view(&author, address.as_ref()))
    }

    async fn resolve_writers(&self, emails: &[String]) -> ServiceResult<Vec<AuthorView>> {
        let mut views = Vec::with_capacity(emails.len());
        for email in emails {
            let author = self.authors.find_by_email(email).await?;
            views.push(self.resolve_author(author).await?);
        }
        Ok(views)
    }
}
