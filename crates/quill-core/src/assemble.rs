//! View assembly.
//!
//! Pure combination of records that the coordinator has already resolved.
//! Nothing here touches the store.

use crate::codec::encode;
use crate::model::{Address, Author, Post};
use crate::view::{AddressView, AuthorView, PostView};

fn external_id(id: Option<&quill_types::DocumentId>) -> String {
    id.map(encode).unwrap_or_default()
}

pub fn address_view(address: &Address) -> AddressView {
    AddressView {
        id: external_id(address.id.as_ref()),
        city: address.city.clone(),
        country: address.country.clone(),
        zip_code: address.zip_code.clone(),
        postal_address: address.postal_address.clone(),
    }
}

/// Join an author with its resolved address.
///
/// The view holds a single address. When an author references several, the
/// caller passes the last one it resolved.
pub fn author_view(author: &Author, address: Option<&Address>) -> AuthorView {
    AuthorView {
        id: external_id(author.id.as_ref()),
        first_name: author.first_name.clone(),
        last_name: author.last_name.clone(),
        email: author.email.clone(),
        address: address.map(address_view),
        created: author.created,
        updated: author.updated,
    }
}

/// Join a post with the views of its writers, in writer order.
pub fn post_view(post: &Post, authors: Vec<AuthorView>) -> PostView {
    PostView {
        id: external_id(post.id.as_ref()),
        title: post.title.clone(),
        content: post.content.clone(),
        writer_emails: post.writer_emails.clone(),
        authors,
        created: post.created,
        updated: post.updated,
    }
}
