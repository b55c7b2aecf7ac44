//! Mapping between wire messages and service inputs and views.

use quill_core::{
    AddressUpdate, AddressView, AuthorUpdate, AuthorView, ErrorKind, NewAddress, NewAuthor,
    NewPost, PostUpdate, PostView, ServiceError,
};
use quill_protocol::{self as wire, Status, StatusCode};

pub fn status(err: &ServiceError) -> Status {
    let code = match err.kind() {
        ErrorKind::InvalidArgument => StatusCode::InvalidArgument,
        ErrorKind::NotFound => StatusCode::NotFound,
        ErrorKind::Internal => StatusCode::Internal,
    };
    Status::new(code, err.message())
}

// ---- Requests ----

pub fn new_author(author: wire::Author) -> NewAuthor {
    let address = author.address.unwrap_or_default();
    NewAuthor {
        first_name: author.first_name,
        last_name: author.last_name,
        email: author.email,
        address: NewAddress {
            city: address.city,
            country: address.country,
            zip_code: address.zip_code,
            postal_address: address.postal_address,
        },
    }
}

/// A missing address becomes an empty address id, which the service rejects
/// as malformed.
pub fn author_update(author: wire::Author) -> AuthorUpdate {
    let address = author.address.unwrap_or_default();
    AuthorUpdate {
        id: author.id,
        first_name: author.first_name,
        last_name: author.last_name,
        email: author.email,
        address: AddressUpdate {
            id: address.id,
            city: address.city,
            country: address.country,
            zip_code: address.zip_code,
            postal_address: address.postal_address,
        },
    }
}

pub fn new_post(post: wire::Post) -> NewPost {
    NewPost {
        title: post.title,
        content: post.content,
        writer_emails: post.writer_email,
    }
}

pub fn post_update(post: wire::Post) -> PostUpdate {
    PostUpdate {
        id: post.id,
        title: post.title,
        content: post.content,
        writer_emails: post.writer_email,
    }
}

// ---- Responses ----

fn address(view: &AddressView) -> wire::Address {
    wire::Address {
        id: view.id.clone(),
        city: view.city.clone(),
        country: view.country.clone(),
        zip_code: view.zip_code.clone(),
        postal_address: view.postal_address.clone(),
    }
}

pub fn author(view: &AuthorView) -> wire::Author {
    wire::Author {
        id: view.id.clone(),
        first_name: view.first_name.clone(),
        last_name: view.last_name.clone(),
        email: view.email.clone(),
        address: view.address.as_ref().map(address),
        created: view.created.to_string(),
        updated: view.updated.map(|t| t.to_string()).unwrap_or_default(),
    }
}

pub fn post(view: &PostView) -> wire::Post {
    wire::Post {
        id: view.id.clone(),
        title: view.title.clone(),
        content: view.content.clone(),
        writer_email: view.writer_emails.clone(),
        author_details: view.authors.iter().map(author).collect(),
        created: view.created.to_string(),
        updated: view.updated.map(|t| t.to_string()).unwrap_or_default(),
    }
}
