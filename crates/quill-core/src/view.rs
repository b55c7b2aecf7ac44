//! Denormalized response views.
//!
//! Views carry identifiers in external form only.

use quill_types::Timestamp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressView {
    pub id: String,
    pub city: String,
    pub country: String,
    pub zip_code: String,
    pub postal_address: String,
}

/// An author joined with its resolved address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Option<AddressView>,
    pub created: Timestamp,
    pub updated: Option<Timestamp>,
}

/// A post joined with the views of its writers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub writer_emails: Vec<String>,
    pub authors: Vec<AuthorView>,
    pub created: Timestamp,
    pub updated: Option<Timestamp>,
}
