//! Stored records and operation inputs.
//!
//! Records mirror the documents in the store field for field. Inputs carry
//! identifiers in their external form; only the coordinator decodes them.

use serde::{Deserialize, Serialize};

use quill_types::{DocumentId, Timestamp};

/// A postal address document (`addresses` collection).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub city: String,
    pub country: String,
    pub zip_code: String,
    pub postal_address: String,
    pub created: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
}

/// An author document (`authors` collection).
///
/// `address_ids` holds external-form references to address documents. The
/// author owns the list but not the addresses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "address_id", default)]
    pub address_ids: Vec<String>,
    pub created: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
}

/// A blog post document (`blog` collection).
///
/// Writers are referenced by email, not by identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub title: String,
    pub content: String,
    #[serde(rename = "writer_email", default)]
    pub writer_emails: Vec<String>,
    pub created: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewAddress {
    pub city: String,
    pub country: String,
    pub zip_code: String,
    pub postal_address: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: NewAddress,
}

/// Replacement values for an existing address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressUpdate {
    pub id: String,
    pub city: String,
    pub country: String,
    pub zip_code: String,
    pub postal_address: String,
}

/// Replacement values for an existing author and the one address it keeps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorUpdate {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: AddressUpdate,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub writer_emails: Vec<String>,
}

/// Full replacement body for an existing post.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub id: String,
    pub title: String,
    pub content: String,
    pub writer_emails: Vec<String>,
}
