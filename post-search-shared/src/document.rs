//! Source records and their indexable document projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of committed change reported by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordOperation {
    Create,
    Update,
    Delete,
}

impl RecordOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// A record that can be projected into a search document.
///
/// The document id must be the record's own unique id so that re-indexing
/// the same record overwrites its previous document.
pub trait Indexable {
    /// Serializable shape sent to the search engine.
    type Document: Serialize;

    /// The id under which the document is stored.
    fn document_id(&self) -> String;

    /// Project the record into a fresh document.
    fn to_document(&self) -> Self::Document;
}

/// Author of a post, loaded through the post's author association.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A blog post as stored in the record store.
///
/// Carries more fields than are ever indexed; see [`PostDocument`] for the
/// projected shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub status: String,
    pub author_id: Uuid,
    /// Loaded association, `None` when the author row is missing.
    pub author: Option<Author>,
    pub comments_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostRecord {
    /// Create a post with fresh timestamps and no loaded author.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        status: impl Into<String>,
        author_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            status: status.into(),
            author_id,
            author: None,
            comments_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach the loaded author association.
    pub fn with_author(mut self, author: Author) -> Self {
        self.author_id = author.id;
        self.author = Some(author);
        self
    }
}

/// The indexed projection of a [`PostRecord`].
///
/// Only these fields ever reach the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDocument {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Denormalized from the author association.
    pub author_name: Option<String>,
}

impl Indexable for PostRecord {
    type Document = PostDocument;

    fn document_id(&self) -> String {
        self.id.to_string()
    }

    fn to_document(&self) -> PostDocument {
        PostDocument {
            id: self.id,
            title: self.title.clone(),
            body: self.body.clone(),
            status: self.status.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            author_name: self.author.as_ref().map(|author| author.name.clone()),
        }
    }
}
