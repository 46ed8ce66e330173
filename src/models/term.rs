//! Taxonomy term record

use serde::{Deserialize, Serialize};

/// Built-in category taxonomy
pub const TAXONOMY_CATEGORY: &str = "category";

/// Built-in tag taxonomy
pub const TAXONOMY_TAG: &str = "post_tag";

/// Term record as provided by the host term store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermRecord {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// URL-friendly slug
    pub slug: String,
    /// Taxonomy the term belongs to
    pub taxonomy: String,
    /// Term description
    #[serde(default)]
    pub description: String,
    /// Parent term ID, 0 for root terms
    #[serde(default)]
    pub parent_id: i64,
    /// Number of posts using the term
    #[serde(default)]
    pub count: i64,
}

impl TermRecord {
    /// Create a root term in the given taxonomy
    pub fn new(id: i64, taxonomy: &str, slug: &str, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            slug: slug.to_string(),
            taxonomy: taxonomy.to_string(),
            description: String::new(),
            parent_id: 0,
            count: 0,
        }
    }
}

/// A term named either by ID or by name/slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermRef {
    Id(i64),
    Name(String),
}

impl TermRef {
    /// Whether the record is the term this reference names
    pub fn matches(&self, term: &TermRecord) -> bool {
        match self {
            TermRef::Id(id) => term.id == *id,
            TermRef::Name(name) => term.name == *name || term.slug == *name,
        }
    }
}

impl From<i64> for TermRef {
    fn from(id: i64) -> Self {
        TermRef::Id(id)
    }
}

impl From<&str> for TermRef {
    fn from(name: &str) -> Self {
        match name.parse::<i64>() {
            Ok(id) => TermRef::Id(id),
            Err(_) => TermRef::Name(name.to_string()),
        }
    }
}
