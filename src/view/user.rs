//! Author views

use serde::Serialize;

use crate::models::UserRecord;

/// A user as templates see it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: i64,
    pub login: String,
    pub display_name: String,
    pub url: String,
    pub slug: String,
    /// Author archive URL
    pub link: String,
}

impl UserView {
    pub fn new(record: UserRecord, link: String) -> Self {
        Self {
            id: record.id,
            login: record.login,
            display_name: record.display_name,
            url: record.url,
            slug: record.nicename,
            link,
        }
    }

    /// Name to show, falling back to the login
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.login
        } else {
            &self.display_name
        }
    }
}

impl std::fmt::Display for UserView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
