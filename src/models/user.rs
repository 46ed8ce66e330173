//! User model
//!
//! Authors and editors as the host user store exposes them.

use serde::{Deserialize, Serialize};

/// User record as provided by the host user store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    /// Unique identifier
    pub id: i64,
    /// Login name (unique)
    pub login: String,
    /// Name shown on the site
    #[serde(default)]
    pub display_name: String,
    /// Email address
    #[serde(default)]
    pub email: String,
    /// Personal website
    #[serde(default)]
    pub url: String,
    /// URL-friendly slug used for author archives
    #[serde(default)]
    pub nicename: String,
}

impl UserRecord {
    /// Create a user with a login and display name
    pub fn new(id: i64, login: &str, display_name: &str) -> Self {
        Self {
            id,
            login: login.to_string(),
            display_name: display_name.to_string(),
            email: String::new(),
            url: String::new(),
            nicename: login.to_lowercase(),
        }
    }
}

/// The user viewing the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub user_id: i64,
    /// Editors may edit any post
    pub is_editor: bool,
}

impl Viewer {
    /// Check if the viewer can edit content written by `author_id`
    ///
    /// Editors can edit any content; authors only their own.
    pub fn can_edit(&self, author_id: i64) -> bool {
        self.is_editor || self.user_id == author_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_can_edit() {
        let author = Viewer { user_id: 3, is_editor: false };
        let editor = Viewer { user_id: 9, is_editor: true };

        assert!(author.can_edit(3));
        assert!(!author.can_edit(4));
        assert!(editor.can_edit(4));
    }

    #[test]
    fn test_user_new_derives_nicename() {
        let user = UserRecord::new(1, "Jared", "Jared N");
        assert_eq!(user.nicename, "jared");
    }
}
