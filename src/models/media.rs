//! Media (attachment) record

use serde::{Deserialize, Serialize};

/// Media record as provided by the host media store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaRecord {
    pub id: i64,
    /// Absolute URL of the full-size file
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub mime_type: String,
}

impl MediaRecord {
    /// Create a media record for a file of known size
    pub fn new(id: i64, src: &str, width: u32, height: u32) -> Self {
        Self {
            id,
            src: src.to_string(),
            alt: String::new(),
            caption: String::new(),
            width,
            height,
            mime_type: String::new(),
        }
    }
}
