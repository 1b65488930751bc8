//! Resume link model
//!
//! Downloadable resume entries shown on the portfolio page,
//! ordered by `display_order`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resume download link entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeLink {
    /// Unique identifier (uuid string)
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Download URL
    pub file_url: String,
    /// File type (e.g. "pdf")
    pub file_type: String,
    /// File size in bytes (optional)
    #[serde(default)]
    pub file_size: Option<i64>,
    /// Whether the link is shown publicly
    #[serde(default)]
    pub is_active: bool,
    /// Sort order (lower = shown first)
    #[serde(default)]
    pub display_order: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new resume link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResumeLinkInput {
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Download URL
    pub file_url: String,
    /// File type (defaults to "pdf")
    #[serde(default = "default_file_type")]
    pub file_type: String,
    /// File size in bytes (optional)
    #[serde(default)]
    pub file_size: Option<i64>,
    /// Whether the link is shown publicly (defaults to true)
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    /// Sort order
    #[serde(default)]
    pub display_order: i64,
}

fn default_file_type() -> String {
    "pdf".to_string()
}

fn default_is_active() -> bool {
    true
}

impl CreateResumeLinkInput {
    /// Create a new CreateResumeLinkInput with the required fields
    pub fn new(name: impl Into<String>, file_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            file_url: file_url.into(),
            file_type: default_file_type(),
            file_size: None,
            is_active: true,
            display_order: 0,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the display order
    pub fn with_display_order(mut self, display_order: i64) -> Self {
        self.display_order = display_order;
        self
    }
}

/// Input for updating an existing resume link
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateResumeLinkInput {
    /// New display name (optional)
    pub name: Option<String>,
    /// New description (optional)
    pub description: Option<String>,
    /// New download URL (optional)
    pub file_url: Option<String>,
    /// New file type (optional)
    pub file_type: Option<String>,
    /// New file size (optional)
    pub file_size: Option<i64>,
    /// New active flag (optional)
    pub is_active: Option<bool>,
    /// New sort order (optional)
    pub display_order: Option<i64>,
}

impl UpdateResumeLinkInput {
    /// Create a new empty UpdateResumeLinkInput
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the download URL
    pub fn with_file_url(mut self, file_url: impl Into<String>) -> Self {
        self.file_url = Some(file_url.into());
        self
    }

    /// Set the active flag
    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Set the sort order
    pub fn with_display_order(mut self, display_order: i64) -> Self {
        self.display_order = Some(display_order);
        self
    }
}
