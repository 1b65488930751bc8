//! Blog post model
//!
//! This module provides:
//! - `BlogPost` entity representing a published or draft post
//! - `PostStatus` enum for publication states
//! - Input types for creating and updating posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog post entity
///
/// Identifiers are uuid strings so the same record shape round-trips
/// through both the SQLite store and the hosted table service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Unique identifier (uuid string)
    pub id: String,
    /// Post title
    pub title: String,
    /// HTML content
    pub content: String,
    /// Short excerpt for list views
    #[serde(default)]
    pub excerpt: Option<String>,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Ordered list of tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Author display name
    #[serde(default = "default_author")]
    pub author: String,
    /// Whether the post is featured on the landing page
    #[serde(default)]
    pub featured: bool,
    /// Number of recorded reads
    #[serde(default)]
    pub read_count: i64,
    /// Number of likes
    #[serde(default)]
    pub like_count: i64,
    /// Publication status
    pub status: PostStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

fn default_author() -> String {
    "Software Engineer".to_string()
}

/// Post publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Draft - not visible to public
    #[default]
    Draft,
    /// Published - visible to public
    Published,
}

impl PostStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }

    /// Parse status from database string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a new post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostInput {
    /// Post title
    pub title: String,
    /// HTML content
    pub content: String,
    /// Short excerpt (optional)
    #[serde(default)]
    pub excerpt: Option<String>,
    /// URL-friendly slug (generated from the title when absent)
    #[serde(default)]
    pub slug: Option<String>,
    /// Ordered list of tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Author display name (optional)
    #[serde(default)]
    pub author: Option<String>,
    /// Whether the post is featured
    #[serde(default)]
    pub featured: bool,
    /// Publication status (defaults to Draft)
    #[serde(default)]
    pub status: Option<PostStatus>,
}

impl CreatePostInput {
    /// Create a new CreatePostInput with the required fields
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            excerpt: None,
            slug: None,
            tags: Vec::new(),
            author: None,
            featured: false,
            status: None,
        }
    }

    /// Set the slug
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Set the excerpt
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Mark the post as featured
    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }
}

/// Input for updating an existing post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostInput {
    /// New title (optional)
    pub title: Option<String>,
    /// New content (optional)
    pub content: Option<String>,
    /// New excerpt (optional)
    pub excerpt: Option<String>,
    /// New slug (optional)
    pub slug: Option<String>,
    /// New tags (optional, replaces the full list)
    pub tags: Option<Vec<String>>,
    /// New author (optional)
    pub author: Option<String>,
    /// New featured flag (optional)
    pub featured: Option<bool>,
    /// New status (optional)
    pub status: Option<PostStatus>,
}

impl UpdatePostInput {
    /// Create a new empty UpdatePostInput
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the slug
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the featured flag
    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }
}
