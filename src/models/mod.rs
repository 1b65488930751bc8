//! Data models
//!
//! Entity types shared between the store layer, services, and API:
//! - Blog posts and publication status
//! - Per-user theme preferences
//! - Resume download links

pub mod post;
pub mod preferences;
pub mod resume_link;

pub use post::{BlogPost, CreatePostInput, PostStatus, UpdatePostInput};
pub use preferences::{Theme, UserPreferences};
pub use resume_link::{CreateResumeLinkInput, ResumeLink, UpdateResumeLinkInput};
