//! Business logic services
//!
//! Services sit between the HTTP handlers and the repositories. They
//! validate input, run reads through the content cache, and invalidate
//! the affected buckets on writes.

pub mod auth;
pub mod password;
pub mod post;
pub mod preferences;
pub mod resume;

pub use auth::{spawn_session_sweeper, AdminAuthService, AuthError};
pub use post::{PostService, PostServiceError};
pub use preferences::{PreferencesService, PreferencesServiceError};
pub use resume::{ResumeLinkService, ResumeLinkServiceError};
