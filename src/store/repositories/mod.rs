//! Store repositories
//!
//! Repository pattern implementations for table access.
//! Each repository handles the operations for a specific entity and
//! dispatches on the store driver to a SQLite or remote implementation.

pub mod post;
pub mod preferences;
pub mod resume_link;

pub use post::{PostRepository, StorePostRepository};
pub use preferences::{PreferencesRepository, StorePreferencesRepository};
pub use resume_link::{ResumeLinkRepository, StoreResumeLinkRepository};
