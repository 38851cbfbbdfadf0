//! Domain entities - the core business objects.

mod blog;
mod post;

pub use blog::Blog;
pub use post::Post;
pub(crate) use post::OwnedPost;

/// Inclusive name length bounds shared by blogs and posts.
pub const NAME_MIN_LENGTH: usize = 10;
pub const NAME_MAX_LENGTH: usize = 50;

/// Upper bound on post content length.
pub const CONTENT_MAX_LENGTH: usize = 1000;
