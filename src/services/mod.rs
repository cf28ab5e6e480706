/// Business logic layer
///
/// One service per resource, each a thin sequence of entity-store calls.
/// Handlers own request validation and authorization; services own the
/// store round trips and response shaping.
pub mod comments;
pub mod posts;
pub mod users;

pub use comments::CommentService;
pub use posts::{PostPage, PostService, PAGE_SIZE};
pub use users::UserService;
