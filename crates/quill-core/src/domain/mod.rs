//! Domain entities - the core business objects.

mod filter;
mod post;
mod user;

pub use filter::{PageRequest, PostFilter, PostPage};
pub use post::Post;
pub use user::User;
