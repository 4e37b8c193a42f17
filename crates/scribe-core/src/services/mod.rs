//! Application services orchestrating the aggregate, tag resolution and
//! transactions.

mod posts;
mod tag_resolver;

pub use posts::{
    CreatePostInput, DEFAULT_PAGE_SIZE, ListPostsInput, MAX_PAGE_SIZE, PatchPostInput, PostPage,
    PostService, PostUseCases, UpdatePostInput,
};
pub use tag_resolver::TagResolver;
