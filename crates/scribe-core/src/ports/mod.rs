//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;
mod transaction;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use repository::{
    BaseRepository, PostListQuery, PostRepository, SortField, SortOrder, TagRepository,
    UserRepository,
};
pub use transaction::{TransactionManager, TxFuture};
