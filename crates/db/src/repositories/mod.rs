//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod genre_repo;
pub mod movie_repo;
pub mod rating_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use genre_repo::GenreRepo;
pub use movie_repo::MovieRepo;
pub use rating_repo::RatingRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
