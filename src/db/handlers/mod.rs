//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection or transaction, provides
//! strongly-typed CRUD operations, and returns domain models from
//! [`crate::db::models`]. Series operations are always scoped by the owning
//! user so a record belonging to someone else is indistinguishable from a
//! missing one.

pub mod repository;
pub mod series;
pub mod users;

pub use repository::Repository;
pub use series::Series;
pub use users::Users;
