//! Query modules for the Hawkins Trade data layer.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and re-reads the persisted
//! state on every call. There is no cache between calls.

pub mod listings;
pub mod users;

pub use listings::{ListingQuery, SearchListingsParams};
pub use users::UserQuery;
