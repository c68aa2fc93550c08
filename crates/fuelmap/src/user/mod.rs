//! User repositories: domain lists joined with preferences and location.
//!
//! Each observation derives an effective query from the caller's query and
//! the persisted sorting configuration, follows the domain repository's
//! live list for that query, and stamps user-specific fields on every
//! emission of the list, the user data or the device location.

pub mod merge;
pub mod news;
pub mod stations;

pub use news::UserNewsRepository;
pub use stations::UserStationsRepository;
