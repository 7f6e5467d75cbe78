//! External data access.

mod api;

pub use api::ApiClient;
