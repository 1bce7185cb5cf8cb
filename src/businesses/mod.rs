// Businesses module
// Owner-scoped CRUD plus the public listings

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::Business;
pub use repository::BusinessRepository;
