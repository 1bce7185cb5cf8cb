// Products module
// Owner-scoped CRUD, the public filtered listing and image uploads

pub mod error;
pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;
pub mod service;

pub use error::ProductError;
pub use models::Product;
pub use repository::ProductRepository;
pub use service::ProductService;
