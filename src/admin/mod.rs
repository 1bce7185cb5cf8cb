// Admin back-office module
// CRUD over users, businesses and products with no ownership filters,
// gated solely by the admin role guard

pub mod handlers;
pub mod models;
