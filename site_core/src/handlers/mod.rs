pub mod forms;
pub mod health;
pub mod routes;
pub mod sitemap;
