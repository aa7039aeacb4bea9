pub mod products;
pub mod routes;
