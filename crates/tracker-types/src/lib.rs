pub mod api;
pub mod date;
pub mod models;
