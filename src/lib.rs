pub mod auth;
pub mod db;
pub mod filters;
pub mod models;
pub mod repo;
pub mod routes;
pub mod state;
pub mod templates;
pub mod uploads;
