mod accounts;
pub mod configuration;
mod likes;
pub mod migrations;
mod products;
pub mod repository;
