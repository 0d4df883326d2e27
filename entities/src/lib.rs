pub mod accounts;
pub mod likes;
pub mod products;
