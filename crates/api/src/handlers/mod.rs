pub mod admin;
pub mod auth;
pub mod ingredients;
pub mod recipes;
pub mod reports;
