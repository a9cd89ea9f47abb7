pub mod cart;
pub mod recipe;
