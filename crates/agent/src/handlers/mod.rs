pub mod cart;
pub mod recipes;
