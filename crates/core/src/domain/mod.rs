pub mod cart;
pub mod item;
