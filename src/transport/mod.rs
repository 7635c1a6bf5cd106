//! Terminal front end: one-shot commands and the interactive shop

pub mod cli;
pub mod render;
pub mod shop;

pub use shop::{ShopCommand, ShopSession};
