pub mod board;
pub mod client;
pub mod types;

pub use board::{ApiError, BoardApi};
pub use client::HttpBoard;
pub use types::{Message, User};
