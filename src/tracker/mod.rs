mod client;
mod models;
mod payload;

pub use client::*;
pub use models::*;
pub use payload::*;
