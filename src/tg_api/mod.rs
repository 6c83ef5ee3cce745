mod client;
mod converter;
mod session;

pub use client::Client;
pub use session::Session;
