pub mod client;
pub mod models;
pub mod provider;

pub use client::AppleMusicClient;
pub use provider::AppleMusicProvider;
