pub mod client;
pub mod models;
pub mod provider;

pub use client::YouTubeClient;
pub use provider::YouTubeMusicProvider;
