pub mod http;
pub mod manager;
#[cfg(test)]
pub mod memory;
#[cfg(test)]
pub mod stub;
pub mod traits;
pub mod types;

pub use manager::PlatformRegistry;
pub use traits::PlatformAdapter;
pub use types::Platform;
