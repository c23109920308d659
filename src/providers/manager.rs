use crate::errors::SyncError;
use crate::providers::traits::PlatformAdapter;
use crate::providers::types::Platform;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps each platform tag to its adapter. Built once at startup and handed
/// to the workflows; nothing in the core looks adapters up by free text.
#[derive(Clone, Default)]
pub struct PlatformRegistry {
    adapters: HashMap<Platform, Arc<dyn PlatformAdapter>>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        let platform = adapter.platform();
        log::info!("Registering platform adapter: {} ({})", adapter.name(), platform.id());
        self.adapters.insert(platform, adapter);
    }

    pub fn with(mut self, adapter: Arc<dyn PlatformAdapter>) -> Self {
        self.register(adapter);
        self
    }

    pub fn get(&self, platform: Platform) -> Result<Arc<dyn PlatformAdapter>, SyncError> {
        self.adapters
            .get(&platform)
            .cloned()
            .ok_or_else(|| SyncError::PlatformNotRegistered(platform.to_string()))
    }

    pub fn contains(&self, platform: Platform) -> bool {
        self.adapters.contains_key(&platform)
    }

    /// Registered platforms in declaration order.
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.adapters.contains_key(p))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::memory::InMemoryAdapter;

    #[test]
    fn test_lookup_registered_and_missing() {
        let registry = PlatformRegistry::new()
            .with(Arc::new(InMemoryAdapter::new(Platform::YouTubeMusic)))
            .with(Arc::new(InMemoryAdapter::new(Platform::Spotify)));

        assert!(registry.get(Platform::Spotify).is_ok());
        assert_eq!(
            registry.platforms(),
            vec![Platform::Spotify, Platform::YouTubeMusic]
        );
        assert!(matches!(
            registry.get(Platform::AppleMusic),
            Err(SyncError::PlatformNotRegistered(_))
        ));
    }
}
