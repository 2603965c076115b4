//! Preview Scene Provider Port
//!
//! Abstract interface for street-level preview lookups.

use async_trait::async_trait;

use crate::domain::entities::PreviewScene;
use crate::domain::errors::ProviderError;
use crate::domain::value_objects::Coordinate;

/// Service interface for preview scene lookups
#[async_trait]
pub trait PreviewSceneProvider: Send + Sync {
    /// Find a scene near `coordinate`. `Ok(None)` means no imagery exists.
    async fn lookup_scene(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<PreviewScene>, ProviderError>;
}

#[async_trait]
impl<T: PreviewSceneProvider + ?Sized> PreviewSceneProvider for Box<T> {
    async fn lookup_scene(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<PreviewScene>, ProviderError> {
        (**self).lookup_scene(coordinate).await
    }
}

/// Provider for setups without preview imagery
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreviewScenes;

#[async_trait]
impl PreviewSceneProvider for NoPreviewScenes {
    async fn lookup_scene(
        &self,
        _coordinate: Coordinate,
    ) -> Result<Option<PreviewScene>, ProviderError> {
        Ok(None)
    }
}
