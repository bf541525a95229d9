// Type-safe asset handle system

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer};

/// Unique identifier for an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub(crate) u64);

impl AssetId {
    /// Create a new asset ID from a string path
    pub fn from_path(path: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Create an asset ID from a raw u64
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Type-safe handle to an asset owned by some external system
///
/// The `T` parameter ensures handles can only be used with the correct asset type.
/// Authored data refers to assets by path; deserializing a handle hashes that path.
pub struct AssetHandle<T> {
    pub(crate) id: AssetId,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> AssetHandle<T> {
    /// Create a new asset handle
    pub fn new(id: AssetId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Create a handle for the asset at `path`
    pub fn from_path(path: &str) -> Self {
        Self::new(AssetId::from_path(path))
    }

    /// Get the underlying asset ID
    pub fn id(&self) -> AssetId {
        self.id
    }
}

// Manual impls so `T` itself needs no bounds
impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AssetHandle<T> {}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> std::hash::Hash for AssetHandle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetHandle({:#x})", self.id.0)
    }
}

impl<'de, T> Deserialize<'de> for AssetHandle<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        Ok(Self::from_path(&path))
    }
}

/// Marker for sounds owned by the audio engine
pub struct SoundAsset;

pub type SoundHandle = AssetHandle<SoundAsset>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_from_path() {
        let id1 = AssetId::from_path("sounds/whoosh.ogg");
        let id2 = AssetId::from_path("sounds/whoosh.ogg");
        let id3 = AssetId::from_path("sounds/impact.ogg");

        assert_eq!(id1, id2, "Same paths should produce same IDs");
        assert_ne!(id1, id3, "Different paths should produce different IDs");
    }

    #[test]
    fn test_asset_id_roundtrip() {
        let id = AssetId::from_u64(12345);
        assert_eq!(id.as_u64(), 12345);
    }

    #[test]
    fn test_handle_is_copy() {
        let whoosh = SoundHandle::new(AssetId::from_u64(1));
        let copy = whoosh;
        assert_eq!(whoosh.id(), copy.id());
    }

    #[test]
    fn test_handle_deserializes_from_path() {
        let handle: SoundHandle = serde_json::from_str(r#""sounds/whoosh.ogg""#).unwrap();
        assert_eq!(handle, SoundHandle::from_path("sounds/whoosh.ogg"));
    }
}
