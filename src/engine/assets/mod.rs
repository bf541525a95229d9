// Asset management system
//
// Authored combat data (fighting styles, baked clip channels) is read from JSON
// files under an asset root. Sounds and clips themselves belong to the external
// audio/animation engines and are referenced only through typed handles.

mod handle;
mod loader;

pub use handle::{AssetHandle, AssetId, SoundAsset, SoundHandle};
pub use loader::{AssetLoader, AssetType};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error("Malformed asset data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("styles/ninja.json".to_string());
        assert_eq!(err.to_string(), "Asset not found: styles/ninja.json");
    }

    #[test]
    fn test_parse_error_wraps_serde() {
        let err: AssetError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("Malformed asset data"));
    }
}
