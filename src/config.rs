//! Editor configuration
//!
//! Defaults match the stock lab template. A page may override them with a
//! JSON block (`<script type="application/json" id="lab-edit-config">`).

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_IMAGE_BYTES, UNLOCK_CLICKS, UNLOCK_WINDOW_MS};

/// Names of the persisted keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub media_main: String,
    pub media_gallery: String,
    pub media_videos: String,
    pub team_members: String,
    pub publications: String,
    /// Brand text, read-only here
    pub site_name: String,
    /// Session-scoped (tab lifetime) edit flag
    pub edit_mode: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            media_main: "labMediaMain".to_string(),
            media_gallery: "labMediaGallery".to_string(),
            media_videos: "labMediaVideos".to_string(),
            team_members: "labTeamMembers".to_string(),
            publications: "labPublications".to_string(),
            site_name: "labSiteName".to_string(),
            edit_mode: "labEditMode".to_string(),
        }
    }
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Brand clicks needed to unlock
    pub unlock_clicks: u32,
    /// Maximum gap between unlock clicks (ms)
    pub unlock_window_ms: f64,
    /// Upload ceiling for embedded images (bytes)
    pub max_image_bytes: u64,
    pub keys: StorageKeys,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            unlock_clicks: UNLOCK_CLICKS,
            unlock_window_ms: UNLOCK_WINDOW_MS,
            max_image_bytes: MAX_IMAGE_BYTES,
            keys: StorageKeys::default(),
        }
    }
}

impl EditorConfig {
    /// Parse an override block, falling back to defaults when malformed
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<EditorConfig>(json) {
            Ok(config) => {
                log::info!("Loaded editor config overrides");
                config.sanitized()
            }
            Err(e) => {
                log::warn!("Ignoring malformed editor config: {}", e);
                Self::default()
            }
        }
    }

    /// Clamp values that would make the editor unusable
    fn sanitized(mut self) -> Self {
        if self.unlock_clicks == 0 {
            self.unlock_clicks = UNLOCK_CLICKS;
        }
        if self.unlock_window_ms.is_nan() || self.unlock_window_ms <= 0.0 {
            self.unlock_window_ms = UNLOCK_WINDOW_MS;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.unlock_clicks, 5);
        assert_eq!(config.unlock_window_ms, 3000.0);
        assert_eq!(config.max_image_bytes, 3 * 1024 * 1024);
        assert_eq!(config.keys.team_members, "labTeamMembers");
        assert_eq!(config.keys.edit_mode, "labEditMode");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{"unlock_clicks": 3, "keys": {"publications": "pubs"}}"#);
        assert_eq!(config.unlock_clicks, 3);
        assert_eq!(config.unlock_window_ms, 3000.0);
        assert_eq!(config.keys.publications, "pubs");
        assert_eq!(config.keys.media_main, "labMediaMain");
    }

    #[test]
    fn test_malformed_falls_back() {
        assert_eq!(EditorConfig::from_json("{not json"), EditorConfig::default());
    }

    #[test]
    fn test_zero_clicks_clamped() {
        let config = EditorConfig::from_json(r#"{"unlock_clicks": 0, "unlock_window_ms": -1}"#);
        assert_eq!(config.unlock_clicks, 5);
        assert_eq!(config.unlock_window_ms, 3000.0);
    }
}
