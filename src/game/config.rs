use bevy::prelude::Resource;
use serde::Deserialize;

const CONFIG_JSON: &str = include_str!("../../assets/puzzle.json");

const MIN_GRID_SIZE: usize = 2;
const MAX_GRID_SIZE: usize = 8;

/// Only TLS web sources are registered with the asset server
const WEB_IMAGE_SCHEME: &str = "https://";

/// Puzzle settings, embedded at build time
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Tiles per side
    pub grid_size: usize,
    /// Edge length of one tile in image pixels
    pub piece_size: u32,
    /// Asset path of the bundled puzzle image (expected grid_size * piece_size square)
    pub image_path: String,
    /// Optional https image tried first; the bundled image is used if it fails
    pub image_url: Option<String>,
    /// Storage key for the best time
    pub best_time_key: String,
    /// Visual gap between tiles, in world units
    pub tile_gap: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 3,
            piece_size: 100,
            image_path: "puzzle.png".to_string(),
            image_url: None,
            best_time_key: "bestTime".to_string(),
            tile_gap: 4.0,
        }
    }
}

impl GameConfig {
    /// Load the embedded configuration
    pub fn load() -> Result<Self, String> {
        Self::from_json(CONFIG_JSON)
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| format!("Config parse error: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(format!(
                "grid_size {} out of range {}..={}",
                self.grid_size, MIN_GRID_SIZE, MAX_GRID_SIZE
            ));
        }
        if self.piece_size == 0 {
            return Err("piece_size must be positive".to_string());
        }
        if self.best_time_key.trim().is_empty() {
            return Err("best_time_key must not be empty".to_string());
        }
        if !self.tile_gap.is_finite() || self.tile_gap < 0.0 {
            return Err(format!("tile_gap {} must be a non-negative number", self.tile_gap));
        }
        if let Some(url) = &self.image_url
            && !url.starts_with(WEB_IMAGE_SCHEME)
        {
            return Err(format!("image_url '{}' must start with {}", url, WEB_IMAGE_SCHEME));
        }
        Ok(())
    }

    /// Image to load first, and the one to fall back to if that fails
    pub fn image_sources(&self) -> (&str, Option<&str>) {
        match &self.image_url {
            Some(url) => (url.as_str(), Some(self.image_path.as_str())),
            None => (self.image_path.as_str(), None),
        }
    }

    pub fn tile_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Full board edge in world units, gaps included
    pub fn board_extent(&self) -> f32 {
        let n = self.grid_size as f32;
        n * self.piece_size as f32 + (n - 1.0) * self.tile_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_is_valid() {
        let config = GameConfig::load().unwrap();
        assert_eq!(config.grid_size, 3);
        assert_eq!(config.piece_size, 100);
        assert_eq!(config.best_time_key, "bestTime");
        assert_eq!(config.tile_count(), 9);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = GameConfig::from_json(r#"{ "piece_size": 64 }"#).unwrap();
        assert_eq!(config.piece_size, 64);
        assert_eq!(config.grid_size, 3);
        assert_eq!(config.image_path, "puzzle.png");
    }

    #[test]
    fn test_invalid_configs() {
        assert!(GameConfig::from_json(r#"{ "grid_size": 1 }"#).is_err());
        assert!(GameConfig::from_json(r#"{ "piece_size": 0 }"#).is_err());
        assert!(GameConfig::from_json(r#"{ "best_time_key": " " }"#).is_err());
        assert!(GameConfig::from_json(r#"{ "tile_gap": -1.0 }"#).is_err());
        assert!(GameConfig::from_json(r#"{ "colour": "red" }"#).is_err());
        assert!(GameConfig::from_json(r#"{ "image_url": "http://example.com/a.jpg" }"#).is_err());
        assert!(GameConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_web_image_falls_back_to_bundled() {
        let config = GameConfig::load().unwrap();
        assert_eq!(
            config.image_sources(),
            ("https://picsum.photos/300.jpg", Some("puzzle.png"))
        );

        let local = GameConfig::default();
        assert_eq!(local.image_sources(), ("puzzle.png", None));
    }

    #[test]
    fn test_board_extent() {
        let config = GameConfig::default();
        assert_eq!(config.board_extent(), 308.0);
    }
}
