use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,
    /// Length of the snake when a game starts
    pub initial_snake_length: usize,
    /// Fixed seed for food placement, random when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            tick_interval_ms: 200,
            initial_snake_length: 3,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Reject configurations the engine cannot start a game with
    pub fn validate(&self) -> Result<()> {
        ensure!(self.grid_size > 0, "grid size must be positive");
        ensure!(
            self.initial_snake_length > 0,
            "initial snake length must be positive"
        );
        // Cells are addressed with i32 coordinates
        ensure!(
            self.grid_size <= i32::MAX as usize,
            "grid size {} exceeds the maximum of {}",
            self.grid_size,
            i32::MAX
        );
        // The body trails left from the center, so it must end at x >= 0
        ensure!(
            self.grid_size / 2 + 1 >= self.initial_snake_length,
            "grid size {} is too small for an initial snake of length {}",
            self.grid_size,
            self.initial_snake_length
        );
        let cell_count = self
            .grid_size
            .checked_mul(self.grid_size)
            .with_context(|| format!("grid size {} has too many cells", self.grid_size))?;
        ensure!(
            cell_count > self.initial_snake_length,
            "grid has no room left for food"
        );
        ensure!(self.tick_interval_ms > 0, "tick interval must be positive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.tick_interval_ms, 200);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15).with_seed(3);
        assert_eq!(config.grid_size, 15);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.tick_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_rejects_empty_grid() {
        assert!(GameConfig::new(0).validate().is_err());
    }

    #[test]
    fn test_rejects_zero_tick() {
        let config = GameConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_snake_that_does_not_fit() {
        // center is 1, body would reach x = -1
        assert!(GameConfig::new(3).validate().is_err());
        assert!(GameConfig::new(4).validate().is_ok());
    }

    #[test]
    fn test_rejects_oversized_grid() {
        assert!(GameConfig::new(usize::MAX / 2).validate().is_err());
        assert!(GameConfig::new(usize::MAX).validate().is_err());
        assert!(GameConfig::new(i32::MAX as usize + 1).validate().is_err());
    }

    #[test]
    fn test_too_small_grid_names_snake_length() {
        let err = GameConfig::new(3).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "grid size 3 is too small for an initial snake of length 3"
        );
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snake.json");
        std::fs::write(&path, r#"{ "grid_size": 12, "seed": 9 }"#).unwrap();

        let config = GameConfig::from_file(&path).unwrap();

        assert_eq!(config.grid_size, 12);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.tick_interval_ms, 200);
        assert_eq!(config.initial_snake_length, 3);
    }

    #[test]
    fn test_from_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = GameConfig::from_file(&temp_dir.path().join("nope.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_roundtrip_json() {
        let config = GameConfig::large().with_seed(1);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
