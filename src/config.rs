use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub drawing: DrawingConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Display name stored on every mark this reviewer creates.
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingConfig {
    #[serde(default = "default_shape")]
    pub default_shape: String,
    #[serde(default = "default_color")]
    pub default_color: String,
    /// Outline thickness in intrinsic image pixels.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default)]
    pub recent_paths: Vec<String>,
}

// Default value functions
fn default_display_name() -> String {
    "Reviewer".to_string()
}

fn default_shape() -> String {
    "rectangle".to_string()
}

fn default_color() -> String {
    "blue".to_string()
}

fn default_stroke_width() -> f32 {
    crate::render::DEFAULT_STROKE_WIDTH
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
        }
    }
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_shape: default_shape(),
            default_color: default_color(),
            stroke_width: default_stroke_width(),
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            recent_paths: Vec::new(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            identity: IdentityConfig::default(),
            drawing: DrawingConfig::default(),
            gallery: GalleryConfig::default(),
        }
    }
}

/// Get the path to the config file
pub fn config_path() -> PathBuf {
    let config_dir = directories::ProjectDirs::from("", "", "markboard")
        .expect("Failed to determine config directory")
        .config_dir()
        .to_path_buf();
    config_dir.join("config.toml")
}

/// Load configuration from file, or return default if file doesn't exist
pub fn load_config() -> AppConfig {
    let path = config_path();
    if path.exists() {
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse config file: {}. Using defaults.", e);
                    AppConfig::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}. Using defaults.", e);
                AppConfig::default()
            }
        }
    } else {
        AppConfig::default()
    }
}

/// Save configuration to file
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    let path = config_path();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let toml = toml::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(&path, toml).map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

/// Add a gallery path to the recent list
pub fn add_recent_path(config: &mut AppConfig, path: String) {
    // Remove if already in list
    config.gallery.recent_paths.retain(|p| p != &path);

    // Add to front
    config.gallery.recent_paths.insert(0, path);

    // Keep only last 10
    config.gallery.recent_paths.truncate(10);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let config: AppConfig = toml::from_str("[identity]\ndisplay_name = \"Ada\"\n").unwrap();
        assert_eq!(config.identity.display_name, "Ada");
        assert_eq!(config.drawing.default_shape, "rectangle");
        assert_eq!(config.drawing.default_color, "blue");
        assert_eq!(config.drawing.stroke_width, 3.0);
        assert!(config.gallery.recent_paths.is_empty());
    }

    #[test]
    fn stroke_width_is_read_from_the_drawing_section() {
        let config: AppConfig = toml::from_str("[drawing]\nstroke_width = 5.0\n").unwrap();
        assert_eq!(config.drawing.stroke_width, 5.0);
        // Sibling fields still default.
        assert_eq!(config.drawing.default_shape, "rectangle");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = AppConfig::default();
        config.identity.display_name = "Grace".into();
        add_recent_path(&mut config, "/tmp/shots".into());

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.identity.display_name, "Grace");
        assert_eq!(parsed.gallery.recent_paths, vec!["/tmp/shots"]);
    }

    #[test]
    fn recent_paths_dedupe_and_cap_at_ten() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            add_recent_path(&mut config, format!("/p/{i}"));
        }
        add_recent_path(&mut config, "/p/5".into());

        assert_eq!(config.gallery.recent_paths.len(), 10);
        assert_eq!(config.gallery.recent_paths[0], "/p/5");
        assert_eq!(
            config
                .gallery
                .recent_paths
                .iter()
                .filter(|p| p.as_str() == "/p/5")
                .count(),
            1
        );
    }
}
