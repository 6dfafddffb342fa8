//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\rooncord\config.toml
//! - macOS: ~/Library/Application Support/rooncord/config.toml
//! - Linux: ~/.config/rooncord/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded once
//! at startup and validated; an invalid or incomplete upload method is
//! coerced to the no-cost `musicbrainz` fallback. When the file is missing
//! entirely, a default template is downloaded from the project repository;
//! if that fails the bridge runs art-disabled rather than exiting.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where the default config template lives.
const DEFAULT_CONFIG_URL: &str =
    "https://raw.githubusercontent.com/rooncord/rooncord/main/config-default.toml";

/// How album art gets turned into a public link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtUploadMethod {
    /// Upload to Imgur
    Imgur,
    /// Upload to a self-hosted endpoint
    #[serde(rename = "self")]
    SelfHost,
    /// Look up existing art on MusicBrainz / Cover Art Archive
    #[default]
    MusicBrainz,
    /// No art; presence shows only the default image
    None,
    /// Anything else in the file; coerced to MusicBrainz at validation
    #[serde(other)]
    Unknown,
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Selected art upload method
    pub art_upload_method: ArtUploadMethod,

    /// Roon core endpoints and image sizing
    pub roon: RoonConfig,

    /// Discord application settings
    pub discord: DiscordConfig,

    /// Imgur backend settings
    pub imgur: ImgurConfig,

    /// Self-hosted backend settings
    pub selfhost: SelfHostConfig,
}

/// Roon core settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoonConfig {
    /// Base URL of the core's image service
    pub image_url: String,

    /// Requested art width in pixels
    pub width: u32,

    /// Requested art height in pixels
    pub height: u32,

    /// Companion command whose stdout delivers zone events as JSON lines.
    /// Empty = read events from stdin.
    pub feed_command: String,
}

impl Default for RoonConfig {
    fn default() -> Self {
        Self {
            image_url: "http://localhost:9330".to_string(),
            width: 512,
            height: 512,
            feed_command: String::new(),
        }
    }
}

/// Discord application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Discord application (client) id for the presence session
    pub application_id: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            application_id: "1286058131784208394".to_string(),
        }
    }
}

/// Imgur backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImgurConfig {
    /// Imgur API client id (required for the imgur method)
    pub client_id: String,

    /// Upload endpoint
    pub upload_url: String,

    /// Multipart field name for the image part
    pub upload_field: String,

    /// Value of the auxiliary `type` form field
    pub file_type: String,
}

impl Default for ImgurConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            upload_url: "https://api.imgur.com/3/image".to_string(),
            upload_field: "image".to_string(),
            file_type: "file".to_string(),
        }
    }
}

/// Self-hosted backend settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfHostConfig {
    /// Complete upload endpoint URL, including scheme
    pub endpoint_url: String,

    /// Authorization token type (e.g. "Bearer"); empty = no auth header
    pub auth_token_type: String,

    /// Authorization token
    pub auth_token: String,
}

impl Config {
    /// Validate the selected upload method against its settings.
    ///
    /// Incomplete or invalid selections are coerced to `musicbrainz` and
    /// logged; the bridge keeps running either way.
    pub fn validate(&mut self) {
        match self.art_upload_method {
            ArtUploadMethod::Imgur => {
                if self.imgur.client_id.is_empty() {
                    tracing::error!("No Imgur client id configured; falling back to MusicBrainz");
                    self.art_upload_method = ArtUploadMethod::MusicBrainz;
                } else {
                    tracing::info!("Using Imgur to host album art");
                }
            }
            ArtUploadMethod::SelfHost => {
                let url = &self.selfhost.endpoint_url;
                if url.is_empty() {
                    tracing::error!(
                        "No self-host endpoint URL configured; falling back to MusicBrainz"
                    );
                    self.art_upload_method = ArtUploadMethod::MusicBrainz;
                } else if !url.starts_with("http://") && !url.starts_with("https://") {
                    tracing::error!(
                        "Self-host endpoint URL must start with http:// or https://; \
                         falling back to MusicBrainz"
                    );
                    self.art_upload_method = ArtUploadMethod::MusicBrainz;
                } else if !self.selfhost.auth_token_type.is_empty()
                    && self.selfhost.auth_token.is_empty()
                {
                    tracing::error!(
                        "Auth token type set without a token; falling back to MusicBrainz"
                    );
                    self.art_upload_method = ArtUploadMethod::MusicBrainz;
                } else {
                    tracing::info!("Using self-hosted endpoint to host album art");
                }
            }
            ArtUploadMethod::MusicBrainz => {
                tracing::info!("Using MusicBrainz for presence image data");
            }
            ArtUploadMethod::None => {
                tracing::warn!("Art uploads disabled; activity will only show the default image");
            }
            ArtUploadMethod::Unknown => {
                tracing::error!(
                    "Unrecognized art upload method (valid: imgur, self, musicbrainz, none); \
                     falling back to MusicBrainz"
                );
                self.art_upload_method = ArtUploadMethod::MusicBrainz;
            }
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rooncord"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Get the full path to the art cache file
pub fn cache_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("cached_art.json"))
}

/// Load configuration, bootstrapping a default file when absent.
///
/// Never fails: a parse error degrades to defaults, and a failed template
/// download degrades to an art-disabled config.
pub async fn load_or_bootstrap(override_path: Option<&Path>) -> Config {
    let path = match override_path.map(Path::to_path_buf).or_else(config_path) {
        Some(path) => path,
        None => {
            tracing::warn!("Could not determine config directory, using defaults");
            return Config::default();
        }
    };

    if path.exists() {
        return load(&path);
    }

    match bootstrap(&path).await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Could not bootstrap config at {:?}: {}", path, e);
            tracing::warn!("Continuing with art uploads disabled");
            Config {
                art_upload_method: ArtUploadMethod::None,
                ..Default::default()
            }
        }
    }
}

/// Load configuration from an existing file.
///
/// Returns default config if the file can't be read or parsed.
/// Logs errors but doesn't fail - we always return a usable config.
pub fn load(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Download the default config template and write it to `path`.
async fn bootstrap(path: &Path) -> Result<Config, ConfigError> {
    tracing::info!("No config file found, downloading default template");

    let response = reqwest::get(DEFAULT_CONFIG_URL)
        .await
        .map_err(|e| ConfigError::Download(e.to_string()))?;
    if !response.status().is_success() {
        return Err(ConfigError::Download(format!("HTTP {}", response.status())));
    }
    let contents = response
        .text()
        .await
        .map_err(|e| ConfigError::Download(e.to_string()))?;

    let config: Config = toml::from_str(&contents).map_err(ConfigError::Parse)?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Wrote default config to {:?}; edit it to enable uploads", path);
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to download default config: {0}")]
    Download(String),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(toml::de::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("art_upload_method"));
        assert!(toml.contains("[roon]"));
        assert!(toml.contains("[discord]"));
        assert!(toml.contains("[imgur]"));
        assert!(toml.contains("[selfhost]"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
art_upload_method = "imgur"

[imgur]
client_id = "my-client-id"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.art_upload_method, ArtUploadMethod::Imgur);
        assert_eq!(config.imgur.client_id, "my-client-id");
        // Other fields use defaults
        assert_eq!(config.imgur.upload_url, "https://api.imgur.com/3/image");
        assert_eq!(config.roon.width, 512);
        assert!(config.selfhost.endpoint_url.is_empty());
    }

    #[test]
    fn test_unknown_method_string_parses_to_unknown() {
        let config: Config = toml::from_str(r#"art_upload_method = "dropbox""#).unwrap();
        assert_eq!(config.art_upload_method, ArtUploadMethod::Unknown);
    }

    #[test]
    fn test_validate_coerces_unknown_to_musicbrainz() {
        let mut config: Config = toml::from_str(r#"art_upload_method = "dropbox""#).unwrap();
        config.validate();
        assert_eq!(config.art_upload_method, ArtUploadMethod::MusicBrainz);
    }

    #[test]
    fn test_validate_imgur_without_client_id_falls_back() {
        let mut config = Config {
            art_upload_method: ArtUploadMethod::Imgur,
            ..Default::default()
        };
        config.validate();
        assert_eq!(config.art_upload_method, ArtUploadMethod::MusicBrainz);
    }

    #[test]
    fn test_validate_imgur_with_client_id_is_kept() {
        let mut config = Config {
            art_upload_method: ArtUploadMethod::Imgur,
            ..Default::default()
        };
        config.imgur.client_id = "cid".to_string();
        config.validate();
        assert_eq!(config.art_upload_method, ArtUploadMethod::Imgur);
    }

    #[test]
    fn test_validate_selfhost_requires_scheme() {
        let mut config = Config {
            art_upload_method: ArtUploadMethod::SelfHost,
            ..Default::default()
        };
        config.selfhost.endpoint_url = "img.example.net/upload".to_string();
        config.validate();
        assert_eq!(config.art_upload_method, ArtUploadMethod::MusicBrainz);
    }

    #[test]
    fn test_validate_selfhost_token_type_without_token_falls_back() {
        let mut config = Config {
            art_upload_method: ArtUploadMethod::SelfHost,
            ..Default::default()
        };
        config.selfhost.endpoint_url = "https://img.example.net/upload".to_string();
        config.selfhost.auth_token_type = "Bearer".to_string();
        config.validate();
        assert_eq!(config.art_upload_method, ArtUploadMethod::MusicBrainz);
    }

    #[test]
    fn test_validate_selfhost_complete_is_kept() {
        let mut config = Config {
            art_upload_method: ArtUploadMethod::SelfHost,
            ..Default::default()
        };
        config.selfhost.endpoint_url = "https://img.example.net/upload".to_string();
        config.validate();
        assert_eq!(config.art_upload_method, ArtUploadMethod::SelfHost);
    }

    #[test]
    fn test_method_on_disk_spelling() {
        // The on-disk spellings are part of the config contract.
        let config: Config = toml::from_str(r#"art_upload_method = "self""#).unwrap();
        assert_eq!(config.art_upload_method, ArtUploadMethod::SelfHost);

        let out = toml::to_string(&Config {
            art_upload_method: ArtUploadMethod::SelfHost,
            ..Default::default()
        })
        .unwrap();
        assert!(out.contains(r#"art_upload_method = "self""#));
    }
}
