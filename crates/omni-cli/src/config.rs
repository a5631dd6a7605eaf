use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use omni_crypto::{PasswordSpec, MAX_LENGTH, MIN_LENGTH};
use omni_network::geoip::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use omni_qr::style::{MAX_EXPORT_SIZE, MIN_EXPORT_SIZE};
use omni_qr::{DotStyle, ErrorCorrectionLevel, ExportFormat, QrStyle, Rgb};
use crate::cli::OutputFormat;
use crate::error::{CliError, Result};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub general: GeneralConfig,
    pub qr: QrConfig,
    pub password: PasswordSpec,
    pub network: NetworkConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

/// Defaults for the `qr` command; every field can be overridden by a flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    pub format: ExportFormat,
    pub size: u32,
    pub margin: u32,
    pub dots: DotStyle,
    pub dots_color: Rgb,
    pub corner_square_color: Rgb,
    pub corner_dot_color: Rgb,
    pub background_color: Rgb,
    pub error_correction: ErrorCorrectionLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub default_output_format: OutputFormat,
    pub color_output: bool,
}

impl QrConfig {
    pub fn to_style(&self) -> QrStyle {
        QrStyle {
            size: self.size,
            margin: self.margin,
            dots: self.dots,
            dots_color: self.dots_color,
            corner_square_color: self.corner_square_color,
            corner_dot_color: self.corner_dot_color,
            background_color: self.background_color,
            error_correction: self.error_correction,
            logo: None,
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

pub struct ConfigManager {
    config: CliConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(Self::default_config_path);

        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            let default_config = CliConfig::default();
            Self::save_config(&default_config, &config_path)?;
            default_config
        };

        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn get_config(&self) -> &CliConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn update_config<F>(&mut self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut CliConfig),
    {
        updater(&mut self.config);
        Self::save_config(&self.config, &self.config_path)
    }

    pub fn reload_config(&mut self) -> Result<()> {
        self.config = Self::load_config(&self.config_path)?;
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) -> Result<()> {
        self.config = CliConfig::default();
        Self::save_config(&self.config, &self.config_path)
    }

    pub fn validate_config(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        if !LOG_LEVELS.contains(&self.config.general.log_level.to_lowercase().as_str()) {
            warnings.push(format!(
                "Log level '{}' is not one of: {}",
                self.config.general.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        let qr = &self.config.qr;
        if qr.size < MIN_EXPORT_SIZE || qr.size > MAX_EXPORT_SIZE {
            warnings.push(format!(
                "QR size {} is outside {}-{} and will be clamped",
                qr.size, MIN_EXPORT_SIZE, MAX_EXPORT_SIZE
            ));
        }

        if qr.margin.saturating_mul(2) >= qr.size {
            warnings.push("QR margin leaves no room for the code".to_string());
        }

        if qr.dots_color == qr.background_color {
            warnings.push("QR module color matches the background color".to_string());
        }

        let password = &self.config.password;
        if password.length < MIN_LENGTH || password.length > MAX_LENGTH {
            warnings.push(format!(
                "Password length must be between {} and {}",
                MIN_LENGTH, MAX_LENGTH
            ));
        }

        if !password.can_generate() {
            warnings.push("At least one password character class must be enabled".to_string());
        }

        let network = &self.config.network;
        if !(network.endpoint.starts_with("http://") || network.endpoint.starts_with("https://")) {
            warnings.push("GeoIP endpoint must be an http(s) URL".to_string());
        }

        if network.timeout_seconds == 0 {
            warnings.push("Network timeout should be at least 1 second".to_string());
        }

        Ok(warnings)
    }

    pub fn default_config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("omnitools").join("config.toml")
        } else {
            PathBuf::from(".omnitools.toml")
        }
    }

    fn load_config(path: &Path) -> Result<CliConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::ConfigError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| CliError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    fn save_config(config: &CliConfig, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| {
                    CliError::ConfigError(format!("Failed to create config directory: {}", e))
                })?;
        }

        let content = toml::to_string_pretty(config)
            .map_err(|e| CliError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| CliError::ConfigError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        let style = QrStyle::default();
        Self {
            format: ExportFormat::default(),
            size: style.size,
            margin: style.margin,
            dots: style.dots,
            dots_color: style.dots_color,
            corner_square_color: style.corner_square_color,
            corner_dot_color: style.corner_dot_color,
            background_color: style.background_color,
            error_correction: style.error_correction,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_output_format: OutputFormat::Table,
            color_output: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_creates_default_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let manager = ConfigManager::new(Some(path.clone())).unwrap();
        assert!(path.exists());
        assert_eq!(manager.get_config(), &CliConfig::default());
        assert!(manager.validate_config().unwrap().is_empty());
    }

    #[test]
    fn test_update_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut manager = ConfigManager::new(Some(path.clone())).unwrap();
        manager
            .update_config(|config| {
                config.password.length = 32;
                config.qr.dots = DotStyle::Dots;
            })
            .unwrap();

        let reloaded = ConfigManager::new(Some(path)).unwrap();
        assert_eq!(reloaded.get_config().password.length, 32);
        assert_eq!(reloaded.get_config().qr.dots, DotStyle::Dots);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[qr]\ndots_color = \"#ff0000\"\n").unwrap();

        let manager = ConfigManager::new(Some(path)).unwrap();
        let config = manager.get_config();
        assert_eq!(config.qr.dots_color, Rgb::new(0xff, 0, 0));
        assert_eq!(config.qr.size, QrStyle::default().size);
        assert_eq!(config.password, PasswordSpec::default());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[qr]\ndots_color = \"not-a-color\"\n").unwrap();

        assert!(matches!(
            ConfigManager::new(Some(path)),
            Err(CliError::ConfigError(_))
        ));
    }

    #[test]
    fn test_validate_reports_problems() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(Some(dir.path().join("config.toml"))).unwrap();
        manager
            .update_config(|config| {
                config.general.log_level = "loud".to_string();
                config.password.lowercase = false;
                config.password.uppercase = false;
                config.password.digits = false;
                config.password.symbols = false;
                config.network.endpoint = "ftp://example.com".to_string();
                config.network.timeout_seconds = 0;
            })
            .unwrap();

        let warnings = manager.validate_config().unwrap();
        assert_eq!(warnings.len(), 4);
    }

    #[test]
    fn test_reset_to_defaults() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(Some(dir.path().join("config.toml"))).unwrap();
        manager.update_config(|config| config.ui.color_output = false).unwrap();
        manager.reset_to_defaults().unwrap();
        manager.reload_config().unwrap();
        assert!(manager.get_config().ui.color_output);
    }
}
