pub mod init;
mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::scoring::validate_scoring;

/// Get the config directory path (~/.config/rent-optimizer/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("rent-optimizer"))
}

/// Get the default config file path (~/.config/rent-optimizer/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Ensure the parent directory of `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory at {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/rent-optimizer/config.yaml) and falls back to built-in
///   defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => match get_config_path() {
            Ok(p) => (p, false),
            Err(_) => return Ok(Config::default()),
        },
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Save configuration atomically
///
/// Uses atomic-write-file so an interrupted write never leaves a truncated
/// config behind. Creates the parent directory if needed.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    ensure_parent_dir(path)?;

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}

/// Validate the whole configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = match validate_scoring(&config.weights, &config.scoring) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    if let Some(max_rent) = config.filters.max_rent {
        if !max_rent.is_finite() || max_rent <= 0.0 {
            errors.push(format!("filters.max_rent: must be greater than zero (got {})", max_rent));
        }
    }
    if let Some(min_safety) = config.filters.min_safety {
        if !(0.0..=crate::dataset::types::SAFETY_INDEX_MAX).contains(&min_safety) {
            errors.push(format!("filters.min_safety: must be between 0 and 10 (got {})", min_safety));
        }
    }
    if config.dataset.city.trim().is_empty() {
        errors.push("dataset.city: must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::WeightConfig;

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let result = load_config(Some(PathBuf::from("/nonexistent/rent-optimizer.yaml")));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.weights = WeightConfig::new(0.1, 0.2, 0.3);
        config.filters.max_rent = Some(40000.0);

        save_config(&path, &config).unwrap();
        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "weights: [not, a, map]\n").unwrap();
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = Config::default();
        config.weights.cafe = -1.0;
        config.filters.max_rent = Some(0.0);
        config.filters.min_safety = Some(12.0);
        config.dataset.city = " ".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("weights.cafe"));
        assert!(errors.iter().any(|e| e.contains("filters.max_rent")));
        assert!(errors.iter().any(|e| e.contains("filters.min_safety")));
        assert!(errors.iter().any(|e| e.contains("dataset.city")));
    }
}
