use super::models::Config;
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid storage.base_url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("navigation.max_scan_days must be at least 1")]
    ZeroScanDays,

    #[error("cameras.ids must not be empty")]
    NoCameras,

    #[error("empty camera id")]
    EmptyCameraId,

    #[error("duplicate camera id: {0}")]
    DuplicateCameraId(String),
}

pub fn validate(config: &Config) -> Result<(), ValidationError> {
    let base_url = &config.storage.base_url;
    match Url::parse(base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => {
            return Err(ValidationError::InvalidBaseUrl {
                url: base_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        Err(e) => {
            return Err(ValidationError::InvalidBaseUrl {
                url: base_url.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.navigation.max_scan_days == 0 {
        return Err(ValidationError::ZeroScanDays);
    }

    if config.cameras.ids.is_empty() {
        return Err(ValidationError::NoCameras);
    }
    let mut seen = HashSet::new();
    for id in &config.cameras.ids {
        if id.is_empty() {
            return Err(ValidationError::EmptyCameraId);
        }
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateCameraId(id.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut config = Config::default();
        config.storage.base_url = "ftp://cams.example.net".to_string();
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidBaseUrl { .. })
        ));

        config.storage.base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_scan_days() {
        let mut config = Config::default();
        config.navigation.max_scan_days = 0;
        assert!(matches!(validate(&config), Err(ValidationError::ZeroScanDays)));
    }

    #[test]
    fn test_rejects_camera_id_problems() {
        let mut config = Config::default();
        config.cameras.ids.clear();
        assert!(matches!(validate(&config), Err(ValidationError::NoCameras)));

        config.cameras.ids = vec!["1".to_string(), "1".to_string()];
        assert!(matches!(
            validate(&config),
            Err(ValidationError::DuplicateCameraId(_))
        ));
    }
}
