use crate::{
    sync::controller::AuthProvider,
    utils::{
        fs::get_config_path,
        logger::{LogLevel, Logger},
    },
};
use serde_json::Value;
use std::path::{Path, PathBuf};

const AUTH_KEY_ENV: &str = "STREMIO_AUTH_KEY";

/// Resolves the Stremio auth key: `STREMIO_AUTH_KEY` first, then the config file.
///
/// `Ok(None)` means nobody is logged in; `Err` means the config file could not be used.
pub fn load_session_token() -> Result<Option<String>, String> {
    if let Ok(key) = std::env::var(AUTH_KEY_ENV) {
        if !key.trim().is_empty() {
            return Ok(Some(key.trim().to_string()));
        }
    }
    let config_path = get_config_path()?;
    read_auth_key_from(&config_path)
}

pub fn read_auth_key_from(config_path: &Path) -> Result<Option<String>, String> {
    if !config_path.exists() {
        return Ok(None);
    }
    let cfg_text = std::fs::read_to_string(config_path).map_err(|e| {
        format!(
            "Failed to read config file {}: {}",
            config_path.display(),
            e
        )
    })?;
    let cfg_json: Value = cfg_text.parse().map_err(|e| {
        format!(
            "Failed to parse config file {}: {}",
            config_path.display(),
            e
        )
    })?;
    Ok(auth_key_from_config(&cfg_json))
}

/// Accepts both our own `{"authKey": ...}` and a copied Stremio profile `{"auth": {"key": ...}}`.
pub fn auth_key_from_config(cfg: &Value) -> Option<String> {
    cfg.get("authKey")
        .or_else(|| cfg.get("auth").and_then(|auth| auth.get("key")))
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn save_session_token(auth_key: &str) -> Result<PathBuf, String> {
    let config_path = get_config_path()?;
    write_auth_key_to(&config_path, Some(auth_key))?;
    Ok(config_path)
}

/// Returns whether there was a key to remove.
pub fn clear_session_token() -> Result<bool, String> {
    let config_path = get_config_path()?;
    if !config_path.exists() {
        return Ok(false);
    }
    let had_key = matches!(read_auth_key_from(&config_path), Ok(Some(_)));
    write_auth_key_to(&config_path, None)?;
    Ok(had_key)
}

/// Rewrites `authKey` in the config file, keeping any other settings already there.
pub fn write_auth_key_to(config_path: &Path, auth_key: Option<&str>) -> Result<(), String> {
    let mut cfg_json = if config_path.exists() {
        std::fs::read_to_string(config_path)
            .ok()
            .and_then(|text| text.parse::<Value>().ok())
            .filter(|v| v.is_object())
            .unwrap_or_else(|| Value::Object(Default::default()))
    } else {
        Value::Object(Default::default())
    };

    if let Some(obj) = cfg_json.as_object_mut() {
        obj.remove("auth");
        match auth_key {
            Some(key) => {
                obj.insert("authKey".to_string(), Value::String(key.trim().to_string()));
            }
            None => {
                obj.remove("authKey");
            }
        }
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            format!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let raw = serde_json::to_string_pretty(&cfg_json)
        .map_err(|e| format!("Failed to serialize config file: {}", e))?;
    std::fs::write(config_path, raw).map_err(|e| format!("Failed to write config file: {}", e))
}

/// Auth provider backed by the environment and the local config file, re-read on every call
/// so a `login` from another terminal is picked up by a running session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionAuth;

impl AuthProvider for SessionAuth {
    fn auth_key(&self) -> Option<String> {
        match load_session_token() {
            Ok(key) => key,
            Err(e) => {
                Logger::new().log_message(LogLevel::Warning, &e);
                None
            }
        }
    }
}
