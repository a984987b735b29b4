use std::path::PathBuf;

pub fn get_user_home() -> Result<PathBuf, String> {
    dirs::home_dir().ok_or_else(|| "Failed to get user home directory".to_string())
}

/// `~/.addon-manager`
pub fn get_app_dir() -> Result<PathBuf, String> {
    Ok(get_user_home()?.join(".addon-manager"))
}

pub fn get_config_path() -> Result<PathBuf, String> {
    Ok(get_app_dir()?.join("config.json"))
}
