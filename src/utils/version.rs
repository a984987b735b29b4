use crate::utils::signature::get_signature;

/// Returns the CLI version: `ADDON_MANAGER_VERSION` when set, otherwise the crate version.
pub fn get_version() -> String {
    if let Ok(v) = std::env::var("ADDON_MANAGER_VERSION") {
        if !v.trim().is_empty() {
            return v;
        }
    }

    option_env!("CARGO_PKG_VERSION").unwrap_or("0.0.0").to_string()
}

pub fn get_version_with_signature() -> String {
    get_signature(&get_version())
}
