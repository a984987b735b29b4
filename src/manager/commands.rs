use crate::{
    manager::{edit::prompt_edit_form, view::TerminalView},
    remote::request::RemoteCollectionClient,
    sync::controller::SyncController,
    types::addon::ManifestEdit,
    utils::{
        api::ApiConfig,
        auth::{SessionAuth, clear_session_token, save_session_token},
        logger::{LogLevel, Logger},
        spinner::with_spinner,
    },
};

pub type TerminalController = SyncController<SessionAuth, RemoteCollectionClient, TerminalView>;

pub fn build_controller(details: bool) -> Result<TerminalController, String> {
    let remote = RemoteCollectionClient::new(ApiConfig::from_env())
        .map_err(|e| format!("Failed to create API client: {}", e))?;
    Ok(SyncController::new(
        SessionAuth,
        remote,
        TerminalView::new(details),
    ))
}

pub async fn load_with_spinner(controller: &TerminalController) -> Result<usize, String> {
    let spinner = with_spinner("Fetching your addon collection...");
    match controller.load().await {
        Ok(count) => {
            spinner.succeed(format!("Fetched {} addon(s) from Stremio", count));
            Ok(count)
        }
        Err(e) => {
            // The view has already printed the failure.
            spinner.finish_and_clear();
            Err(format!("Failed to load addons: {}", e))
        }
    }
}

pub async fn save_with_spinner(controller: &TerminalController) -> Result<(), String> {
    let spinner = with_spinner("Syncing to Stremio...");
    let result = controller.save().await;
    spinner.finish_and_clear();
    result.map_err(|e| format!("Failed to sync addons: {}", e))
}

async fn finish(controller: &TerminalController, dry_run: bool) -> Result<(), String> {
    if dry_run {
        Logger::new().log_message(
            LogLevel::Info,
            "Dry run: changes were not synced to Stremio.",
        );
        return Ok(());
    }
    save_with_spinner(controller).await
}

pub async fn list_addons(details: bool) -> Result<(), String> {
    let controller = build_controller(details)?;
    load_with_spinner(&controller).await?;
    Ok(())
}

pub async fn move_addon(from: usize, to: usize, dry_run: bool) -> Result<(), String> {
    let controller = build_controller(false)?;
    load_with_spinner(&controller).await?;

    controller
        .reorder(from, to)
        .map_err(|e| format!("Failed to move addon: {}", e))?;

    finish(&controller, dry_run).await
}

pub async fn remove_addon(index: usize, force: bool, dry_run: bool) -> Result<(), String> {
    let controller = build_controller(false)?;
    load_with_spinner(&controller).await?;

    let removed = if force {
        controller.force_remove_at(index)
    } else {
        controller.remove_at(index)
    }
    .map_err(|e| format!("Failed to remove addon: {}", e))?;

    if removed.is_protected() {
        Logger::new().log_message(
            LogLevel::Warning,
            &format!("Removed protected addon '{}'", removed.name()),
        );
    } else {
        Logger::new().log_message(LogLevel::Info, &format!("Removed '{}'", removed.name()));
    }

    finish(&controller, dry_run).await
}

/// Edits the addon at `index`. With no field supplied, asks for each one interactively.
pub async fn edit_addon(index: usize, fields: ManifestEdit, dry_run: bool) -> Result<(), String> {
    let controller = build_controller(false)?;
    load_with_spinner(&controller).await?;

    if fields.is_empty() {
        let entry = controller
            .snapshot()
            .into_iter()
            .nth(index)
            .ok_or_else(|| {
                format!(
                    "Addon index {} is out of range (collection has {} addons)",
                    index,
                    controller.len()
                )
            })?;

        let form =
            prompt_edit_form(&entry).map_err(|e| format!("Failed to prompt for edits: {}", e))?;
        if form.is_empty() {
            Logger::new().log_message(LogLevel::Info, "Nothing changed.");
            return Ok(());
        }

        if !form.fields.is_empty() {
            controller
                .edit_manifest_at(index, form.fields)
                .map_err(|e| format!("Failed to edit addon: {}", e))?;
        }
        for (catalog_index, name) in form.catalog_names {
            controller
                .edit_catalog_name_at(index, catalog_index, name)
                .map_err(|e| format!("Failed to rename catalog: {}", e))?;
        }
    } else {
        controller
            .edit_manifest_at(index, fields)
            .map_err(|e| format!("Failed to edit addon: {}", e))?;
    }

    finish(&controller, dry_run).await
}

pub async fn rename_catalog(
    index: usize,
    catalog_index: usize,
    name: String,
    dry_run: bool,
) -> Result<(), String> {
    let controller = build_controller(true)?;
    load_with_spinner(&controller).await?;

    controller
        .edit_catalog_name_at(index, catalog_index, name)
        .map_err(|e| format!("Failed to rename catalog: {}", e))?;

    finish(&controller, dry_run).await
}

pub fn login(auth_key: &str) -> Result<(), String> {
    if auth_key.trim().is_empty() {
        return Err("Auth key cannot be empty".to_string());
    }
    let path = save_session_token(auth_key)?;
    Logger::new().log_message(
        LogLevel::Success,
        &format!("Auth key saved to {}", path.display()),
    );
    Ok(())
}

pub fn logout() -> Result<(), String> {
    let logger = Logger::new();
    if clear_session_token()? {
        logger.log_message(LogLevel::Success, "Auth key removed.");
    } else {
        logger.log_message(LogLevel::Info, "No saved auth key to remove.");
    }
    Ok(())
}
