use crate::{
    manager::{
        commands::{TerminalController, build_controller, load_with_spinner, save_with_spinner},
        edit::prompt_edit_form,
        view::format_entry_label,
    },
    utils::logger::{LogLevel, Logger},
};
use inquire::InquireError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Move,
    Edit,
    Remove,
    Show,
    Reload,
    Sync,
    Quit,
}

impl Action {
    const ALL: [Action; 7] = [
        Action::Move,
        Action::Edit,
        Action::Remove,
        Action::Show,
        Action::Reload,
        Action::Sync,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Move => "Move an addon",
            Action::Edit => "Edit an addon",
            Action::Remove => "Remove an addon",
            Action::Show => "Show addons",
            Action::Reload => "Reload from Stremio",
            Action::Sync => "Sync to Stremio",
            Action::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// What to do after a prompt was answered or abandoned.
enum Flow {
    Continue,
    Exit,
}

fn handle_prompt_error(e: InquireError) -> Result<Flow, String> {
    match e {
        InquireError::OperationCanceled => Ok(Flow::Continue),
        InquireError::OperationInterrupted => Ok(Flow::Exit),
        other => Err(format!("Prompt failed: {}", other)),
    }
}

pub async fn prompt_manage_addons() -> Result<(), String> {
    println!();
    println!("⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯");
    println!("Stremio Addon Manager");
    println!("⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯⎯");
    println!();

    let controller = build_controller(false)?;
    load_with_spinner(&controller).await?;

    loop {
        let action = match inquire::Select::new("What would you like to do?", Action::ALL.to_vec())
            .prompt()
        {
            Ok(action) => action,
            Err(InquireError::OperationCanceled) => Action::Quit,
            Err(e) => match handle_prompt_error(e)? {
                Flow::Continue => continue,
                Flow::Exit => return Ok(()),
            },
        };

        let flow = match action {
            Action::Move => prompt_move(&controller),
            Action::Edit => prompt_edit(&controller),
            Action::Remove => prompt_remove(&controller),
            Action::Show => {
                controller.render();
                Ok(Flow::Continue)
            }
            Action::Reload => reload(&controller).await,
            Action::Sync => sync(&controller).await,
            Action::Quit => confirm_quit(&controller),
        };

        if let Flow::Exit = flow? {
            return Ok(());
        }
    }
}

/// Picks an addon from the list as it is right now and returns its index.
fn select_addon(controller: &TerminalController, message: &str) -> Result<Option<usize>, InquireError> {
    let labels: Vec<String> = controller
        .snapshot()
        .iter()
        .enumerate()
        .map(|(index, entry)| format_entry_label(index, entry))
        .collect();

    if labels.is_empty() {
        Logger::new().log_message(LogLevel::Info, "Your addon collection is empty.");
        return Ok(None);
    }

    let choice = inquire::Select::new(message, labels).raw_prompt()?;
    Ok(Some(choice.index))
}

fn prompt_move(controller: &TerminalController) -> Result<Flow, String> {
    let from = match select_addon(controller, "Select an addon to move:") {
        Ok(Some(index)) => index,
        Ok(None) => return Ok(Flow::Continue),
        Err(e) => return handle_prompt_error(e),
    };

    let positions: Vec<String> = (0..controller.len())
        .map(|position| format!("Position {}", position))
        .collect();
    let to = match inquire::Select::new("Move it to:", positions)
        .with_starting_cursor(from)
        .raw_prompt()
    {
        Ok(choice) => choice.index,
        Err(e) => return handle_prompt_error(e),
    };

    // Rejections are already reported by the view; the session goes on.
    let _ = controller.reorder(from, to);
    Ok(Flow::Continue)
}

fn prompt_edit(controller: &TerminalController) -> Result<Flow, String> {
    let index = match select_addon(controller, "Select an addon to edit:") {
        Ok(Some(index)) => index,
        Ok(None) => return Ok(Flow::Continue),
        Err(e) => return handle_prompt_error(e),
    };
    let Some(entry) = controller.snapshot().into_iter().nth(index) else {
        return Ok(Flow::Continue);
    };

    let form = match prompt_edit_form(&entry) {
        Ok(form) => form,
        Err(e) => return handle_prompt_error(e),
    };
    if form.is_empty() {
        Logger::new().log_message(LogLevel::Info, "Nothing changed.");
        return Ok(Flow::Continue);
    }

    if !form.fields.is_empty() && controller.edit_manifest_at(index, form.fields).is_err() {
        return Ok(Flow::Continue);
    }
    for (catalog_index, name) in form.catalog_names {
        if controller
            .edit_catalog_name_at(index, catalog_index, name)
            .is_err()
        {
            break;
        }
    }
    Ok(Flow::Continue)
}

fn prompt_remove(controller: &TerminalController) -> Result<Flow, String> {
    let index = match select_addon(controller, "Select an addon to remove:") {
        Ok(Some(index)) => index,
        Ok(None) => return Ok(Flow::Continue),
        Err(e) => return handle_prompt_error(e),
    };
    let Some(entry) = controller.snapshot().into_iter().nth(index) else {
        return Ok(Flow::Continue);
    };

    let confirmed = match inquire::Confirm::new(&format!("Remove '{}'?", entry.name()))
        .with_default(false)
        .prompt()
    {
        Ok(confirmed) => confirmed,
        Err(e) => return handle_prompt_error(e),
    };
    if confirmed {
        let _ = controller.remove_at(index);
    }
    Ok(Flow::Continue)
}

async fn reload(controller: &TerminalController) -> Result<Flow, String> {
    if controller.has_unsaved_changes() {
        let discard = match inquire::Confirm::new("Discard your unsynced changes and reload?")
            .with_default(false)
            .prompt()
        {
            Ok(discard) => discard,
            Err(e) => return handle_prompt_error(e),
        };
        if !discard {
            return Ok(Flow::Continue);
        }
    }
    // A failed reload keeps the local list and has already been reported.
    let _ = load_with_spinner(controller).await;
    Ok(Flow::Continue)
}

async fn sync(controller: &TerminalController) -> Result<Flow, String> {
    if save_with_spinner(controller).await.is_ok() {
        // Show what the server now holds.
        let _ = load_with_spinner(controller).await;
    }
    Ok(Flow::Continue)
}

fn confirm_quit(controller: &TerminalController) -> Result<Flow, String> {
    if !controller.has_unsaved_changes() {
        return Ok(Flow::Exit);
    }
    match inquire::Confirm::new("You have unsynced changes. Quit anyway?")
        .with_default(false)
        .prompt()
    {
        Ok(true) => Ok(Flow::Exit),
        Ok(false) => Ok(Flow::Continue),
        Err(e) => handle_prompt_error(e),
    }
}
