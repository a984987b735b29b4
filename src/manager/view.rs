use crate::{
    sync::controller::CollectionView,
    types::addon::AddonEntry,
    utils::logger::{LogLevel, Logger},
};

/// Prints the collection through the [`Logger`] after every change.
#[derive(Debug, Clone, Default)]
pub struct TerminalView {
    logger: Logger,
    details: bool,
}

impl TerminalView {
    pub fn new(details: bool) -> Self {
        TerminalView {
            logger: Logger::new(),
            details,
        }
    }
}

impl CollectionView for TerminalView {
    fn render(&self, collection: &[AddonEntry]) {
        if collection.is_empty() {
            self.logger
                .log_message(LogLevel::Info, "Your addon collection is empty.");
            return;
        }

        self.logger.log_message(
            LogLevel::Info,
            &format!("{} addon(s), in activation order:", collection.len()),
        );
        for (index, entry) in collection.iter().enumerate() {
            let label = format_entry_label(index, entry);
            if self.details {
                let trace = entry_details(entry);
                self.logger.log_message_with_trace(
                    LogLevel::Info,
                    &label,
                    trace.iter().map(|s| s.as_str()).collect(),
                );
            } else {
                println!("  {}", label);
            }
        }
    }

    fn notify_error(&self, message: &str) {
        self.logger.log_message(LogLevel::Error, message);
    }

    fn notify_success(&self) {
        self.logger
            .log_message(LogLevel::Success, "Addon collection synced to Stremio.");
    }
}

/// `[3] Torrentio` / `[0] Cinemeta (protected)`
pub fn format_entry_label(index: usize, entry: &AddonEntry) -> String {
    if entry.is_protected() {
        format!("[{}] {} (protected)", index, entry.name())
    } else {
        format!("[{}] {}", index, entry.name())
    }
}

fn entry_details(entry: &AddonEntry) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(id) = entry.manifest_id() {
        lines.push(format!("id          : {}", id));
    }
    if let Some(url) = entry.transport_url() {
        lines.push(format!("transport   : {}", url));
    }
    if let Some(description) = entry.description() {
        if !description.trim().is_empty() {
            lines.push(format!("description : {}", description));
        }
    }
    for (i, catalog) in entry.catalogs().iter().enumerate() {
        lines.push(format!("catalog [{}] : {}", i, catalog.display_name()));
    }
    lines
}
