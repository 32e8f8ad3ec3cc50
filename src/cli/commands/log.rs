use colored::Colorize;

use crate::cli::{context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::audit_entry::{AuditAction, AuditEntry};

/// Execute the `shopkeeper log` command.
///
/// Displays the newest `last` audit entries, optionally filtered by actor
/// (name or id) and shop name.
pub fn execute(last: usize, actor: Option<&str>, store: Option<&str>) -> Result<()> {
    let config = AppConfig::load(context::data_dir())?;
    let service = context::file_service(&config);

    let entries = service.recent_logs(None)?;
    let display: Vec<&AuditEntry> = entries
        .iter()
        .filter(|e| matches_actor(e, actor) && matches_store(e, store))
        .take(last)
        .collect();

    if display.is_empty() {
        output::header("shopkeeper log");
        output::warning("No audit entries found");
        if actor.is_some() || store.is_some() {
            println!("  Try removing filters to see all entries.");
        }
        return Ok(());
    }

    output::header(&format!("shopkeeper log ({} entries)", display.len()));
    println!();

    for entry in &display {
        print_entry(entry);
    }

    Ok(())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_actor(entry: &AuditEntry, actor: Option<&str>) -> bool {
    actor.is_none_or(|a| {
        contains_ignore_case(&entry.actor_name, a) || contains_ignore_case(&entry.actor_id, a)
    })
}

fn matches_store(entry: &AuditEntry, store: Option<&str>) -> bool {
    store.is_none_or(|s| contains_ignore_case(&entry.store, s))
}

/// Print a single audit entry as a formatted row.
fn print_entry(entry: &AuditEntry) {
    let date = entry.time.format("%Y-%m-%d %H:%M:%S");

    println!(
        "  {} {} {} {} {} {}",
        date.to_string().dimmed(),
        "│".dimmed(),
        format_action(&entry.action),
        entry.store,
        format!("{} ({})", entry.actor_name, entry.actor_id).dimmed(),
        entry.details,
    );
}

fn format_action(action: &AuditAction) -> String {
    match action {
        AuditAction::ShopCreated => action.label().green().to_string(),
        AuditAction::MentionUsed => action.label().yellow().to_string(),
        AuditAction::MentionsRenewed => action.label().blue().to_string(),
        AuditAction::ShopUpdated => action.label().cyan().to_string(),
        AuditAction::ShopDeleted => action.label().red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn entry(store: &str, actor_name: &str, actor_id: &str) -> AuditEntry {
        AuditEntry {
            time: Utc::now(),
            action: AuditAction::MentionUsed,
            store: store.into(),
            actor_name: actor_name.into(),
            actor_id: actor_id.into(),
            details: String::new(),
        }
    }

    #[test]
    fn actor_filter_matches_name_or_id() {
        let e = entry("Alpha", "Sara", "1234");
        assert!(matches_actor(&e, None));
        assert!(matches_actor(&e, Some("sar")));
        assert!(matches_actor(&e, Some("23")));
        assert!(!matches_actor(&e, Some("omar")));
    }

    #[test]
    fn store_filter_is_case_insensitive() {
        let e = entry("Alpha Store", "x", "1");
        assert!(matches_store(&e, Some("alpha")));
        assert!(!matches_store(&e, Some("beta")));
    }
}
