//! Handlers for `add`, `delete` and `list`.

use std::path::Path;

use colored::Colorize;
use emwui_protocol::{AutoAddRuleRequest, ChannelRef, Filter, RuleFilter};
use log::{debug, info};

use super::emit;
use crate::channel_list::load_channel_list;
use crate::client::EmwuiClient;
use crate::context::OutputArgs;
use crate::error::AppError;

/// Channel ids listed after a successful `add` before the rest is summarized.
const SHOWN_CHANNELS: usize = 10;

pub fn cmd_add(
    client: &EmwuiClient,
    and_key: &str,
    not_key: &str,
    service_list: &[String],
    service_list_file: Option<&Path>,
) -> Result<(), AppError> {
    let mut channels = service_list.to_vec();
    if let Some(path) = service_list_file {
        let from_file = load_channel_list(path)?;
        debug!("Read {} channels from {}", from_file.len(), path.display());
        channels.extend(from_file.iter().map(ChannelRef::to_string));
    }

    let request = AutoAddRuleRequest::new(and_key, not_key, channels.clone());
    let response = client.create_rule(request)?;
    info!("Rule created: {}", response.message());

    println!(
        "{} Automatic recording rule created successfully",
        "✓".green()
    );
    println!();
    println!("Search keywords: {}", and_key);
    if !not_key.is_empty() {
        println!("Exclusion keywords: {}", not_key);
    }
    println!("Channels: {} channels", channels.len());
    println!("  {}", channel_summary(&channels));
    Ok(())
}

pub fn cmd_delete(client: &EmwuiClient, id: Option<i64>) -> Result<(), AppError> {
    let id = id.ok_or_else(|| {
        AppError::Usage(
            "rule ID is required\n\nUsage:\n  epgtimer delete <ID>\n  epgtimer delete --id <ID>\n\n\
             To find rule IDs, run:\n  epgtimer list"
                .to_string(),
        )
    })?;

    let response = client.delete_rule(id)?;
    info!("Rule {} deleted: {}", id, response.message());

    println!(
        "{} Automatic recording rule (ID: {}) deleted successfully",
        "✓".green(),
        id
    );
    Ok(())
}

pub fn cmd_list(
    client: &EmwuiClient,
    filter: RuleFilter,
    output: &OutputArgs,
) -> Result<(), AppError> {
    let envelope = client.list_rules()?;
    debug!("Backend reports {} rules", envelope.total);

    let rules = filter.apply(envelope.items);
    emit(&rules, output, !filter.is_empty())
}

/// `a, b, c` or `a, ..., j, ... (K more)`.
fn channel_summary(channels: &[String]) -> String {
    if channels.len() <= SHOWN_CHANNELS {
        return channels.join(", ");
    }
    format!(
        "{}, ... ({} more)",
        channels[..SHOWN_CHANNELS].join(", "),
        channels.len() - SHOWN_CHANNELS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_summary() {
        let few: Vec<String> = (1..=3).map(|sid| format!("4-16625-{}", sid)).collect();
        assert_eq!(channel_summary(&few), "4-16625-1, 4-16625-2, 4-16625-3");

        let many: Vec<String> = (1..=13).map(|sid| format!("4-16625-{}", sid)).collect();
        let summary = channel_summary(&many);
        assert!(summary.starts_with("4-16625-1, 4-16625-2"));
        assert!(summary.contains("4-16625-10, ... (3 more)"));
        assert!(!summary.contains("4-16625-11"));
    }

    #[test]
    fn test_delete_requires_id() {
        let client = EmwuiClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(1)).unwrap();
        let err = cmd_delete(&client, None).unwrap_err();
        assert!(matches!(err, AppError::Usage(_)));
        assert!(err.to_string().contains("--id"));
    }
}
