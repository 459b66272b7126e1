use emwui_protocol::{AutoAddRule, RecordingSettings, SearchSettings};
use serde::Serialize;

use super::{to_json, truncate, Render};

#[derive(Serialize)]
struct RuleRow<'a> {
    id: u32,
    enabled: bool,
    regex: bool,
    and_key: &'a str,
    not_key: &'a str,
    channels: Vec<String>,
    channel_count: usize,
    search: &'a SearchSettings,
    rec: &'a RecordingSettings,
}

impl<'a> From<&'a AutoAddRule> for RuleRow<'a> {
    fn from(rule: &'a AutoAddRule) -> Self {
        Self {
            id: rule.id,
            enabled: rule.is_enabled(),
            regex: rule.is_regex(),
            and_key: &rule.search.and_key,
            not_key: &rule.search.not_key,
            channels: rule.channel_ids(),
            channel_count: rule.search.channel_count(),
            search: &rule.search,
            rec: &rule.rec,
        }
    }
}

impl Render for AutoAddRule {
    const NOUN: &'static str = "rules";

    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Enabled",
        "AndKey",
        "NotKey",
        "RegExp",
        "Channels",
        "ChannelCount",
        "Priority",
        "RecMode",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.is_enabled().to_string(),
            self.search.and_key.clone(),
            self.search.not_key.clone(),
            self.is_regex().to_string(),
            self.channel_ids().join(";"),
            self.search.channel_count().to_string(),
            self.rec.priority.to_string(),
            self.rec.rec_mode.to_string(),
        ]
    }

    fn json(items: &[Self]) -> serde_json::Result<String> {
        to_json(&items.iter().map(RuleRow::from).collect::<Vec<_>>())
    }

    fn table(items: &[Self]) -> String {
        let mut out = format!(
            "{:<4}  {:<8}  {:<30}  {:<30}  {}\n",
            "ID", "Enabled", "Keywords", "Exclusions", "Channels"
        );
        for rule in items {
            let exclusions = if rule.search.not_key.is_empty() {
                "-".to_string()
            } else {
                truncate(&rule.search.not_key, 30)
            };
            out.push_str(&format!(
                "{:<4}  {:<8}  {:<30}  {:<30}  {} channels\n",
                rule.id,
                if rule.is_enabled() { "Yes" } else { "No" },
                truncate(&rule.search.and_key, 30),
                exclusions,
                rule.search.channel_count(),
            ));
        }
        out
    }
}
