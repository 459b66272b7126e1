//! Client-side filter predicates over decoded entities.
//!
//! Every filter is a plain struct of optional criteria. Unset criteria
//! always pass, and set criteria are AND-combined, so contradictory flags
//! (enabled-only together with disabled-only) simply match nothing.

use crate::band::BandType;
use crate::types::{
    AutoAddRule, ChannelInfo, ChannelRef, ProgramEvent, RecordingEntry, ReservationEntry,
    ServiceType,
};

/// A predicate over one entity type.
pub trait Filter<T> {
    fn matches(&self, item: &T) -> bool;

    /// Keep the matching items, in their original order.
    fn apply(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

/// Case-insensitive containment; an absent or empty needle always passes.
pub fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

fn same_channel(actual: ChannelRef, wanted: Option<ChannelRef>) -> bool {
    wanted.map_or(true, |wanted| actual == wanted)
}

/// Filter for automatic recording rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFilter {
    /// Substring of the search keyword.
    pub and_key: Option<String>,
    /// Rule must list this channel.
    pub channel: Option<ChannelRef>,
    pub enabled_only: bool,
    pub disabled_only: bool,
    pub regex_only: bool,
}

impl RuleFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Filter<AutoAddRule> for RuleFilter {
    fn matches(&self, rule: &AutoAddRule) -> bool {
        if !contains_ignore_case(&rule.search.and_key, self.and_key.as_deref()) {
            return false;
        }
        if let Some(channel) = &self.channel {
            if !rule.search.covers(channel) {
                return false;
            }
        }
        if self.enabled_only && !rule.is_enabled() {
            return false;
        }
        if self.disabled_only && rule.is_enabled() {
            return false;
        }
        if self.regex_only && !rule.is_regex() {
            return false;
        }
        true
    }
}

/// Filter for the service list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelFilter {
    pub tv_only: bool,
    pub radio_only: bool,
    pub data_only: bool,
    /// Substring of the network name.
    pub network: Option<String>,
    /// Substring of the service name.
    pub name: Option<String>,
    pub band: Option<BandType>,
}

impl Filter<ChannelInfo> for ChannelFilter {
    fn matches(&self, ch: &ChannelInfo) -> bool {
        let service_type = ch.service_type();
        if self.tv_only && service_type != ServiceType::Tv {
            return false;
        }
        if self.radio_only && service_type != ServiceType::Radio {
            return false;
        }
        if self.data_only && service_type != ServiceType::Data {
            return false;
        }
        if let Some(band) = self.band {
            if ch.band() != band {
                return false;
            }
        }
        contains_ignore_case(&ch.network_name, self.network.as_deref())
            && contains_ignore_case(&ch.service_name, self.name.as_deref())
    }
}

/// Filter for program guide events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub title: Option<String>,
    pub genre: Option<String>,
}

impl Filter<ProgramEvent> for EventFilter {
    fn matches(&self, event: &ProgramEvent) -> bool {
        contains_ignore_case(&event.event_name, self.title.as_deref())
            && contains_ignore_case(event.genre(), self.genre.as_deref())
    }
}

/// Filter for finished recordings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingFilter {
    pub title: Option<String>,
    pub station: Option<String>,
    pub channel: Option<ChannelRef>,
    pub protected_only: bool,
}

impl Filter<RecordingEntry> for RecordingFilter {
    fn matches(&self, rec: &RecordingEntry) -> bool {
        if self.protected_only && !rec.is_protected() {
            return false;
        }
        same_channel(rec.channel(), self.channel)
            && contains_ignore_case(&rec.title, self.title.as_deref())
            && contains_ignore_case(&rec.station_name, self.station.as_deref())
    }
}

/// Filter for scheduled reservations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    pub title: Option<String>,
    pub station: Option<String>,
    pub channel: Option<ChannelRef>,
}

impl Filter<ReservationEntry> for ReservationFilter {
    fn matches(&self, res: &ReservationEntry) -> bool {
        same_channel(res.channel(), self.channel)
            && contains_ignore_case(&res.title, self.title.as_deref())
            && contains_ignore_case(&res.station_name, self.station.as_deref())
    }
}
