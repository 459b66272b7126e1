//! Program guide retrieval, for one channel or a whole channel list.

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use emwui_protocol::{ChannelRef, EventFilter, Filter, ProgramEvent};
use log::{debug, warn};

use super::emit;
use crate::channel_list::load_channel_list;
use crate::client::EmwuiClient;
use crate::context::OutputArgs;
use crate::error::AppError;

/// Where the channels to query come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpgSource {
    Channel(ChannelRef),
    /// Every channel of a channel-list file, one request each.
    ChannelList(PathBuf),
}

pub fn cmd_epg(
    client: &EmwuiClient,
    source: EpgSource,
    filter: EventFilter,
    output: &OutputArgs,
) -> Result<(), AppError> {
    let events = match source {
        EpgSource::Channel(channel) => client.list_program_guide(channel)?.items,
        EpgSource::ChannelList(path) => {
            let channels = load_channel_list(&path)?;
            debug!("Read {} channels from {}", channels.len(), path.display());
            retrieve_all(client, &channels)
        }
    };

    let events = filter.apply(events);
    emit(&events, output, filter != EventFilter::default())
}

/// Query each channel in turn. A failing channel is reported and skipped.
///
/// Progress goes to stderr; stdout is left for the rendered guide.
fn retrieve_all(client: &EmwuiClient, channels: &[ChannelRef]) -> Vec<ProgramEvent> {
    let total = channels.len();
    let mut events = Vec::new();

    eprintln!("Retrieving EPG for {} channels...", total);

    for (i, channel) in channels.iter().enumerate() {
        eprint!("  [{}/{}] Retrieving {}...\r", i + 1, total, channel);
        let _ = std::io::stderr().flush();

        match client.list_program_guide(*channel) {
            Ok(envelope) => events.extend(envelope.items),
            Err(e) => {
                warn!("EPG retrieval failed for {}: {}", channel, e);
                eprintln!();
                eprintln!(
                    "  {} Failed to retrieve EPG for {}: {}",
                    "Warning:".yellow(),
                    channel,
                    e
                );
            }
        }
    }

    eprintln!();
    eprintln!(
        "Retrieved {} programs from {} channels",
        events.len(),
        total
    );
    events
}
