//! Command handlers, one module per group of subcommands.
//!
//! Every handler takes the resolved [`Settings`] (through the client it
//! builds) and returns `Result<(), AppError>`; printing the error and
//! choosing the exit status is left to `main`.

mod channels;
mod epg;
mod recordings;
mod rules;

use emwui_protocol::{ChannelFilter, EventFilter, RecordingFilter, ReservationFilter, RuleFilter};
use log::debug;

use crate::client::EmwuiClient;
use crate::config::Settings;
use crate::context::{Commands, OutputArgs};
use crate::error::AppError;
use crate::output::{render, Render};

pub use channels::cmd_channels;
pub use epg::{cmd_epg, EpgSource};
pub use recordings::{cmd_recordings, cmd_reservations};
pub use rules::{cmd_add, cmd_delete, cmd_list};

/// Run one subcommand against the configured backend.
pub fn dispatch(command: &Commands, settings: &Settings) -> Result<(), AppError> {
    let client = EmwuiClient::new(&settings.endpoint, settings.timeout)?;
    debug!("Using EMWUI endpoint {}", client.base_url());

    match command {
        Commands::Add {
            and_key,
            not_key,
            service_list,
            service_list_file,
        } => cmd_add(
            &client,
            and_key,
            not_key,
            service_list,
            service_list_file.as_deref(),
        ),
        Commands::Delete { id, id_flag } => cmd_delete(&client, id.or(*id_flag)),
        Commands::List {
            and_key,
            channel,
            enabled,
            disabled,
            regex,
            output,
        } => cmd_list(
            &client,
            RuleFilter {
                and_key: and_key.clone(),
                channel: *channel,
                enabled_only: *enabled,
                disabled_only: *disabled,
                regex_only: *regex,
            },
            output,
        ),
        Commands::Channels {
            tv,
            radio,
            data,
            network,
            name,
            band,
            output,
        } => cmd_channels(
            &client,
            ChannelFilter {
                tv_only: *tv,
                radio_only: *radio,
                data_only: *data,
                network: network.clone(),
                name: name.clone(),
                band: *band,
            },
            output,
        ),
        Commands::Epg {
            channel,
            all_channels,
            channel_list,
            title,
            genre,
            output,
        } => {
            let source = match channel {
                Some(channel) if !*all_channels => EpgSource::Channel(*channel),
                _ => EpgSource::ChannelList(
                    channel_list
                        .clone()
                        .unwrap_or_else(|| settings.channel_list.clone()),
                ),
            };
            cmd_epg(
                &client,
                source,
                EventFilter {
                    title: title.clone(),
                    genre: genre.clone(),
                },
                output,
            )
        }
        Commands::Recordings {
            title,
            station,
            channel,
            protected,
            output,
        } => cmd_recordings(
            &client,
            RecordingFilter {
                title: title.clone(),
                station: station.clone(),
                channel: *channel,
                protected_only: *protected,
            },
            output,
        ),
        Commands::Reservations {
            title,
            station,
            channel,
            output,
        } => cmd_reservations(
            &client,
            ReservationFilter {
                title: title.clone(),
                station: station.clone(),
                channel: *channel,
            },
            output,
        ),
    }
}

/// Render `items` to stdout or to the `--output` file.
///
/// An empty result prints a notice instead of an empty table, and no file
/// is written. `filtered` selects the wording of that notice.
pub fn emit<T: Render>(items: &[T], output: &OutputArgs, filtered: bool) -> Result<(), AppError> {
    if items.is_empty() {
        if filtered {
            println!("No {} match the specified filters.", T::NOUN);
        } else {
            println!("No {} found.", T::NOUN);
        }
        return Ok(());
    }

    let rendered = render(items, output.format)?;

    match &output.output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|source| AppError::Write {
                path: path.clone(),
                source,
            })?;
            println!(
                "Successfully exported {} {} to {}",
                items.len(),
                T::NOUN,
                path.display()
            );
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
