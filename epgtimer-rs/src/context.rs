use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use emwui_protocol::{BandType, ChannelRef};

#[derive(Debug, Parser)]
#[clap(name = "epgtimer")]
#[clap(about = "Command-line client for EpgTimer's EMWUI web interface.", long_about = None)]
#[clap(author)]
#[clap(version)]
pub struct Cli {
    #[clap(flatten)]
    pub global: GlobalArgs,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// EMWUI server endpoint, e.g. `http://192.168.1.10:5510`.{n}
    /// Overrides `[server] endpoint` in the config file.
    #[clap(short, long, global = true, env = "EMWUI_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Configuration file path.{n}
    /// Defaults to `epgtimer.toml` in the working directory, if present.
    #[clap(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// HTTP timeout in seconds (default: 10).
    #[clap(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Output format for list commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
}

/// Rendering options shared by list commands.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format.
    #[clap(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout.
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a new automatic recording rule.{n}
    /// Programs whose title matches the keywords are recorded on the
    /// given channels.{n}
    /// Channel format: ONID-TSID-SID (e.g., "32736-32736-1024").
    #[clap(name = "add")]
    Add {
        /// Search keywords (required).
        #[clap(long = "andKey", value_name = "KEYWORDS")]
        and_key: String,

        /// Exclusion keywords.
        #[clap(long = "notKey", value_name = "KEYWORDS", default_value = "")]
        not_key: String,

        /// Channels in ONID-TSID-SID format, comma-separated.
        #[clap(long = "serviceList", value_name = "CHANNELS", value_delimiter = ',')]
        service_list: Vec<String>,

        /// File with one ONID-TSID-SID per line.{n}
        /// Blank lines and lines starting with `#` are ignored.
        #[clap(long = "serviceListFile", value_name = "PATH")]
        service_list_file: Option<PathBuf>,
    },

    /// Delete an automatic recording rule.
    #[clap(name = "delete")]
    Delete {
        /// Rule ID.
        #[clap(value_name = "ID", allow_negative_numbers = true)]
        id: Option<i64>,

        /// Rule ID (alternative to the positional form).
        #[clap(long = "id", value_name = "ID", allow_negative_numbers = true, conflicts_with = "id")]
        id_flag: Option<i64>,
    },

    /// List automatic recording rules.
    #[clap(name = "list")]
    List {
        /// Filter by search keyword (substring, case-insensitive).
        #[clap(long = "andKey", value_name = "KEYWORD")]
        and_key: Option<String>,

        /// Only rules that include this channel.
        #[clap(long, value_name = "ONID-TSID-SID")]
        channel: Option<ChannelRef>,

        /// Show only enabled rules.
        #[clap(long)]
        enabled: bool,

        /// Show only disabled rules.
        #[clap(long)]
        disabled: bool,

        /// Show only regex rules.
        #[clap(long)]
        regex: bool,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// List available channels.{n}
    /// Filters are combined with AND.
    #[clap(name = "channels")]
    Channels {
        /// Only TV services.
        #[clap(long)]
        tv: bool,

        /// Only radio services.
        #[clap(long)]
        radio: bool,

        /// Only data services.
        #[clap(long)]
        data: bool,

        /// Filter by network name (substring, case-insensitive).
        #[clap(long, value_name = "NAME")]
        network: Option<String>,

        /// Filter by channel name (substring, case-insensitive).
        #[clap(long, value_name = "NAME")]
        name: Option<String>,

        /// Filter by broadcast band.{n}
        /// terrestrial, bs, cs, 4k, sky, catv, other
        #[clap(long, value_name = "BAND")]
        band: Option<BandType>,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// Show the program guide for one channel or a channel list.
    #[clap(name = "epg")]
    Epg {
        /// Channel in ONID-TSID-SID format.
        #[clap(
            long,
            value_name = "ONID-TSID-SID",
            conflicts_with = "all_channels",
            required_unless_present = "all_channels"
        )]
        channel: Option<ChannelRef>,

        /// Retrieve every channel of the channel list.
        #[clap(long)]
        all_channels: bool,

        /// Channel list used with `--all-channels`.{n}
        /// Defaults to `[epg] channel_list`, then serviceList_without_local.txt.
        #[clap(long, value_name = "PATH")]
        channel_list: Option<PathBuf>,

        /// Filter by program title (substring, case-insensitive).
        #[clap(long, value_name = "TITLE")]
        title: Option<String>,

        /// Filter by genre (substring, case-insensitive).
        #[clap(long, value_name = "GENRE")]
        genre: Option<String>,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// List finished recordings (first page only).
    #[clap(name = "recordings")]
    Recordings {
        /// Filter by title (substring, case-insensitive).
        #[clap(long, value_name = "TITLE")]
        title: Option<String>,

        /// Filter by station name (substring, case-insensitive).
        #[clap(long, value_name = "STATION")]
        station: Option<String>,

        /// Only recordings from this channel.
        #[clap(long, value_name = "ONID-TSID-SID")]
        channel: Option<ChannelRef>,

        /// Show only protected recordings.
        #[clap(long)]
        protected: bool,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// List scheduled recordings.
    #[clap(name = "reservations")]
    Reservations {
        /// Filter by title (substring, case-insensitive).
        #[clap(long, value_name = "TITLE")]
        title: Option<String>,

        /// Filter by station name (substring, case-insensitive).
        #[clap(long, value_name = "STATION")]
        station: Option<String>,

        /// Only reservations on this channel.
        #[clap(long, value_name = "ONID-TSID-SID")]
        channel: Option<ChannelRef>,

        #[clap(flatten)]
        output: OutputArgs,
    },
}
