//! Plain-text channel lists (`ONID-TSID-SID` per line).
//!
//! ```text
//! # Tokyo channels
//! 32736-32736-1024
//! 32736-32736-1025
//! ```

use std::path::{Path, PathBuf};

use emwui_protocol::{ChannelRef, ChannelRefError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelListError {
    #[error("failed to read channel list '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `line` is 1-based.
    #[error("invalid format at line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: ChannelRefError,
    },

    #[error("file contains no valid channels")]
    Empty,
}

/// Parse channel list contents. Blank lines and `#` comments are skipped.
pub fn parse_channel_list(contents: &str) -> Result<Vec<ChannelRef>, ChannelListError> {
    let mut channels = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let channel = line
            .parse::<ChannelRef>()
            .map_err(|source| ChannelListError::InvalidLine {
                line: index + 1,
                source,
            })?;
        channels.push(channel);
    }

    if channels.is_empty() {
        return Err(ChannelListError::Empty);
    }
    Ok(channels)
}

pub fn load_channel_list(path: &Path) -> Result<Vec<ChannelRef>, ChannelListError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ChannelListError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_channel_list(&contents)
}
