//! Top-level error type for command handlers, and the hints shown with it.

use std::path::PathBuf;

use emwui_protocol::ValidationError;
use thiserror::Error;

use crate::channel_list::ChannelListError;
use crate::client::{ClientError, ErrorKind, TransportKind};
use crate::config::{ConfigError, Settings, ENDPOINT_ENV};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read channel list: {0}")]
    ChannelList(#[from] ChannelListError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("failed to format output: {0}")]
    Render(#[from] serde_json::Error),

    #[error("failed to write output to file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing or contradictory command-line arguments.
    #[error("{0}")]
    Usage(String),
}

impl AppError {
    /// Troubleshooting text for this error, if there is any worth showing.
    ///
    /// `settings` is `None` when the failure happened before they were
    /// resolved.
    pub fn hint(&self, settings: Option<&Settings>) -> Option<String> {
        match self {
            AppError::Config(ConfigError::MissingEndpoint) => Some(endpoint_hint()),
            AppError::Config(ConfigError::InvalidEndpoint { .. }) => Some(endpoint_hint()),
            AppError::ChannelList(ChannelListError::InvalidLine { .. }) => Some(format_hint()),
            AppError::Client(ClientError::Validation(ValidationError::InvalidChannelFormat {
                ..
            })) => Some(format_hint()),
            AppError::Client(err) => client_hint(err.kind(), settings),
            _ => None,
        }
    }
}

fn endpoint_hint() -> String {
    format!(
        "Please set the endpoint using one of:\n  \
         1. --endpoint flag: epgtimer list --endpoint http://192.168.1.10:5510\n  \
         2. {} environment variable: export {}=http://192.168.1.10:5510\n  \
         3. [server] endpoint = \"http://192.168.1.10:5510\" in epgtimer.toml",
        ENDPOINT_ENV, ENDPOINT_ENV
    )
}

fn format_hint() -> String {
    "Expected format: ONID-TSID-SID (e.g., \"32736-32736-1024\")".to_string()
}

fn client_hint(kind: ErrorKind, settings: Option<&Settings>) -> Option<String> {
    let endpoint = settings.map_or("(not set)", |s| s.endpoint.as_str());
    match kind {
        ErrorKind::Transport(TransportKind::Connect) | ErrorKind::Transport(TransportKind::Other) => {
            Some(format!(
                "Troubleshooting:\n  \
                 1. Check that EpgTimer is running\n  \
                 2. Verify the endpoint is correct (current: {})\n  \
                 3. Confirm network connectivity to the EMWUI server\n  \
                 4. Ensure the EMWUI web interface is enabled",
                endpoint
            ))
        }
        ErrorKind::Transport(TransportKind::Timeout) => {
            let timeout = settings.map_or(0, |s| s.timeout.as_secs());
            Some(format!(
                "EMWUI server did not respond within {}s (current endpoint: {})",
                timeout, endpoint
            ))
        }
        ErrorKind::UnexpectedHtml | ErrorKind::Status => Some(
            "Possible causes:\n  \
             1. Incorrect endpoint URL\n  \
             2. API path has changed\n  \
             3. EMWUI version incompatibility"
                .to_string(),
        ),
        ErrorKind::Validation | ErrorKind::Token | ErrorKind::Decode | ErrorKind::Application => {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn settings() -> Settings {
        Settings {
            endpoint: "http://192.168.1.10:5510".to_string(),
            timeout: Duration::from_secs(10),
            channel_list: PathBuf::from("channels.txt"),
        }
    }

    #[test]
    fn test_missing_endpoint_hint() {
        let hint = AppError::from(ConfigError::MissingEndpoint).hint(None).unwrap();
        assert!(hint.contains("--endpoint"));
        assert!(hint.contains("EMWUI_ENDPOINT"));
        assert!(hint.contains("[server] endpoint"));
    }

    #[test]
    fn test_hint_follows_kind_not_text() {
        // The message mentions HTML, but the kind is Application.
        let err = AppError::from(ClientError::Application {
            message: "HTML response".to_string(),
        });
        assert_eq!(err.hint(Some(&settings())), None);

        let err = AppError::from(ClientError::UnexpectedHtml {
            body: "<html/>".to_string(),
        });
        assert!(err.hint(Some(&settings())).unwrap().contains("Incorrect endpoint URL"));

        let err = AppError::from(ClientError::Status {
            code: 404,
            body: "Not Found".to_string(),
        });
        assert!(err.hint(Some(&settings())).unwrap().contains("API path has changed"));
    }

    #[test]
    fn test_validation_hint() {
        let err = AppError::from(ClientError::from(ValidationError::InvalidChannelFormat {
            index: 0,
            raw: "1-2".to_string(),
        }));
        assert!(err.hint(None).unwrap().contains("ONID-TSID-SID"));

        let err = AppError::from(ClientError::from(ValidationError::InvalidRuleId(0)));
        assert_eq!(err.hint(None), None);
    }
}
