use emwui_protocol::{Filter, RecordingFilter, ReservationFilter};
use log::debug;

use super::emit;
use crate::client::EmwuiClient;
use crate::context::OutputArgs;
use crate::error::AppError;

/// Lists the first page of finished recordings.
pub fn cmd_recordings(
    client: &EmwuiClient,
    filter: RecordingFilter,
    output: &OutputArgs,
) -> Result<(), AppError> {
    let envelope = client.list_recordings()?;
    if envelope.total > envelope.count {
        debug!(
            "Showing {} of {} recordings (first page only)",
            envelope.count, envelope.total
        );
    }

    let recordings = filter.apply(envelope.items);
    emit(&recordings, output, filter != RecordingFilter::default())
}

pub fn cmd_reservations(
    client: &EmwuiClient,
    filter: ReservationFilter,
    output: &OutputArgs,
) -> Result<(), AppError> {
    let envelope = client.list_reservations()?;
    debug!("Backend reports {} reservations", envelope.total);

    let reservations = filter.apply(envelope.items);
    emit(&reservations, output, filter != ReservationFilter::default())
}
