use emwui_protocol::{ChannelFilter, Filter};
use log::debug;

use super::emit;
use crate::client::EmwuiClient;
use crate::context::OutputArgs;
use crate::error::AppError;

pub fn cmd_channels(
    client: &EmwuiClient,
    filter: ChannelFilter,
    output: &OutputArgs,
) -> Result<(), AppError> {
    let envelope = client.list_channels()?;
    debug!("Backend reports {} channels", envelope.total);

    let channels = filter.apply(envelope.items);
    emit(&channels, output, filter != ChannelFilter::default())
}
