//! Setup validation: can the device be reached, and does it report rooms?

use serde::Serialize;
use veoovibes_core::{Bridge, BridgeConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct CheckReport {
    url: String,
    api_key: bool,
    rooms: usize,
}

pub async fn handle(config: &BridgeConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let rooms = Bridge::validate(config).await?;

    let report = CheckReport {
        url: config.base_url.to_string(),
        api_key: config.api_key.is_some(),
        rooms,
    };
    let out = output::render_single(
        &global.output,
        &report,
        |r| format!("✓ {} reports {} room(s)", r.url, r.rooms),
        |r| r.rooms.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
