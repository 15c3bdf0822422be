//! Diagnostics dump. Always structured; `table` falls back to pretty JSON.

use veoovibes_core::Bridge;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(bridge: &Bridge, global: &GlobalOpts) -> Result<(), CliError> {
    let dump = bridge.diagnostics();
    let format = match global.output {
        OutputFormat::Table | OutputFormat::Plain => OutputFormat::Json,
        ref other => other.clone(),
    };
    let out = output::render_single(&format, &dump, |_| String::new(), |_| String::new())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
