//! Source list handler. Parses locally, never contacts the device.

use tabled::Tabled;
use veoovibes_core::SourceEntry;
use veoovibes_core::source::source_list;

use crate::cli::{GlobalOpts, OutputFormat, SourcesArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SourceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Group")]
    group: i64,
    #[tabled(rename = "Prog")]
    prog: i64,
}

impl From<&SourceEntry> for SourceRow {
    fn from(s: &SourceEntry) -> Self {
        Self {
            name: s.name.clone(),
            group: s.group,
            prog: s.prog,
        }
    }
}

pub fn handle(args: &SourcesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let text = match args.from_file {
        Some(ref path) => Some(std::fs::read_to_string(path)?),
        None => profile_source_map(global)?,
    };

    let sources = source_list(text.as_deref());
    if sources.is_empty() && matches!(global.output, OutputFormat::Table) {
        if !global.quiet {
            eprintln!("No sources configured.");
        }
        return Ok(());
    }

    let out = output::render_list(
        &global.output,
        sources.as_slice(),
        |s| SourceRow::from(s),
        |s| s.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// The active profile's source map, if there is a profile.
fn profile_source_map(global: &GlobalOpts) -> Result<Option<String>, CliError> {
    let cfg = config::load_config()?;
    let name = config::active_profile_name(global, &cfg);
    let Some(profile) = cfg.profiles.get(&name) else {
        return Ok(None);
    };
    Ok(veoovibes_config::resolve_source_map(profile)?)
}
