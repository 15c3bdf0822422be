//! Room command handlers.

use tabled::Tabled;
use veoovibes_core::{Bridge, PlayerView, RoomPlayer, RoomStatus};

use crate::cli::{GlobalOpts, OutputFormat, RoomsArgs, RoomsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Repeat")]
    repeat: String,
}

impl RoomRow {
    fn new(view: &PlayerView, color: bool) -> Self {
        Self {
            id: view.room_id.to_string(),
            name: view.name.clone(),
            state: output::state_label(view.state, color),
            volume: view
                .volume_level
                .map(|v| format!("{:.0}%", v * 100.0))
                .unwrap_or_default(),
            title: view.media_title.clone().unwrap_or_default(),
            repeat: match view.repeat {
                Some(true) => "on".into(),
                Some(false) => "off".into(),
                None => String::new(),
            },
        }
    }
}

/// Render player views as a room list.
pub fn render_views(views: &[PlayerView], format: &OutputFormat, color: bool) -> Result<String, CliError> {
    output::render_list(format, views, |v| RoomRow::new(v, color), |v| v.room_id.to_string())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(bridge: &Bridge, args: RoomsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RoomsCommand::List => {
            let views: Vec<PlayerView> = bridge.players().iter().map(RoomPlayer::view).collect();
            let out = render_views(&views, &global.output, output::should_color(&global.color))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Status { room } => {
            let id = util::resolve_room(bridge, &room)?;
            let raw = bridge.client().get_room_status(id.as_str()).await?;
            let status = RoomStatus::from_value(raw);
            let out = output::render_single(
                &global.output,
                status.fields(),
                output::render_fields,
                |_| {
                    if status.is_playing() {
                        "playing".into()
                    } else {
                        "paused".into()
                    }
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
