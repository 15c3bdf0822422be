//! Shared helpers for command handlers.

use veoovibes_core::{Bridge, RoomId, Snapshot};

use crate::error::CliError;

/// Resolve a room given by id or by name.
///
/// An exact id match wins; otherwise names are compared case-insensitively.
pub fn resolve_room(bridge: &Bridge, input: &str) -> Result<RoomId, CliError> {
    let not_found = || CliError::RoomNotFound { room: input.into() };
    let snapshot = bridge.snapshot().ok_or_else(not_found)?;
    find_room(&snapshot, input).ok_or_else(not_found)
}

fn find_room(snapshot: &Snapshot, input: &str) -> Option<RoomId> {
    let input = input.trim();
    let rooms = snapshot.rooms();

    rooms
        .iter()
        .filter_map(|r| r.id.as_ref())
        .find(|id| id.as_str() == input)
        .or_else(|| {
            rooms
                .iter()
                .find(|r| r.id.is_some() && r.name.eq_ignore_ascii_case(input))
                .and_then(|r| r.id.as_ref())
        })
        .cloned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
