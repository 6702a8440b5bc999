use std::io::Cursor;
use tiny_http::Response;

use crate::routes::{json_response, not_found};
use crate::state::SharedState;

/// `GET /frame` — the most recent frame as JSON, 404 before the first epoch.
pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let latest = match state.lock() {
        Ok(st) => st.frames.last().cloned(),
        Err(poisoned) => poisoned.into_inner().frames.last().cloned(),
    };
    match latest.map(|f| serde_json::to_string(&f)) {
        Some(Ok(json)) => json_response(json),
        _ => not_found(),
    }
}
