use std::thread;
use std::time::Duration;

use tiny_http::Request;
use tracing::debug;

use crate::state::SharedState;
use crate::util::sse::{format_sse_event, format_sse_keepalive, write_sse, SSE_RESPONSE_HEAD};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// `GET /events` — Server-Sent Events stream of dashboard frames.
///
/// Replays every frame produced so far, then polls the shared state:
/// 1. new frames are written as `event: frame` with the frame JSON;
/// 2. an idle poll writes a `: ping` keep-alive;
/// 3. once the run is over and every frame is sent, a `done` or `failed`
///    event is written and the stream closes.
pub fn handle(request: Request, state: SharedState) {
    let mut writer = request.into_writer();
    if !write_sse(&mut writer, SSE_RESPONSE_HEAD) {
        return;
    }

    let mut sent = 0usize;
    loop {
        let (pending, final_event) = {
            let st = match state.lock() {
                Ok(st) => st,
                Err(poisoned) => poisoned.into_inner(),
            };
            let pending: Vec<String> = st.frames[sent..]
                .iter()
                .filter_map(|f| serde_json::to_string(f).ok())
                .collect();
            sent = st.frames.len();
            // Only finish once this poll has drained every frame.
            (pending, st.final_event())
        };

        if pending.is_empty() && final_event.is_none() {
            if !write_sse(&mut writer, format_sse_keepalive()) {
                debug!("event stream client disconnected");
                return;
            }
        }
        for json in &pending {
            if !write_sse(&mut writer, &format_sse_event("frame", json)) {
                debug!("event stream client disconnected");
                return;
            }
        }
        if let Some((name, json)) = final_event {
            let _ = write_sse(&mut writer, &format_sse_event(name, &json));
            return;
        }

        thread::sleep(POLL_INTERVAL);
    }
}
