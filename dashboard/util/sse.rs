use std::io::Write;

// ---------------------------------------------------------------------------
// SSE framing helpers
// ---------------------------------------------------------------------------

/// Raw HTTP response head for an SSE stream; the body is written frame by
/// frame through the request's writer.
pub const SSE_RESPONSE_HEAD: &str = "HTTP/1.1 200 OK\r\n\
                                     Content-Type: text/event-stream\r\n\
                                     Cache-Control: no-cache\r\n\
                                     Connection: keep-alive\r\n\
                                     X-Accel-Buffering: no\r\n\
                                     \r\n";

/// Formats a named SSE event with a JSON data payload.
///
/// Output format (per SSE spec):
/// ```text
/// event: <name>\n
/// data: <json>\n
/// \n
/// ```
pub fn format_sse_event(event_name: &str, json_data: &str) -> String {
    format!("event: {}\ndata: {}\n\n", event_name, json_data)
}

/// SSE comment ignored by `EventSource`; keeps idle connections open.
pub fn format_sse_keepalive() -> &'static str {
    ": ping\n\n"
}

/// Writes one SSE message and flushes. Returns `false` once the client is gone.
pub fn write_sse<W: Write>(writer: &mut W, msg: &str) -> bool {
    writer.write_all(msg.as_bytes()).is_ok() && writer.flush().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_framing() {
        assert_eq!(format_sse_event("frame", "{}"), "event: frame\ndata: {}\n\n");
    }

    #[test]
    fn write_reports_success() {
        let mut buf: Vec<u8> = Vec::new();
        assert!(write_sse(&mut buf, format_sse_keepalive()));
        assert_eq!(buf, b": ping\n\n");
    }
}
