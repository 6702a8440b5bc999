use std::io::Cursor;
use tiny_http::Response;

use irisnet::viz::escape;

use crate::render::render_page;
use crate::state::{RunStatus, SharedState};

/// `GET /` — the dashboard page. The latest frame (if any) is inlined so a
/// reload shows the current state before the event stream reconnects.
pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let (total_epochs, latest, note) = {
        let st = match state.lock() {
            Ok(st) => st,
            Err(poisoned) => poisoned.into_inner(),
        };
        (st.total_epochs, st.frames.last().cloned(), status_note(&st.status))
    };

    let (epoch, accuracy, loss, network_svg, loss_svg, accuracy_svg) = match latest {
        Some(f) => (
            f.status.epoch,
            f.status.accuracy,
            f.status.loss,
            f.network_svg,
            f.loss_svg,
            f.accuracy_svg,
        ),
        None => Default::default(),
    };

    crate::routes::html_response(render_page(|tmpl| {
        tmpl.replace("{{TOTAL_EPOCHS}}", &total_epochs.to_string())
            .replace("{{EPOCH}}", &epoch)
            .replace("{{ACCURACY}}", &accuracy)
            .replace("{{LOSS}}", &loss)
            .replace("{{STATUS_NOTE}}", &note)
            .replace("{{NETWORK_SVG}}", &network_svg)
            .replace("{{LOSS_SVG}}", &loss_svg)
            .replace("{{ACCURACY_SVG}}", &accuracy_svg)
    }))
}

/// One-line summary of a finished run, escaped for the page.
fn status_note(status: &RunStatus) -> String {
    match status {
        RunStatus::Running => String::new(),
        RunStatus::Done { elapsed_total_ms, .. } => {
            format!("Finished in {:.1} s", *elapsed_total_ms as f64 / 1000.0)
        }
        RunStatus::Failed { reason } => format!("Run failed: {}", escape(reason)),
    }
}
