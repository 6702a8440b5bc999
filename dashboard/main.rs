/// irisnet dashboard
///
/// Trains the Iris classifier on a worker thread and streams the network
/// diagram, loss chart, accuracy chart and status read-outs to the browser
/// after every epoch. Served by a synchronous tiny_http server.
///
/// Run with:
///   cargo run --bin dashboard --release
/// Then open http://127.0.0.1:7878 (or the `bind_addr` in irisnet.json).

mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Instant;

use tiny_http::Server;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use irisnet::config::CONFIG_FILE;
use irisnet::{DemoConfig, DenseModelService, LineGraph, ModelGraph, SeriesKey, TrainingOrchestrator};

use state::{DashboardState, RunStatus, SharedState};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match DemoConfig::load_or_default(CONFIG_FILE) {
        Ok(c) => c,
        Err(e) => {
            error!("could not load {}: {}", CONFIG_FILE, e);
            std::process::exit(1);
        }
    };

    let server = match Server::http(config.bind_addr.as_str()) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to bind {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };

    let shared_state: SharedState = Arc::new(Mutex::new(DashboardState::new(config.train.epochs)));

    info!("dashboard listening on http://{}", config.bind_addr);
    spawn_training(config, shared_state.clone());

    // One thread per request: an open /events stream must not stall page loads.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}

/// Runs the orchestrator on its own thread. A second thread moves each frame
/// into the shared state as soon as it is produced.
fn spawn_training(config: DemoConfig, state: SharedState) {
    thread::spawn(move || {
        let started = Instant::now();
        let (tx, rx) = mpsc::channel();

        let collector_state = state.clone();
        let collector = thread::spawn(move || {
            for frame in rx {
                match collector_state.lock() {
                    Ok(mut st) => st.frames.push(frame),
                    Err(poisoned) => poisoned.into_inner().frames.push(frame),
                }
            }
        });

        let series = [SeriesKey::Validation, SeriesKey::Training];
        let mut orchestrator = TrainingOrchestrator::new(
            config.clone(),
            DenseModelService::new(config.learning_rate, config.seed),
            ModelGraph::new(config.network_graph),
            LineGraph::new("Loss", &series, config.loss_chart),
            LineGraph::new("Accuracy", &series, config.accuracy_chart),
        )
        .with_frames(tx);
        let result = orchestrator.run();

        // Dropping the orchestrator closes the channel so the collector drains and exits.
        drop(orchestrator);
        if collector.join().is_err() {
            warn!("frame collector panicked");
        }

        let status = match result {
            Ok(summary) => RunStatus::Done {
                final_metrics: summary.final_metrics,
                elapsed_total_ms: started.elapsed().as_millis() as u64,
            },
            Err(e) => {
                error!("training failed: {}", e);
                RunStatus::Failed { reason: e.to_string() }
            }
        };

        let mut st = match state.lock() {
            Ok(st) => st,
            Err(poisoned) => poisoned.into_inner(),
        };
        st.status = status;
        info!(frames = st.frames.len(), "run finished");
    });
}
