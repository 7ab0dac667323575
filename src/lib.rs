pub mod config;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

pub use config::TriageConfig;
pub use models::{Message, MessageRole, Severity, Trend};
pub use pipeline::safety::{PolicyDocument, PolicyProvider, PolicyVerdict};
pub use pipeline::triage::{TriageError, TriageOrchestrator, TriageOutcome, TriageRequest, TriageTables};

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, falling back to [`config::default_log_filter`]. Safe to
/// call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
