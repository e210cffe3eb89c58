use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global `tracing` subscriber (fmt + `RUST_LOG` filter).
///
/// Defaults to `family_finance_core=info`. Safe to call more than once; an
/// already-installed global subscriber is left in place.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("family_finance_core=info"));

        if fmt().with_env_filter(filter).try_init().is_ok() {
            tracing::info!("Family Finance tracing initialized.");
        }
    });
}
