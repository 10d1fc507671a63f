//! Utility modules

pub mod fixtures;
pub mod memory_storage;
pub mod validation;

pub use memory_storage::*;
pub use validation::*;

/// Initializes the global tracing subscriber with sensible defaults.
///
/// `RUST_LOG` still applies; `church_core=info` is added on top of it.
/// Calling it again is harmless: `try_init` leaves an installed subscriber alone.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "church_core=info".parse() {
        filter = filter.add_directive(directive);
    }

    // Another subscriber may already be installed by the host application
    let _ = fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_tracing_twice_does_not_panic() {
        super::init_tracing();
        super::init_tracing();
    }
}
