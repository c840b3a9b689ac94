//! tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Level used when RUST_LOG is not set
pub fn default_level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber; `RUST_LOG` overrides the level
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(debug)));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false), "info");
        assert_eq!(default_level(true), "debug");
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }
}
