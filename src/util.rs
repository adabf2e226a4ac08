use std::env;

use tracing_subscriber::EnvFilter;

pub(crate) fn env_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Logs go to stderr so `show --json` output stays clean. `RUST_LOG`
/// overrides the default `info` level.
pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_optional_skips_unset() {
        assert_eq!(env_optional("ACTPROGRESS_TEST_SURELY_UNSET_VAR"), None);
    }
}
