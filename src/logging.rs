use std::sync::Once;

use env_logger::WriteStyle;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter in `env_logger` syntax, e.g. "colorcube=debug,gl_wrapper=debug".
    pub env_filter: Option<String>,
    pub write_style: WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: WriteStyle::Auto,
        }
    }
}

/// `--log-filter` beats `RUST_LOG`, which beats the info default.
pub fn resolve_filter(cli: Option<String>, env: Option<String>) -> String {
    let given = |f: &String| !f.trim().is_empty();

    cli.filter(given)
        .or_else(|| env.filter(given))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

static INIT: Once = Once::new();

/// Installs the global logger, only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        let installed = env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .try_init();

        if installed.is_ok() {
            log::debug!("logging initialized with filter '{filter}'");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_filter_wins() {
        assert_eq!(
            resolve_filter(Some("debug".into()), Some("warn".into())),
            "debug"
        );
    }

    #[test]
    fn env_filter_without_cli() {
        assert_eq!(resolve_filter(None, Some("warn".into())), "warn");
    }

    #[test]
    fn blank_cli_filter_falls_through() {
        assert_eq!(resolve_filter(Some("".into()), Some("warn".into())), "warn");
    }

    #[test]
    fn defaults_to_info() {
        assert_eq!(resolve_filter(None, None), "info");
        assert_eq!(resolve_filter(None, Some("  ".into())), "info");
    }
}
