use log::LevelFilter;
use tictactoe_core::LogSpec;

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

/// Environment variable holding per-subsystem levels, e.g.
/// `info,vision=debug,game::machine=trace`.
pub const LOG_ENV: &str = "TICTACTOE_LOG";

/// Levels to log at: `env` when it parses, `level` for everything otherwise.
pub fn log_spec(level: LevelFilter, env: Option<&str>) -> LogSpec {
    match env.map(str::parse::<LogSpec>) {
        Some(Ok(spec)) => spec,
        Some(Err(e)) => {
            eprintln!("ignoring {LOG_ENV}: {e}");
            LogSpec::new(level)
        }
        None => LogSpec::new(level),
    }
}

/// Install the process-wide logger.
///
/// With the `tracing` feature, `log` records are forwarded to a `tracing`
/// subscriber filtered by `RUST_LOG` and `level` is ignored. Otherwise
/// `TICTACTOE_LOG` overrides `level` when set.
/// Repeated calls are no-ops.
pub fn init_logging(level: LevelFilter, json: bool) {
    #[cfg(feature = "tracing")]
    {
        let _ = level;
        let _ = LogTracer::init();
        tictactoe_core::init_tracing(json);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = json;
        let env = std::env::var(LOG_ENV).ok();
        if let Err(e) = tictactoe_core::init_with_spec(log_spec(level, env.as_deref())) {
            eprintln!("logger already installed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_the_cli_level() {
        let spec = log_spec(LevelFilter::Info, Some("warn,vision=trace"));
        assert_eq!(spec.default, LevelFilter::Warn);
        assert_eq!(spec.level_for("tictactoe_vision::hough"), LevelFilter::Trace);
    }

    #[test]
    fn unparsable_env_falls_back_to_the_cli_level() {
        assert_eq!(
            log_spec(LevelFilter::Debug, Some("vision=chatty")),
            LogSpec::new(LevelFilter::Debug)
        );
        assert_eq!(
            log_spec(LevelFilter::Trace, None),
            LogSpec::new(LevelFilter::Trace)
        );
    }
}
