//! Stderr logger for the robot's subsystems.
//!
//! Records are printed as `[elapsed LEVEL subsystem] message`, where the
//! subsystem is the module path with the `tictactoe_` crate prefix removed
//! (`vision::hough`, `game::machine::driver`). Levels can be set per
//! subsystem with a [`LogSpec`] such as `info,vision=debug,game=warn`.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const CRATE_PREFIX: &str = "tictactoe_";

/// Module path without the `tictactoe_` crate prefix.
pub fn short_target(target: &str) -> &str {
    target.strip_prefix(CRATE_PREFIX).unwrap_or(target)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid log directive '{directive}'")]
pub struct ParseLogSpecError {
    pub directive: String,
}

/// Default level plus per-subsystem overrides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSpec {
    pub default: LevelFilter,
    /// `(subsystem prefix, level)`; the longest matching prefix wins.
    pub overrides: Vec<(String, LevelFilter)>,
}

impl LogSpec {
    pub fn new(default: LevelFilter) -> Self {
        Self {
            default,
            overrides: Vec::new(),
        }
    }

    /// Level applied to records from `target`.
    pub fn level_for(&self, target: &str) -> LevelFilter {
        let target = short_target(target);
        self.overrides
            .iter()
            .filter(|(prefix, _)| {
                target == prefix
                    || target
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(self.default, |&(_, level)| level)
    }

    /// Most verbose level any subsystem may log at.
    pub fn max_level(&self) -> LevelFilter {
        self.overrides
            .iter()
            .map(|&(_, level)| level)
            .fold(self.default, Ord::max)
    }
}

impl FromStr for LogSpec {
    type Err = ParseLogSpecError;

    /// Comma separated directives: a bare level sets the default and
    /// `subsystem=level` overrides one subsystem.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut spec = LogSpec::new(LevelFilter::Info);
        for directive in s.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            let invalid = || ParseLogSpecError {
                directive: directive.to_string(),
            };
            match directive.split_once('=') {
                Some((target, level)) => {
                    let target = short_target(target.trim());
                    if target.is_empty() {
                        return Err(invalid());
                    }
                    let level = level.trim().parse().map_err(|_| invalid())?;
                    spec.overrides.push((target.to_string(), level));
                }
                None => spec.default = directive.parse().map_err(|_| invalid())?,
            }
        }
        Ok(spec)
    }
}

struct RobotLogger {
    spec: LogSpec,
    started: Instant,
}

impl Log for RobotLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.spec.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:9.3}s {:<5} {}] {}",
            elapsed,
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<RobotLogger> = OnceLock::new();

/// Install the stderr logger with per-subsystem levels.
///
/// Only the first call installs anything; later calls are no-ops.
pub fn init_with_spec(spec: LogSpec) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let max_level = spec.max_level();
        let logger = LOGGER.get_or_init(|| RobotLogger {
            spec,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(max_level);
    }
    Ok(())
}

/// Install the stderr logger with one level for every subsystem.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    init_with_spec(LogSpec::new(level))
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_crate_prefix() {
        assert_eq!(short_target("tictactoe_vision::hough"), "vision::hough");
        assert_eq!(short_target("tictactoe"), "tictactoe");
        assert_eq!(short_target("imageproc::edges"), "imageproc::edges");
    }

    #[test]
    fn parses_default_and_overrides() {
        let spec: LogSpec = "warn, vision=debug, tictactoe_game::machine=trace"
            .parse()
            .expect("parse");
        assert_eq!(spec.default, LevelFilter::Warn);
        assert_eq!(
            spec.overrides,
            vec![
                ("vision".to_string(), LevelFilter::Debug),
                ("game::machine".to_string(), LevelFilter::Trace),
            ]
        );
        assert_eq!(spec.max_level(), LevelFilter::Trace);
    }

    #[test]
    fn longest_matching_subsystem_wins() {
        let spec: LogSpec = "info,game=warn,game::machine=debug".parse().expect("parse");
        assert_eq!(spec.level_for("tictactoe_game::policy"), LevelFilter::Warn);
        assert_eq!(
            spec.level_for("tictactoe_game::machine::driver"),
            LevelFilter::Debug
        );
        assert_eq!(spec.level_for("tictactoe_gameplay"), LevelFilter::Info);
        assert_eq!(spec.level_for("tictactoe_vision::reader"), LevelFilter::Info);
    }

    #[test]
    fn rejects_unknown_levels() {
        let err = "vision=loud".parse::<LogSpec>().expect_err("bad level");
        assert_eq!(err.directive, "vision=loud");
        assert!("=debug".parse::<LogSpec>().is_err());
        assert_eq!("".parse::<LogSpec>(), Ok(LogSpec::new(LevelFilter::Info)));
    }

    #[test]
    fn second_init_is_a_no_op() {
        init_with_spec("warn,vision=debug".parse().expect("parse")).expect("first init");
        init_with_level(LevelFilter::Trace).expect("second init");
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }
}
