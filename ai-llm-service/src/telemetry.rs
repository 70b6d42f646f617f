//! Shared `tracing` setup for the HunterMatch binaries.
//!
//! The crates only emit events; the binary composes [`layer`] with
//! [`env_filter`] into the global subscriber.

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Workspace crates whose level is raised by [`env_filter`].
pub const WORKSPACE_TARGETS: &[&str] = &[
    "huntermatch",
    "ai_llm_service",
    "review_store",
    "orchestrator",
    "api",
    "chat_client",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Formatting layer used by every binary in the workspace.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line`
/// - Span close events (durations of `#[instrument]`ed calls)
/// - Written to stderr, ANSI colors only when stderr is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stderr().is_terminal();

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(io::stderr)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
}

/// Builds a `target=level` directive, e.g. `review_store=debug`.
///
/// Returns `None` when `target` is not a valid directive target.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    format!("{target}={}", level.as_str().to_lowercase())
        .parse()
        .ok()
}

/// `RUST_LOG` if set, otherwise `default`; workspace crates are then raised to `level`.
///
/// Explicit `RUST_LOG` directives for a workspace crate win over `level`.
pub fn env_filter(default: &str, level: Level) -> EnvFilter {
    let from_env = std::env::var("RUST_LOG").ok();
    let mut filter = match &from_env {
        Some(spec) => EnvFilter::new(spec),
        None => EnvFilter::new(default),
    };
    for target in WORKSPACE_TARGETS {
        let overridden = from_env
            .as_deref()
            .is_some_and(|spec| spec.split(',').any(|d| d.trim().starts_with(target)));
        if overridden {
            continue;
        }
        if let Some(d) = level_directive(target, level) {
            filter = filter.add_directive(d);
        }
    }
    filter
}
