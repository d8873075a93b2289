//! Structured logging for the resq command line
//!
//! Events go to stderr so stdout carries only the compiled request.
//! Optional daily-rotated log files via `tracing-appender`.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "resq.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-line
    Pretty,
    /// Structured JSON
    Json,
    Compact,
}

impl LogFormat {
    /// Unknown names fall back to compact
    pub fn parse(name: &str) -> Self {
        match name {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// Terminal only (stderr)
    Stdout,
    File,
    Both,
}

impl LogOutput {
    pub fn parse(name: &str) -> Self {
        match name {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            _ => LogOutput::Stdout,
        }
    }
}

fn console_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    }
}

fn file_layer<S>(directory: &str) -> std::io::Result<Box<dyn Layer<S> + Send + Sync>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    std::fs::create_dir_all(directory)?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, directory, LOG_FILE_PREFIX);
    Ok(fmt::layer().with_writer(file_appender).with_ansi(false).boxed())
}

/// Initialize the global subscriber from `config`.
///
/// An invalid filter falls back to `warn`. Fails only when the log
/// directory cannot be created.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    let format = LogFormat::parse(&config.format);
    let output = LogOutput::parse(&config.output);

    let env_filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match output {
        LogOutput::Stdout => registry.with(console_layer(format)).init(),
        LogOutput::File => registry.with(file_layer(&config.directory)?).init(),
        LogOutput::Both => registry
            .with(console_layer(format))
            .with(file_layer(&config.directory)?)
            .init(),
    }

    tracing::debug!(format = ?format, output = ?output, level = %config.level, "logging initialized");
    Ok(())
}
