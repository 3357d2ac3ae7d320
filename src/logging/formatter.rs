use std::io::{self, Stdout};

use tracing_subscriber::{layer::Layer as LayerTrait, registry::LookupSpan};

use crate::logging::{config::LogFormat, formats, LoggingConfig};

/// Build a boxed formatter layer for stdout, dispatching on `format`.
pub fn build_formatter_from_config<S>(
    config: &LoggingConfig,
    format: LogFormat,
    with_ansi: bool,
) -> Box<dyn LayerTrait<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let writer: fn() -> Stdout = io::stdout;
    match format {
        LogFormat::Json => formats::json::build_json_layer(config, writer, with_ansi),
        LogFormat::Pretty => formats::pretty::build_pretty_layer(config, writer, with_ansi),
        LogFormat::Compact => formats::compact::build_compact_layer(config, writer, with_ansi),
    }
}

/// Build a boxed formatter layer for a non-blocking file writer.
pub fn build_file_formatter_from_config<S, W>(
    config: &LoggingConfig,
    format: LogFormat,
    writer: W,
) -> Box<dyn LayerTrait<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => formats::json::build_json_layer(config, writer, false),
        LogFormat::Pretty => formats::pretty::build_pretty_layer(config, writer, false),
        LogFormat::Compact => formats::compact::build_compact_layer(config, writer, false),
    }
}
