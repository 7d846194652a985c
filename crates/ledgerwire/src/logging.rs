use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Target that emits the `HID <=` / `HID =>` packet dumps.
const PACKET_TARGET: &str = "ledgerwire_frame";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

fn filter(level: LogLevel, dump_packets: bool) -> Targets {
    let targets = Targets::new().with_default(LevelFilter::from(level));
    if dump_packets {
        targets.with_target(PACKET_TARGET, LevelFilter::TRACE)
    } else {
        targets
    }
}

/// Log to stderr so stdout stays clean for command output.
///
/// `dump_packets` shows every HID packet regardless of `level`.
pub fn init_logging(format: LogFormat, level: LogLevel, dump_packets: bool) {
    let filter = filter(level, dump_packets);
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    let _ = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json().with_filter(filter))
            .try_init(),
    };
}
