//! Logger setup for the command-line tool
//!
//! Everything goes to stderr: Alfred reads the script's stdout.

use anyhow::Result;
use fern::colors::{Color, ColoredLevelConfig};
use fern::Dispatch;
use log::LevelFilter;

/// Map the number of `-v` flags to a level filter
pub fn level_from_occurrences(occurrences: u8) -> LevelFilter {
    match occurrences {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr logger
pub fn init_logger(level: LevelFilter) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::White)
        .debug(Color::White)
        .trace(Color::BrightBlack);

    Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    log::debug!("Logger initialized at level {}", level);
    Ok(())
}
