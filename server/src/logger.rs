use log::{LevelFilter, SetLoggerError};
use yfs_log::{Logger, format_text, structured::to_json};

fn text_sink(record: &log::Record) {
    eprintln!("{}", format_text(record));
}

fn json_sink(record: &log::Record) {
    match to_json(record) {
        Ok(line) => eprintln!("{line}"),
        Err(_) => text_sink(record),
    }
}

static TEXT_LOGGER: Logger<1> = Logger { sinks: [text_sink] };
static JSON_LOGGER: Logger<1> = Logger { sinks: [json_sink] };

/// Installs the process logger. Records go to stderr, one per line.
pub fn init(level: LevelFilter, json: bool) -> Result<(), SetLoggerError> {
    if json {
        log::set_logger(&JSON_LOGGER)?;
    } else {
        log::set_logger(&TEXT_LOGGER)?;
    }
    log::set_max_level(level);
    Ok(())
}
