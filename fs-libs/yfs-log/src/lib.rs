#![no_std]

extern crate alloc;

use alloc::{format, string::String};

pub mod structured;

pub type Sink = fn(&log::Record);

pub struct Logger<const N: usize> {
    pub sinks: [Sink; N],
}

impl<const N: usize> log::Log for Logger<N> {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            for sink in &self.sinks {
                (sink)(record)
            }
        }
    }

    fn flush(&self) {}
}

/// Renders a record as `[level][target] message`.
pub fn format_text(record: &log::Record) -> String {
    format!("[{}][{}] {}", record.level(), record.target(), record.args())
}
