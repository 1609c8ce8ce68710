//! JSON rendering of log records.
//!
//! Each record becomes one object with `level`, `target`, `message`, the
//! optional source location and a `data` object holding the record's
//! key-value pairs.

use core::{
    fmt::{self, Write},
    marker::PhantomData,
};

use alloc::string::String;
use log::{
    Record,
    kv::{Error as KvError, Key, Value as KvValue, VisitSource},
};
use sval::Stream;

pub struct RecordSval<'a> {
    record: &'a Record<'a>,
}

impl<'a> RecordSval<'a> {
    pub const fn new(record: &'a Record<'a>) -> Self {
        Self { record }
    }
}

fn stream_text<'sval, S: Stream<'sval> + ?Sized>(stream: &mut S, text: &str) -> sval::Result {
    stream.text_begin(Some(text.len()))?;
    stream.text_fragment_computed(text)?;
    stream.text_end()
}

struct StreamWriter<'a, 'sval, S: Stream<'sval> + ?Sized> {
    stream: &'a mut S,
    _marker: PhantomData<&'sval ()>,
}

impl<'sval, S: Stream<'sval> + ?Sized> Write for StreamWriter<'_, 'sval, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.stream
            .text_fragment_computed(s)
            .map_err(|_| fmt::Error)
    }
}

fn stream_text_args<'sval, S: Stream<'sval> + ?Sized>(
    stream: &mut S,
    args: &fmt::Arguments,
) -> sval::Result {
    stream.text_begin(None)?;
    StreamWriter {
        stream: &mut *stream,
        _marker: PhantomData,
    }
    .write_fmt(*args)
    .map_err(|_| sval::Error::new())?;
    stream.text_end()
}

fn stream_map_kv<'sval, S: Stream<'sval> + ?Sized>(
    stream: &mut S,
    key: &str,
    value: impl FnOnce(&mut S) -> sval::Result,
) -> sval::Result {
    stream.map_key_begin()?;
    stream_text(stream, key)?;
    stream.map_key_end()?;
    stream.map_value_begin()?;
    (value)(stream)?;
    stream.map_value_end()
}

struct KvToSval<'r, 'sval, S: Stream<'sval> + ?Sized> {
    stream: &'r mut S,
    _marker: PhantomData<&'sval ()>,
}

impl<'kvs, 'sval, S: Stream<'sval> + ?Sized> VisitSource<'kvs> for KvToSval<'_, 'sval, S> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: KvValue<'kvs>) -> Result<(), KvError> {
        stream_map_kv(self.stream, key.as_str(), |stream| {
            stream.value_computed(&value)
        })
        .map_err(|_| KvError::msg("sval error"))
    }
}

impl sval::Value for RecordSval<'_> {
    fn stream<'sval, S: Stream<'sval> + ?Sized>(&'sval self, stream: &mut S) -> sval::Result {
        let record = self.record;
        stream.map_begin(None)?;

        stream_map_kv(stream, "level", |stream| {
            stream_text(stream, record.level().as_str())
        })?;
        stream_map_kv(stream, "target", |stream| stream_text(stream, record.target()))?;
        stream_map_kv(stream, "message", |stream| {
            stream_text_args(stream, record.args())
        })?;

        if let Some(path) = record.module_path() {
            stream_map_kv(stream, "module_path", |stream| stream_text(stream, path))?;
        }
        if let Some(file) = record.file() {
            stream_map_kv(stream, "file", |stream| stream_text(stream, file))?;
        }
        if let Some(line) = record.line() {
            stream_map_kv(stream, "line", |stream| stream.u64(u64::from(line)))?;
        }

        stream_map_kv(stream, "data", |stream| {
            stream.map_begin(Some(record.key_values().count()))?;
            let mut visitor = KvToSval {
                stream: &mut *stream,
                _marker: PhantomData,
            };
            record
                .key_values()
                .visit(&mut visitor)
                .map_err(|_| sval::Error::new())?;
            stream.map_end()
        })?;

        stream.map_end()
    }
}

/// Renders `record` as a single line of JSON.
pub fn to_json(record: &Record) -> Result<String, fmt::Error> {
    let mut out = String::new();
    sval_json::stream_to_fmt_write(&mut out, &RecordSval::new(record)).map_err(|_| fmt::Error)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use log::{Level, Record};

    use super::to_json;

    #[test]
    fn record_as_json() {
        let kvs = [("inode", 7u32)];
        let record = Record::builder()
            .level(Level::Info)
            .target("yfs")
            .args(format_args!("opened {}", "a"))
            .line(Some(12))
            .key_values(&kvs)
            .build();

        let json = to_json(&record).unwrap();
        assert!(json.starts_with("{\"level\":\"INFO\",\"target\":\"yfs\""));
        assert!(json.contains("\"message\":\"opened a\""));
        assert!(json.contains("\"line\":12"));
        assert!(json.contains("\"data\":{\"inode\":7}"));
    }
}
