use chrono_tz::Tz;
use serde_json::Value;

use crate::config::EventLayoutConfig;
use crate::document::{fill_document, string_map_value, string_value, Document, FieldSpec};
use crate::error::ConfigError;
use crate::formatter::JsonFormatter;
use crate::layout::{start_document, JsonLayout};
use crate::record::LogRecord;
use crate::throwable::format_root_cause_first;
use crate::timestamp::TimestampFormatter;

/// Fields of a log event in output order, after `timestamp`.
static LOG_FIELDS: &[FieldSpec<EventLayoutConfig, LogRecord>] = &[
    FieldSpec {
        key: "level",
        enabled: |c| c.include_level,
        extract: |e| Some(Value::from(e.level.as_str())),
    },
    FieldSpec {
        key: "thread",
        enabled: |c| c.include_thread_name,
        extract: |e| string_value(&e.thread_name),
    },
    FieldSpec {
        key: "mdc",
        enabled: |c| c.include_mdc,
        extract: |e| string_map_value(&e.mdc),
    },
    FieldSpec {
        key: "logger",
        enabled: |c| c.include_logger_name,
        extract: |e| Some(Value::from(e.logger_name.as_str())),
    },
    FieldSpec {
        key: "message",
        enabled: |c| c.include_formatted_message,
        extract: |e| Some(Value::from(e.formatted_message.as_str())),
    },
    FieldSpec {
        key: "raw-message",
        enabled: |c| c.include_message,
        extract: |e| Some(Value::from(e.message.as_str())),
    },
    FieldSpec {
        key: "exception",
        enabled: |c| c.include_exception,
        extract: |e| e.throwable.as_ref().map(|t| Value::String(format_root_cause_first(t))),
    },
    FieldSpec {
        key: "context",
        enabled: |c| c.include_context_name,
        extract: |e| string_value(&e.context_name),
    },
];

/// JSON layout for application log events.
#[derive(Debug, Clone)]
pub struct EventJsonLayout {
    config: EventLayoutConfig,
    timestamps: TimestampFormatter,
    formatter: JsonFormatter,
}

impl EventJsonLayout {
    /// Validate `config` and prepare everything that does not depend on
    /// the event, so rendering only reads from the layout.
    pub fn new(config: EventLayoutConfig, time_zone: Tz) -> Result<Self, ConfigError> {
        let timestamps = config.format.timestamp_formatter(time_zone)?;
        let formatter = config.format.formatter();
        tracing::debug!(
            pretty_print = formatter.pretty_print(),
            append_line_separator = formatter.append_line_separator(),
            time_zone = %time_zone,
            "built event json layout"
        );
        Ok(EventJsonLayout {
            config,
            timestamps,
            formatter,
        })
    }

    pub fn config(&self) -> &EventLayoutConfig {
        &self.config
    }
}

impl JsonLayout for EventJsonLayout {
    type Event = LogRecord;

    fn to_document(&self, event: &LogRecord) -> Document {
        let mut document = start_document(&self.config.format, &self.timestamps, &event.timestamp);
        fill_document(&mut document, LOG_FIELDS, &self.config, event);
        document
    }

    fn formatter(&self) -> &JsonFormatter {
        &self.formatter
    }
}
