use chrono_tz::Tz;
use serde_json::Value;

use crate::config::AccessLayoutConfig;
use crate::document::{
    body_value, fill_document, parameter_map_value, string_map_value, string_value, Document, FieldSpec,
};
use crate::error::ConfigError;
use crate::formatter::JsonFormatter;
use crate::layout::{start_document, JsonLayout};
use crate::record::AccessRecord;
use crate::timestamp::TimestampFormatter;

pub const USER_AGENT: &str = "User-Agent";
pub const CONTENT_LENGTH: &str = "Content-Length";

/// Fields of an access event in output order, after `timestamp`.
static ACCESS_FIELDS: &[FieldSpec<AccessLayoutConfig, AccessRecord>] = &[
    FieldSpec {
        key: "remoteAddress",
        enabled: |c| c.include_remote_addr,
        extract: |e| string_value(&e.remote_addr),
    },
    FieldSpec {
        key: "remoteUser",
        enabled: |c| c.include_remote_user,
        extract: |e| string_value(&e.remote_user),
    },
    FieldSpec {
        key: "requestTime",
        enabled: |c| c.include_request_time,
        extract: |e| Some(Value::from(u64::try_from(e.elapsed.as_millis()).unwrap_or(u64::MAX))),
    },
    FieldSpec {
        key: "uri",
        enabled: |c| c.include_request_uri,
        extract: |e| Some(Value::from(e.uri.as_str())),
    },
    FieldSpec {
        key: "status",
        enabled: |c| c.include_status_code,
        extract: |e| Some(Value::from(e.status)),
    },
    FieldSpec {
        key: "method",
        enabled: |c| c.include_method,
        extract: |e| Some(Value::from(e.method.as_str())),
    },
    FieldSpec {
        key: "protocol",
        enabled: |c| c.include_protocol,
        extract: |e| Some(Value::from(e.protocol.as_str())),
    },
    FieldSpec {
        key: "contentLength",
        enabled: |c| c.include_content_length,
        extract: content_length,
    },
    FieldSpec {
        key: "requestContent",
        enabled: |c| c.include_request_content,
        extract: |e| body_value(&e.request_content),
    },
    FieldSpec {
        key: "responseContent",
        enabled: |c| c.include_response_content,
        extract: |e| body_value(&e.response_content),
    },
    FieldSpec {
        key: "url",
        enabled: |c| c.include_request_url,
        extract: request_url,
    },
    FieldSpec {
        key: "remoteHost",
        enabled: |c| c.include_remote_host,
        extract: |e| string_value(&e.remote_host),
    },
    FieldSpec {
        key: "serverName",
        enabled: |c| c.include_server_name,
        extract: |e| string_value(&e.server_name),
    },
    FieldSpec {
        key: "localPort",
        enabled: |c| c.include_local_port,
        extract: |e| e.local_port.map(Value::from),
    },
    FieldSpec {
        key: "requestHeaders",
        enabled: |c| c.include_request_headers,
        extract: |e| string_map_value(&e.request_headers),
    },
    FieldSpec {
        key: "params",
        enabled: |c| c.include_request_parameters,
        extract: |e| parameter_map_value(&e.request_parameters),
    },
    FieldSpec {
        key: "userAgent",
        enabled: |c| c.include_user_agent,
        extract: |e| e.request_header(USER_AGENT).map(Value::from),
    },
    FieldSpec {
        key: "responseHeaders",
        enabled: |c| c.include_response_headers,
        extract: |e| string_map_value(&e.response_headers),
    },
];

/// Explicit content length, else the numeric `Content-Length` response
/// header.
fn content_length(event: &AccessRecord) -> Option<Value> {
    event
        .content_length
        .or_else(|| {
            event
                .response_header(CONTENT_LENGTH)
                .and_then(|value| value.trim().parse::<u64>().ok())
        })
        .map(Value::from)
}

/// The recorded request line, else one rebuilt as `METHOD URI PROTOCOL`.
fn request_url(event: &AccessRecord) -> Option<Value> {
    let url = match &event.request_url {
        Some(url) => url.clone(),
        None => format!("{} {} {}", event.method, event.uri, event.protocol),
    };
    Some(Value::String(url))
}

/// JSON layout for HTTP access events.
#[derive(Debug, Clone)]
pub struct AccessJsonLayout {
    config: AccessLayoutConfig,
    timestamps: TimestampFormatter,
    formatter: JsonFormatter,
}

impl AccessJsonLayout {
    pub fn new(config: AccessLayoutConfig, time_zone: Tz) -> Result<Self, ConfigError> {
        let timestamps = config.format.timestamp_formatter(time_zone)?;
        let formatter = config.format.formatter();
        tracing::debug!(
            pretty_print = formatter.pretty_print(),
            append_line_separator = formatter.append_line_separator(),
            time_zone = %time_zone,
            "built access json layout"
        );
        Ok(AccessJsonLayout {
            config,
            timestamps,
            formatter,
        })
    }

    pub fn config(&self) -> &AccessLayoutConfig {
        &self.config
    }
}

impl JsonLayout for AccessJsonLayout {
    type Event = AccessRecord;

    fn to_document(&self, event: &AccessRecord) -> Document {
        let mut document = start_document(&self.config.format, &self.timestamps, &event.timestamp);
        fill_document(&mut document, ACCESS_FIELDS, &self.config, event);
        document
    }

    fn formatter(&self) -> &JsonFormatter {
        &self.formatter
    }
}
