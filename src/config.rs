use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::access_layout::AccessJsonLayout;
use crate::error::ConfigError;
use crate::event_layout::EventJsonLayout;
use crate::formatter::JsonFormatter;
use crate::layout::Layout;
use crate::timestamp::TimestampFormatter;

/// Options shared by every JSON layout.
///
/// **Fields**
/// - `include_timestamp`: write the event time under `timestamp`.
/// - `timestamp_format`: strftime pattern for the timestamp. When absent
///   the timestamp is written as epoch milliseconds.
/// - `pretty_print`: indent the output for human readers.
/// - `append_line_separator`: end every document with a line separator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonFormatConfig {
    pub include_timestamp: bool,
    pub timestamp_format: Option<String>,
    pub pretty_print: bool,
    pub append_line_separator: bool,
}

impl Default for JsonFormatConfig {
    fn default() -> Self {
        Self {
            include_timestamp: true,
            timestamp_format: None,
            pretty_print: false,
            append_line_separator: true,
        }
    }
}

impl JsonFormatConfig {
    /// Check every option without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pattern) = &self.timestamp_format {
            crate::timestamp::validate_pattern(pattern)?;
        }
        Ok(())
    }

    /// The serializer configured by `pretty_print` and
    /// `append_line_separator`.
    pub fn formatter(&self) -> JsonFormatter {
        JsonFormatter::new(self.pretty_print, self.append_line_separator)
    }

    /// Compile `timestamp_format` for `time_zone`.
    pub fn timestamp_formatter(&self, time_zone: Tz) -> Result<TimestampFormatter, ConfigError> {
        TimestampFormatter::new(self.timestamp_format.as_deref(), time_zone)
    }
}

/// Field selection for application log events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EventLayoutConfig {
    #[serde(flatten)]
    pub format: JsonFormatConfig,
    pub include_level: bool,
    pub include_thread_name: bool,
    #[serde(rename = "includeMDC", alias = "includeMdc")]
    pub include_mdc: bool,
    pub include_logger_name: bool,
    pub include_formatted_message: bool,
    /// Raw message template, before argument substitution.
    pub include_message: bool,
    /// Omitted from the output when the event carries no exception.
    pub include_exception: bool,
    pub include_context_name: bool,
}

impl Default for EventLayoutConfig {
    fn default() -> Self {
        Self {
            format: JsonFormatConfig::default(),
            include_level: true,
            include_thread_name: true,
            include_mdc: true,
            include_logger_name: true,
            include_formatted_message: true,
            include_message: false,
            include_exception: true,
            include_context_name: false,
        }
    }
}

impl EventLayoutConfig {
    /// A configuration with every toggle off, the timestamp as well.
    pub fn none() -> Self {
        Self {
            format: JsonFormatConfig {
                include_timestamp: false,
                ..JsonFormatConfig::default()
            },
            include_level: false,
            include_thread_name: false,
            include_mdc: false,
            include_logger_name: false,
            include_formatted_message: false,
            include_message: false,
            include_exception: false,
            include_context_name: false,
        }
    }

    pub fn build(&self, time_zone: Tz) -> Result<EventJsonLayout, ConfigError> {
        EventJsonLayout::new(self.clone(), time_zone)
    }
}

/// Field selection for HTTP access events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AccessLayoutConfig {
    #[serde(flatten)]
    pub format: JsonFormatConfig,
    /// Address of the client or last proxy that sent the request.
    pub include_remote_addr: bool,
    pub include_remote_user: bool,
    /// Time between receiving the request and logging it, in milliseconds.
    pub include_request_time: bool,
    #[serde(rename = "includeRequestURI", alias = "includeRequestUri")]
    pub include_request_uri: bool,
    pub include_status_code: bool,
    pub include_method: bool,
    pub include_protocol: bool,
    /// Response content length, if it is known.
    pub include_content_length: bool,
    /// Request line: method, URI with query and protocol.
    #[serde(rename = "includeRequestURL", alias = "includeRequestUrl")]
    pub include_request_url: bool,
    pub include_remote_host: bool,
    pub include_server_name: bool,
    pub include_request_headers: bool,
    pub include_request_parameters: bool,
    pub include_user_agent: bool,
    pub include_response_headers: bool,
    pub include_local_port: bool,
    pub include_request_content: bool,
    pub include_response_content: bool,
}

impl Default for AccessLayoutConfig {
    fn default() -> Self {
        Self {
            format: JsonFormatConfig::default(),
            include_remote_addr: true,
            include_remote_user: true,
            include_request_time: true,
            include_request_uri: true,
            include_status_code: true,
            include_method: true,
            include_protocol: true,
            include_content_length: true,
            include_request_url: false,
            include_remote_host: false,
            include_server_name: false,
            include_request_headers: false,
            include_request_parameters: true,
            include_user_agent: true,
            include_response_headers: false,
            include_local_port: false,
            include_request_content: false,
            include_response_content: false,
        }
    }
}

impl AccessLayoutConfig {
    /// A configuration with every toggle off, the timestamp as well.
    pub fn none() -> Self {
        Self {
            format: JsonFormatConfig {
                include_timestamp: false,
                ..JsonFormatConfig::default()
            },
            include_remote_addr: false,
            include_remote_user: false,
            include_request_time: false,
            include_request_uri: false,
            include_status_code: false,
            include_method: false,
            include_protocol: false,
            include_content_length: false,
            include_request_url: false,
            include_remote_host: false,
            include_server_name: false,
            include_request_headers: false,
            include_request_parameters: false,
            include_user_agent: false,
            include_response_headers: false,
            include_local_port: false,
            include_request_content: false,
            include_response_content: false,
        }
    }

    pub fn build(&self, time_zone: Tz) -> Result<AccessJsonLayout, ConfigError> {
        AccessJsonLayout::new(self.clone(), time_zone)
    }
}

/// A layout configuration selected by its `type` name.
///
/// - `json`: application log events.
/// - `access-json`: HTTP access events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayoutConfig {
    #[serde(rename = "json")]
    Event(EventLayoutConfig),
    #[serde(rename = "access-json")]
    Access(AccessLayoutConfig),
}

impl LayoutConfig {
    pub fn format(&self) -> &JsonFormatConfig {
        match self {
            LayoutConfig::Event(config) => &config.format,
            LayoutConfig::Access(config) => &config.format,
        }
    }

    pub fn build(&self, time_zone: Tz) -> Result<Layout, ConfigError> {
        match self {
            LayoutConfig::Event(config) => config.build(time_zone).map(Layout::Event),
            LayoutConfig::Access(config) => config.build(time_zone).map(Layout::Access),
        }
    }
}
