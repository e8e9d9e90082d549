use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::time::Duration;
use tracing::Level;

use crate::throwable::ThrowableProxy;

/// Ordered string map used for MDC properties and HTTP headers.
pub type StringMap = IndexMap<String, String>;

/// Ordered map of request parameters. A parameter may repeat, so every
/// name maps to the list of values in the order they were received.
pub type ParameterMap = IndexMap<String, Vec<String>>;

/// A single application log event as handed over by the logging runtime.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub logger_name: String,
    pub thread_name: Option<String>,
    /// Message template before argument substitution.
    pub message: String,
    /// Message after argument substitution.
    pub formatted_message: String,
    pub throwable: Option<ThrowableProxy>,
    /// Mapped diagnostic context attached to the event.
    pub mdc: StringMap,
    pub context_name: Option<String>,
}

impl LogRecord {
    /// Create a record stamped with the current time whose raw and
    /// formatted messages are identical.
    pub fn new(level: Level, logger_name: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        LogRecord {
            timestamp: Utc::now(),
            level,
            logger_name: logger_name.into(),
            thread_name: None,
            formatted_message: message.clone(),
            message,
            throwable: None,
            mdc: StringMap::new(),
            context_name: None,
        }
    }
}

/// A single HTTP request/response pair captured by the serving layer.
#[derive(Debug, Clone, Default)]
pub struct AccessRecord {
    /// When the request was received.
    pub timestamp: DateTime<Utc>,
    /// Time between receiving the request and logging it.
    pub elapsed: Duration,
    pub remote_addr: Option<String>,
    pub remote_host: Option<String>,
    pub remote_user: Option<String>,
    pub method: String,
    /// Request URI including the query string.
    pub uri: String,
    /// Request line; derived from method, URI and protocol when absent.
    pub request_url: Option<String>,
    pub protocol: String,
    pub status: u16,
    pub content_length: Option<u64>,
    pub server_name: Option<String>,
    pub local_port: Option<u16>,
    pub request_headers: StringMap,
    pub response_headers: StringMap,
    pub request_parameters: ParameterMap,
    pub request_content: Option<Vec<u8>>,
    pub response_content: Option<Vec<u8>>,
}

impl AccessRecord {
    /// Look up a request header ignoring ASCII case.
    pub fn request_header(&self, name: &str) -> Option<&str> {
        find_header(&self.request_headers, name)
    }

    /// Look up a response header ignoring ASCII case.
    pub fn response_header(&self, name: &str) -> Option<&str> {
        find_header(&self.response_headers, name)
    }
}

fn find_header<'a>(headers: &'a StringMap, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
