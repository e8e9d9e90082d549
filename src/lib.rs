pub mod record;
pub mod throwable;
pub mod config;
pub mod error;
pub mod document;
pub mod timestamp;
pub mod formatter;
pub mod layout;
pub mod event_layout;
pub mod access_layout;
pub mod env;

pub use config::{AccessLayoutConfig, EventLayoutConfig, JsonFormatConfig, LayoutConfig};
pub use error::{ConfigError, EncodingError};
pub use layout::{render, Event, JsonLayout, Layout};
pub use record::{AccessRecord, LogRecord};
