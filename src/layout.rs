use chrono::{DateTime, Utc};

use crate::access_layout::AccessJsonLayout;
use crate::config::JsonFormatConfig;
use crate::document::Document;
use crate::error::EncodingError;
use crate::event_layout::EventJsonLayout;
use crate::formatter::JsonFormatter;
use crate::record::{AccessRecord, LogRecord};
use crate::timestamp::TimestampFormatter;

/// Key of the timestamp field, shared by both event kinds.
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Maps one kind of event to a JSON document and renders it.
///
/// Implementations hold only immutable state, so a single layout can be
/// shared between threads and called concurrently.
pub trait JsonLayout: Send + Sync {
    type Event;

    /// Build the ordered document for `event`. Disabled fields and fields
    /// the event has no data for are absent.
    fn to_document(&self, event: &Self::Event) -> Document;

    fn formatter(&self) -> &JsonFormatter;

    /// Render `event` as JSON text.
    ///
    /// **Returns**
    /// - `Ok(Some(json))` with the rendered document.
    /// - `Ok(None)` if no field was selected, in which case nothing should
    ///   be written for this event.
    /// - `Err(..)` if the document could not be encoded.
    fn render(&self, event: &Self::Event) -> Result<Option<String>, EncodingError> {
        self.formatter().format(&self.to_document(event))
    }
}

/// Render `event` with `layout`. See [`JsonLayout::render`].
pub fn render<L: JsonLayout>(event: &L::Event, layout: &L) -> Result<Option<String>, EncodingError> {
    layout.render(event)
}

/// New document holding the timestamp if the configuration asks for it.
pub(crate) fn start_document(
    format: &JsonFormatConfig,
    timestamps: &TimestampFormatter,
    timestamp: &DateTime<Utc>,
) -> Document {
    let mut document = Document::new();
    if format.include_timestamp {
        document.insert(TIMESTAMP_KEY.to_string(), timestamps.format(timestamp));
    }
    document
}

/// Borrowed event of either kind.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    Log(&'a LogRecord),
    Access(&'a AccessRecord),
}

impl Event<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Log(_) => "log",
            Event::Access(_) => "access",
        }
    }
}

impl<'a> From<&'a LogRecord> for Event<'a> {
    fn from(record: &'a LogRecord) -> Self {
        Event::Log(record)
    }
}

impl<'a> From<&'a AccessRecord> for Event<'a> {
    fn from(record: &'a AccessRecord) -> Self {
        Event::Access(record)
    }
}

/// A built layout of either kind, as produced by
/// [`LayoutConfig::build`](crate::config::LayoutConfig::build).
#[derive(Debug, Clone)]
pub enum Layout {
    Event(EventJsonLayout),
    Access(AccessJsonLayout),
}

impl Layout {
    pub fn formatter(&self) -> &JsonFormatter {
        match self {
            Layout::Event(layout) => layout.formatter(),
            Layout::Access(layout) => layout.formatter(),
        }
    }

    /// Build the document for `event`. An event of the kind this layout
    /// does not handle yields an empty document.
    pub fn to_document<'a>(&self, event: impl Into<Event<'a>>) -> Document {
        match (self, event.into()) {
            (Layout::Event(layout), Event::Log(record)) => layout.to_document(record),
            (Layout::Access(layout), Event::Access(record)) => layout.to_document(record),
            (_, event) => {
                tracing::trace!(kind = event.kind(), "layout does not handle this event kind");
                Document::new()
            }
        }
    }

    /// Render `event`; events of the other kind render to nothing.
    pub fn render<'a>(&self, event: impl Into<Event<'a>>) -> Result<Option<String>, EncodingError> {
        self.formatter().format(&self.to_document(event))
    }
}
