use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter};
use serde_json::Serializer;
use std::io;

use crate::document::Document;
use crate::error::EncodingError;

const DEFAULT_BUFFER_SIZE: usize = 512;

/// Line terminator appended after each JSON document.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Turns a [`Document`] into JSON text. Shared by every layout so that all
/// of them encode strings, numbers and nesting the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFormatter {
    pretty_print: bool,
    append_line_separator: bool,
    buffer_size: usize,
}

impl JsonFormatter {
    pub fn new(pretty_print: bool, append_line_separator: bool) -> Self {
        JsonFormatter {
            pretty_print,
            append_line_separator,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn pretty_print(&self) -> bool {
        self.pretty_print
    }

    pub fn append_line_separator(&self) -> bool {
        self.append_line_separator
    }

    /// Render `document`, or return `Ok(None)` when it has no keys so the
    /// caller can skip the line entirely.
    pub fn format(&self, document: &Document) -> Result<Option<String>, EncodingError> {
        if document.is_empty() {
            return Ok(None);
        }
        self.to_json(document).map(Some)
    }

    /// Render `document` unconditionally, `{}` included.
    pub fn to_json(&self, document: &Document) -> Result<String, EncodingError> {
        let mut buf = Vec::with_capacity(self.buffer_size);
        let encoding_error = |source: serde_json::Error| EncodingError {
            document: document.clone(),
            source,
        };
        let written = if self.pretty_print {
            write_with(&mut buf, document, PrettyPrinter::default())
        } else {
            write_with(&mut buf, document, CompactFormatter)
        };
        written.map_err(encoding_error)?;

        if self.append_line_separator {
            buf.extend_from_slice(LINE_SEPARATOR.as_bytes());
        }
        String::from_utf8(buf).map_err(|err| encoding_error(serde_json::Error::custom(err)))
    }
}

fn write_with<T, F>(buf: &mut Vec<u8>, value: &T, formatter: F) -> Result<(), serde_json::Error>
where
    T: Serialize + ?Sized,
    F: Formatter,
{
    let mut serializer = Serializer::with_formatter(buf, formatter);
    value.serialize(&mut serializer)
}

/// Human readable output: objects span one line per key indented by two
/// spaces with ` : ` between key and value, arrays stay on one line as
/// `[ a, b ]`.
#[derive(Debug, Default)]
struct PrettyPrinter {
    depth: usize,
    has_value: bool,
}

impl PrettyPrinter {
    fn indent<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for _ in 0..self.depth {
            writer.write_all(b"  ")?;
        }
        Ok(())
    }
}

impl Formatter for PrettyPrinter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b" ]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        let separator: &[u8] = if first { b" " } else { b", " };
        writer.write_all(separator)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.depth += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.depth -= 1;
        if self.has_value {
            writer.write_all(b"\n")?;
            self.indent(writer)?;
        } else {
            writer.write_all(b" ")?;
        }
        writer.write_all(b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        let separator: &[u8] = if first { b"\n" } else { b",\n" };
        writer.write_all(separator)?;
        self.indent(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b" : ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jim() -> Document {
        match json!({"name": "Jim", "hobbies": ["Reading", "Biking", "Snorkeling"]}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn compact_without_separator() {
        let formatter = JsonFormatter::new(false, false);
        assert_eq!(
            formatter.to_json(&jim()).unwrap(),
            r#"{"name":"Jim","hobbies":["Reading","Biking","Snorkeling"]}"#
        );
    }

    #[test]
    fn compact_with_separator() {
        let formatter = JsonFormatter::new(false, true);
        assert_eq!(
            formatter.to_json(&jim()).unwrap(),
            format!(
                "{}{}",
                r#"{"name":"Jim","hobbies":["Reading","Biking","Snorkeling"]}"#,
                LINE_SEPARATOR
            )
        );
    }

    #[test]
    fn pretty_without_separator() {
        let formatter = JsonFormatter::new(true, false);
        assert_eq!(
            formatter.to_json(&jim()).unwrap(),
            "{\n  \"name\" : \"Jim\",\n  \"hobbies\" : [ \"Reading\", \"Biking\", \"Snorkeling\" ]\n}"
        );
    }

    #[test]
    fn pretty_with_separator() {
        let formatter = JsonFormatter::new(true, true);
        let text = formatter.to_json(&jim()).unwrap();
        assert!(text.starts_with("{\n  \"name\" : \"Jim\",\n"));
        assert!(text.ends_with(&format!("]\n}}{}", LINE_SEPARATOR)));
    }

    #[test]
    fn pretty_nests_objects_and_empty_containers() {
        let doc = match json!({"mdc": {"user": "jim"}, "empty": {}, "none": []}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let text = JsonFormatter::new(true, false).to_json(&doc).unwrap();
        assert_eq!(
            text,
            "{\n  \"mdc\" : {\n    \"user\" : \"jim\"\n  },\n  \"empty\" : { },\n  \"none\" : [ ]\n}"
        );
    }

    #[test]
    fn empty_document_formats_to_nothing() {
        let formatter = JsonFormatter::new(false, true);
        assert_eq!(formatter.format(&Document::new()).unwrap(), None);
    }
}
