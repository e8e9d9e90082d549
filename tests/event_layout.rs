use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use json_event_layout::formatter::LINE_SEPARATOR;
use json_event_layout::throwable::ThrowableProxy;
use json_event_layout::{EventLayoutConfig, JsonFormatConfig, JsonLayout, LogRecord};
use serde_json::Value;
use tracing::Level;

fn app_log() -> LogRecord {
    let mut record = LogRecord::new(Level::INFO, "com.example.app", "Application log");
    record.timestamp = Utc.with_ymd_and_hms(2012, 11, 16, 5, 0, 47).unwrap();
    record.thread_name = Some("main".to_string());
    record
}

fn level_logger_message() -> EventLayoutConfig {
    EventLayoutConfig {
        include_level: true,
        include_logger_name: true,
        include_formatted_message: true,
        format: JsonFormatConfig {
            append_line_separator: false,
            ..EventLayoutConfig::none().format
        },
        ..EventLayoutConfig::none()
    }
}

fn parse(json: &str) -> serde_json::Map<String, Value> {
    match serde_json::from_str(json).unwrap() {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn selected_fields_in_declared_order() {
    let layout = level_logger_message().build(Tz::UTC).unwrap();
    let json = layout.render(&app_log()).unwrap().unwrap();
    assert_eq!(
        json,
        r#"{"level":"INFO","logger":"com.example.app","message":"Application log"}"#
    );
}

#[test]
fn exception_starts_with_root_cause() {
    let config = EventLayoutConfig {
        include_exception: true,
        ..level_logger_message()
    };
    let layout = config.build(Tz::UTC).unwrap();

    let mut record = LogRecord::new(Level::ERROR, "com.example.app", "Unable to execute an SQL query");
    record.throwable = Some(
        ThrowableProxy::new("app::QueryError", "query failed")
            .with_frames(["app::repo::find"])
            .with_cause(ThrowableProxy::new("app::DbError", "Database is down!").with_frames(["app::db::connect"])),
    );

    let doc = parse(&layout.render(&record).unwrap().unwrap());
    assert_eq!(
        doc.keys().collect::<Vec<_>>(),
        ["level", "logger", "message", "exception"]
    );
    let exception = doc["exception"].as_str().unwrap();
    assert!(exception.starts_with("app::DbError: Database is down!\n"));
    assert!(exception.contains("Wrapped by: app::QueryError: query failed\n"));
}

#[test]
fn exception_key_absent_without_exception() {
    let layout = EventLayoutConfig {
        include_exception: true,
        ..level_logger_message()
    }
    .build(Tz::UTC)
    .unwrap();

    let doc = layout.to_document(&app_log());
    assert!(!doc.contains_key("exception"));
}

#[test]
fn default_configuration_renders_full_catalog() {
    let mut record = app_log();
    record.message = "Hello {}".to_string();
    record.formatted_message = "Hello world".to_string();
    record.mdc.insert("requestId".to_string(), "abc-123".to_string());
    record.context_name = Some("default".to_string());

    let config = EventLayoutConfig {
        include_message: true,
        include_context_name: true,
        ..EventLayoutConfig::default()
    };
    let layout = config.build(Tz::UTC).unwrap();
    let json = layout.render(&record).unwrap().unwrap();
    assert!(json.ends_with(LINE_SEPARATOR));

    let doc = parse(&json);
    assert_eq!(
        doc.keys().collect::<Vec<_>>(),
        ["timestamp", "level", "thread", "mdc", "logger", "message", "raw-message", "context"]
    );
    assert_eq!(doc["timestamp"], Value::from(1_353_042_047_000_i64));
    assert_eq!(doc["thread"], "main");
    assert_eq!(doc["mdc"]["requestId"], "abc-123");
    assert_eq!(doc["message"], "Hello world");
    assert_eq!(doc["raw-message"], "Hello {}");
    assert_eq!(doc["context"], "default");
}

#[test]
fn empty_mdc_and_unnamed_thread_are_omitted() {
    let mut record = app_log();
    record.thread_name = None;

    let layout = EventLayoutConfig::default().build(Tz::UTC).unwrap();
    let doc = layout.to_document(&record);
    assert!(!doc.contains_key("mdc"));
    assert!(!doc.contains_key("thread"));
    assert!(doc.contains_key("level"));
}

#[test]
fn formatted_timestamp_uses_layout_time_zone() {
    let config = EventLayoutConfig {
        format: JsonFormatConfig {
            include_timestamp: true,
            timestamp_format: Some("%Y-%m-%dT%H:%M:%S%.3f%:z".to_string()),
            ..JsonFormatConfig::default()
        },
        ..EventLayoutConfig::none()
    };
    let layout = config.build(chrono_tz::America::New_York).unwrap();

    let doc = layout.to_document(&app_log());
    assert_eq!(doc.len(), 1);
    assert_eq!(doc["timestamp"], "2012-11-16T00:00:47.000-05:00");
}

#[test]
fn nothing_selected_renders_nothing() {
    let mut record = app_log();
    record.throwable = Some(ThrowableProxy::new("app::Boom", "boom"));
    let layout = EventLayoutConfig::none().build(Tz::UTC).unwrap();
    assert_eq!(layout.render(&record).unwrap(), None);
}
