use std::time::Instant;

use chrono_tz::Tz;
use tracing::{info, Level};

use json_event_layout::throwable::ThrowableProxy;
use json_event_layout::{EventLayoutConfig, JsonFormatConfig, JsonLayout, LogRecord};

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let compact = EventLayoutConfig::default()
        .build(Tz::UTC)
        .expect("default layout config is valid");
    let formatted = EventLayoutConfig {
        format: JsonFormatConfig {
            timestamp_format: Some("%Y-%m-%dT%H:%M:%S%.3f%:z".to_string()),
            ..JsonFormatConfig::default()
        },
        ..EventLayoutConfig::default()
    }
    .build(chrono_tz::Europe::Berlin)
    .expect("timestamp pattern is valid");

    let mut record = LogRecord::new(Level::ERROR, "billing::invoices", "invoice 42 could not be sent");
    record.thread_name = Some("worker-3".to_string());
    record.mdc.insert("tenant".to_string(), "acme".to_string());
    record.throwable = Some(
        ThrowableProxy::new("billing::SendError", "smtp rejected the message")
            .with_frames(["billing::mail::send", "billing::invoices::deliver"])
            .with_cause(ThrowableProxy::new("smtp::Error", "550 mailbox unavailable")),
    );

    let n: u64 = 100_000;
    for (name, layout) in [("epoch millis", &compact), ("formatted timestamp", &formatted)] {
        let start = Instant::now();
        let mut bytes = 0usize;

        for _ in 0..n {
            if let Ok(Some(json)) = layout.render(&record) {
                bytes += json.len();
            }
        }

        let elapsed = start.elapsed();
        info!(
            layout = name,
            events = n,
            bytes,
            ?elapsed,
            per_second = n as f64 / elapsed.as_secs_f64(),
            "render load finished"
        );
    }
}
