use std::io::Write;
use std::time::Duration;

use chrono::Utc;
use json_event_layout::env::time_zone_from_env;
use json_event_layout::record::{ParameterMap, StringMap};
use json_event_layout::{AccessRecord, LayoutConfig};

/// Builds an access layout from a JSON config snippet and writes one line
/// per request to stdout, the way a request log appender would.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config: LayoutConfig = serde_json::from_str(
        r#"{
            "type": "access-json",
            "timestampFormat": "%d/%b/%Y:%H:%M:%S %z",
            "includeRequestHeaders": true,
            "includeRequestURL": true
        }"#,
    )?;
    let layout = config.build(time_zone_from_env()?)?;

    let mut request_headers = StringMap::new();
    request_headers.insert("Host".to_string(), "api.example.com".to_string());
    request_headers.insert("User-Agent".to_string(), "curl/8.5.0".to_string());

    let mut request_parameters = ParameterMap::new();
    request_parameters.insert("tag".to_string(), vec!["red".to_string(), "blue".to_string()]);

    let record = AccessRecord {
        timestamp: Utc::now(),
        elapsed: Duration::from_millis(17),
        remote_addr: Some("203.0.113.9".to_string()),
        method: "GET".to_string(),
        uri: "/products?tag=red&tag=blue".to_string(),
        protocol: "HTTP/1.1".to_string(),
        status: 200,
        content_length: Some(1532),
        request_headers,
        request_parameters,
        ..AccessRecord::default()
    };

    let mut stdout = std::io::stdout().lock();
    if let Some(line) = layout.render(&record)? {
        stdout.write_all(line.as_bytes())?;
    }
    Ok(())
}
