use std::error::Error;
use std::fmt::Write;

/// Prefix written in front of every throwable that wraps another one.
pub const WRAPPED_BY: &str = "Wrapped by: ";

/// Snapshot of an exception and its cause chain, detached from the error
/// value that produced it so it can travel with a [`LogRecord`].
///
/// [`LogRecord`]: crate::record::LogRecord
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThrowableProxy {
    /// Type of the throwable, e.g. `std::io::Error`. Error sources reached
    /// through [`Error::source`] have no nameable type and leave it empty.
    pub class_name: Option<String>,
    pub message: Option<String>,
    /// Stack frames, innermost first, without the leading `at`.
    pub stack_trace: Vec<String>,
    /// Frames shared with the enclosing throwable that were left out of
    /// `stack_trace`.
    pub common_frames: usize,
    pub cause: Option<Box<ThrowableProxy>>,
}

impl ThrowableProxy {
    pub fn new(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        ThrowableProxy {
            class_name: Some(class_name.into()),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_frames<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stack_trace = frames.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_common_frames(mut self, common_frames: usize) -> Self {
        self.common_frames = common_frames;
        self
    }

    pub fn with_cause(mut self, cause: ThrowableProxy) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Capture `err` and every error reachable through [`Error::source`].
    ///
    /// Only the outermost error has a statically known type, so sources are
    /// recorded by message alone.
    pub fn from_error<E: Error + 'static>(err: &E) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(ThrowableProxy {
                message: Some(cause.to_string()),
                ..Default::default()
            });
            source = cause.source();
        }

        let cause = chain.into_iter().rev().fold(None, |inner, mut cause: ThrowableProxy| {
            cause.cause = inner.map(Box::new);
            Some(cause)
        });

        ThrowableProxy {
            cause: cause.map(Box::new),
            ..ThrowableProxy::new(std::any::type_name::<E>(), err.to_string())
        }
    }

    /// The deepest throwable of the chain.
    pub fn root_cause(&self) -> &ThrowableProxy {
        let mut current = self;
        while let Some(cause) = current.cause.as_deref() {
            current = cause;
        }
        current
    }

    fn first_line(&self) -> String {
        match (&self.class_name, &self.message) {
            (Some(class), Some(message)) => format!("{}: {}", class, message),
            (Some(class), None) => class.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Render the whole cause chain of `throwable` with the root cause first and
/// every enclosing throwable after it, each prefixed with [`WRAPPED_BY`].
pub fn format_root_cause_first(throwable: &ThrowableProxy) -> String {
    let mut chain = Vec::new();
    let mut current = Some(throwable);
    while let Some(proxy) = current {
        chain.push(proxy);
        current = proxy.cause.as_deref();
    }

    let mut out = String::with_capacity(256);
    for (depth, proxy) in chain.iter().rev().enumerate() {
        if depth > 0 {
            out.push_str(WRAPPED_BY);
        }
        out.push_str(&proxy.first_line());
        out.push('\n');
        for frame in &proxy.stack_trace {
            // writing into a String cannot fail
            let _ = writeln!(out, "\tat {}", frame);
        }
        if proxy.common_frames > 0 {
            let _ = writeln!(out, "\t... {} common frames omitted", proxy.common_frames);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("query failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn root_cause_is_printed_first() {
        let proxy = ThrowableProxy::new("app::QueryError", "Unable to execute an SQL query")
            .with_frames(["app::db::query", "app::main"])
            .with_cause(
                ThrowableProxy::new("app::DbDown", "Database is down!")
                    .with_frames(["app::db::connect", "app::db::query"])
                    .with_common_frames(1),
            );

        let text = format_root_cause_first(&proxy);
        assert_eq!(
            text,
            "app::DbDown: Database is down!\n\
             \tat app::db::connect\n\
             \tat app::db::query\n\
             \t... 1 common frames omitted\n\
             Wrapped by: app::QueryError: Unable to execute an SQL query\n\
             \tat app::db::query\n\
             \tat app::main\n"
        );
    }

    #[test]
    fn from_error_walks_sources() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "connection refused"));
        let proxy = ThrowableProxy::from_error(&err);

        assert!(proxy.class_name.as_deref().unwrap().ends_with("Outer"));
        assert_eq!(proxy.root_cause().message.as_deref(), Some("connection refused"));
        assert_eq!(proxy.root_cause().class_name, None);

        let text = format_root_cause_first(&proxy);
        assert!(text.starts_with("connection refused\nWrapped by: "));
        assert!(text.ends_with("Outer: query failed\n"));
    }

    #[test]
    fn missing_message_prints_type_only() {
        let proxy = ThrowableProxy {
            class_name: Some("app::Panic".to_string()),
            ..Default::default()
        };
        assert_eq!(format_root_cause_first(&proxy), "app::Panic\n");
    }
}
