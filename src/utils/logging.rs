use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the application.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is parsed as a
/// filter expression, falling back to `info` when it does not parse.
pub fn init(default_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        default_level.parse::<EnvFilter>().unwrap_or_else(|e| {
            eprintln!("WARN: log level '{default_level}' is not a valid filter ({e}); using 'info'");
            EnvFilter::new("info")
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    // Use try_init so tests and libraries can call this multiple times without panicking
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
