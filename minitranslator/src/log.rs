/// Installs the process-wide logger.
///
/// Logs go to stderr. Level is Debug in development builds and Info in
/// production builds; `RUST_LOG` overrides it. Calling this more than once
/// is harmless.
pub fn init() {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
