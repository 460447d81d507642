use camino::Utf8PathBuf;

/// Pretty output on stderr for interactive use, or JSON to a daily-rolling
/// file under `log_dir`.
pub fn initialize_logging(log_dir: Option<Utf8PathBuf>) {
    use tracing::Level;
    use tracing_subscriber::{filter::Targets, prelude::*};

    let log_layer = tracing_subscriber::fmt::layer();

    match log_dir {
        None => {
            let dev_log_filter = Targets::new()
                .with_target("ffcs_client", Level::DEBUG)
                .with_target("ffcs", Level::DEBUG)
                .with_target("reqwest", Level::INFO);
            let log_layer = log_layer
                .pretty()
                .with_writer(std::io::stderr)
                .with_filter(dev_log_filter);

            tracing_subscriber::registry().with(log_layer).init();
        }
        Some(path) => {
            let log_writer = tracing_appender::rolling::daily(path, "ffcs.log");
            let prod_log_filter = Targets::new()
                .with_target("ffcs_client", Level::INFO)
                .with_target("ffcs", Level::INFO);
            let log_layer = log_layer
                .json()
                .with_writer(log_writer)
                .with_filter(prod_log_filter);

            tracing_subscriber::registry().with(log_layer).init();
        }
    }
}
