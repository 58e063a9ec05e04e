use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the command-line subscriber; `RUST_LOG` wins over `verbose`
pub fn init_cli_logger(verbose: bool) {
    let default_directive = if verbose {
        "transit_ephem=debug,transit_planner=debug,info"
    } else {
        "transit_ephem=info,transit_planner=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
