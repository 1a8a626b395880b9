use ju::presentation::cli::CliApp;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let app = CliApp::new();
    init_logging(app.verbose());

    let code = app.run().await;
    std::process::exit(code);
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked by `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "ju=debug" } else { "ju=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
