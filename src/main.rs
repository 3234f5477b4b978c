use tracing_subscriber::EnvFilter;
use usswind::run_from_env;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run_from_env() {
        tracing::error!("{}", err.message);
        std::process::exit(1);
    }
}
