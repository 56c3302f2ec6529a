use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use tableload::interfaces::cli::{self, Cli};

fn main() {
    // .env is optional; real environment variables win over it
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(error = %err, "Failed to start async runtime");
            std::process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(cli::run(cli)) {
        error!("{}", err);
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
