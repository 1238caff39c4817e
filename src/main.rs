use std::process::ExitCode;

use cors_file_server::config::Config;
use cors_file_server::error::{StartupError, StartupResult};
use cors_file_server::logger;
use cors_file_server::server::{signal, Server};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_startup_failed(&e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> StartupResult<()> {
    // Optional config file path (without extension), defaults to ./config.toml
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg).map_err(StartupError::Logger)?;

    // Build the Tokio runtime, worker count from config when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> StartupResult<()> {
    let server = Server::bind(cfg)?;
    let addr = server.local_addr()?;
    logger::log_server_start(&addr, server.state().root(), &server.state().config);

    server.run_until(signal::shutdown_signal()).await?;
    Ok(())
}
