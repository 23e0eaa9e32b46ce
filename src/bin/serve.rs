use clap::Parser;
use color_eyre::{eyre::WrapErr, Result};
use log::info;
use tilesnake::{config::ServeConfig, server};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    #[cfg(debug_assertions)]
    info!("running in debug mode");

    #[cfg(not(debug_assertions))]
    info!("running in release mode");

    let config = ServeConfig::parse();
    let root = config.root.canonicalize().wrap_err_with(|| {
        format!("cannot serve from {}", config.root.display())
    })?;

    info!("snake game server running at http://localhost:{}/", config.port);
    info!("serving files from {}", root.display());

    warp::serve(server::routes(root))
        .run(([0, 0, 0, 0], config.port))
        .await;

    Ok(())
}
