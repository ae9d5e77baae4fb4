mod app;
mod ui;

use std::sync::Arc;

use clap::Parser;
use dioxus::prelude::*;
use nebula_core::{ClientConfig, HttpInventoryApi};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "nebula", about = "Homelab inventory dashboard")]
struct Args {
    /// Backend base URL. Overrides the config file and NEBULA_API_URL.
    #[arg(long)]
    api_url: Option<String>,
}

fn main() {
    let args = Args::parse();
    let config = ClientConfig::load();

    let log_dir = match &config {
        Ok(c) => c.log_dir(),
        Err(_) => ClientConfig::default().log_dir(),
    };
    std::fs::create_dir_all(&log_dir).ok();
    let file_appender = tracing_appender::rolling::never(&log_dir, "nebula.log");
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(file_appender))
        .init();

    let api = config.and_then(|mut config| {
        if let Some(url) = args.api_url {
            config.override_api_url(url);
        }
        HttpInventoryApi::from_config(&config)
    });

    match api {
        Ok(api) => {
            tracing::info!(base = %api.base(), "starting nebula");
            LaunchBuilder::new()
                .with_context(app::ApiHandle(Arc::new(api)))
                .launch(app::App);
        }
        Err(e) => {
            tracing::error!("config: {e}");
            LaunchBuilder::new()
                .with_context(app::ConfigProblem(e.to_string()))
                .launch(app::ConfigErrorApp);
        }
    }
}
