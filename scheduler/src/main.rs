use elasticmem::{
    api,
    config::Config,
    state::{self, ExtenderState},
};
use tracing_subscriber::{self, EnvFilter};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_server=warn,actix_web=warn"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env();
    let plugin = config.strategy.build(&config).map_err(|err| {
        tracing::error!(error=%err, "Failed to build plugin");
        std::io::Error::other(err.to_string())
    })?;

    let state = ExtenderState::with_ttl(plugin, config.cycle_ttl);
    tokio::spawn(state::sweep(state.clone(), config.cycle_ttl / 2));
    tracing::info!(strategy=%config.strategy, cycle_ttl=?config.cycle_ttl, "elasticmem ready");
    api::run(state, &config).await
}
