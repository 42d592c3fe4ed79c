use tracing::{error, info, Level};

use liqmon::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    provider::HTTP,
    server,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match init() {
        Ok(config) => config,
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    let http = HTTP::new(config.clone());
    let cache = http.get_cache().await?;

    info!(
        markets = cache.markets.len(),
        hard_liquidations = cache.hard_liquidations.len(),
        "scan cache loaded",
    );

    let state = State::new(config, cache);
    let app_state = AppState::new(state);

    server::server_task(&app_state).await
}

fn init() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}
