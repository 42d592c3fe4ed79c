use std::{
    collections::HashMap,
    env, fs,
    ops::Deref,
    sync::Arc,
};

use chrono::{NaiveDate, TimeZone, Utc};

use crate::{
    error::Error,
    estimator::{BlockTimeEstimator, NetworkTiming},
    handler::{aggregate, Queries},
    helpers::parse_tuple_string,
    model::ProcessedModel,
    types::ScanCache,
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

/// Process-wide state: the immutable cache, the processed model built
/// from it, and the estimator. Constructed once after a successful
/// load, replaced wholesale on restart, never mutated in place.
#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub cache: ScanCache,
    pub processed: ProcessedModel,
    pub estimator: BlockTimeEstimator,
}

impl State {
    pub fn new(config: Config, cache: ScanCache) -> State {
        let estimator =
            BlockTimeEstimator::new(config.block_timings.clone());
        let processed = aggregate(&cache, &estimator);
        State {
            config,
            cache,
            processed,
            estimator,
        }
    }

    pub fn queries(&self) -> Queries {
        Queries {
            cache: &self.cache,
            model: &self.processed,
            estimator: &self.estimator,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub cache_source: String,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
    pub timeout: u64,
    pub block_timings: HashMap<String, NetworkTiming>,
}

pub fn get_configuration() -> Result<Config, Error> {
    let cache_source = env::var("CACHE_SOURCE")?;
    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let timeout = env::var("TIMEOUT")?.parse()?;

    let allowed_origins = env::var("ALLOWED_ORIGINS")?
        .split(',')
        .map(|item| item.to_owned())
        .collect::<Vec<String>>();

    let static_dir = format!(
        "{}/{}",
        env!("CARGO_MANIFEST_DIR"),
        env::var("STATIC_DIRECTORY")?
    );

    let block_timings = match env::var("NETWORKS") {
        Ok(value) if !value.is_empty() => parse_block_timings(value)?,
        _ => BlockTimeEstimator::default_timings(),
    };

    let config = Config {
        cache_source,
        server_host,
        port,
        allowed_origins,
        static_dir,
        timeout,
        block_timings,
    };

    Ok(config)
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    let config_string = fs::read_to_string(path)?;
    parse_config_string(config_string);

    Ok(())
}

fn parse_config_string(config: String) {
    let params: Vec<Option<(&str, &str)>> = config
        .split('\n')
        .map(|s| {
            let element = s.find('=');
            if let Some(e) = element {
                return Some(s.split_at(e));
            }
            None
        })
        .map(|value| {
            if let Some((k, v)) = value {
                return Some((k, &v[1..]));
            }
            None
        })
        .collect();

    for (key, value) in params.into_iter().flatten() {
        env::set_var(key, value);
    }
}

/// `(name,reference_block,reference_date,seconds_per_block),(...)`
fn parse_block_timings(
    value: String,
) -> Result<HashMap<String, NetworkTiming>, Error> {
    let mut timings: HashMap<String, NetworkTiming> = HashMap::new();

    for tuple in parse_tuple_string(value) {
        let items: Vec<&str> = tuple.split(',').collect();
        if items.len() != 4 {
            return Err(Error::ConfigurationError(format!(
                "invalid NETWORKS tuple: {}",
                tuple
            )));
        }

        let name = items[0].to_owned();
        let reference_block: u64 = items[1].parse()?;
        let reference_date = NaiveDate::parse_from_str(items[2], "%Y-%m-%d")
            .map_err(|e| {
                Error::DecodeDateTimeError(format!("{}: {}", items[2], e))
            })?
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| {
                Error::DecodeDateTimeError(items[2].to_owned())
            })?;
        let seconds_per_block: f64 = items[3].parse()?;

        timings.insert(
            name,
            NetworkTiming {
                reference_block,
                reference_date: Utc.from_utc_datetime(&reference_date),
                seconds_per_block,
            },
        );
    }

    Ok(timings)
}
