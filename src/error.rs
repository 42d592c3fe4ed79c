use actix_web::ResponseError;
use anyhow::Error as ANYHOW_ERROR;
use reqwest::Error as REQWEST_ERROR;
use serde_json::Error as JSON_ERROR;
use std::num::TryFromIntError as TRY_FROM_INT_ERROR;
use std::{
    env::VarError, io::Error as IO_ERROR, num::ParseFloatError,
    num::ParseIntError,
};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;
use url::ParseError as URL_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    FLOAT(#[from] ParseFloatError),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    Reqwest(#[from] REQWEST_ERROR),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Cache loading error: {0}")]
    CacheLoadError(String),

    #[error("Server end with error: {0}")]
    ServerError(String),

    #[error("Decode datetime: {0}")]
    DecodeDateTimeError(String),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("{0}")]
    TryFromIntError(#[from] TRY_FROM_INT_ERROR),

    #[error("{0}")]
    AnyHowError(#[from] ANYHOW_ERROR),
}

impl ResponseError for Error {}
