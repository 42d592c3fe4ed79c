use actix_web::{get, web, Responder, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

/// Available per-network date ranges and market counts, independent of
/// the active filter.
#[get("/cache-info")]
async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    Ok(web::Json(state.queries().network_ranges()))
}
