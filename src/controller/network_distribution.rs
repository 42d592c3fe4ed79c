use actix_web::{get, web, Responder, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::{charts, FilterQuery},
};

#[get("/network-distribution")]
async fn index(
    state: web::Data<AppState<State>>,
    query: web::Query<FilterQuery>,
) -> Result<impl Responder, Error> {
    let selection = query.selection();
    let (soft, hard) = state.queries().network_distribution(&selection);
    Ok(web::Json(charts::network_distribution(&soft, &hard)))
}
