use actix_web::{get, web, Responder, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::{charts, FilterQuery},
};

#[get("/liquidations-series")]
async fn index(
    state: web::Data<AppState<State>>,
    query: web::Query<FilterQuery>,
) -> Result<impl Responder, Error> {
    let selection = query.selection();
    let queries = state.queries();
    let buckets = queries.filtered_buckets(&selection);
    Ok(web::Json(charts::time_series(&buckets)))
}
