use actix_web::{get, web, Responder, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::FilterQuery,
};

#[get("/funds-saved")]
async fn index(
    state: web::Data<AppState<State>>,
    query: web::Query<FilterQuery>,
) -> Result<impl Responder, Error> {
    let selection = query.selection();
    let funds = state.queries().funds_saved(&selection);
    Ok(web::Json(funds))
}
