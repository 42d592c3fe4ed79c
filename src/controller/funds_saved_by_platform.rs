use actix_web::{get, web, Responder, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::{charts, FilterQuery},
};

#[get("/funds-saved-by-platform")]
async fn index(
    state: web::Data<AppState<State>>,
    query: web::Query<FilterQuery>,
) -> Result<impl Responder, Error> {
    let selection = query.selection();
    let groups = state.queries().funds_saved_by_platform(&selection);
    Ok(web::Json(charts::funds_saved_platforms(&groups)))
}
