use actix_web::{get, web, Responder, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::{charts, FilterQuery},
};

#[get("/stats")]
async fn index(
    state: web::Data<AppState<State>>,
    query: web::Query<FilterQuery>,
) -> Result<impl Responder, Error> {
    let selection = query.selection();
    let summary = state.queries().stat_summary(&selection);
    Ok(web::Json(charts::stat_cards(&summary)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        configuration::Config, estimator::BlockTimeEstimator,
        model::StatCard, types::ScanCache,
    };
    use actix_web::{test, App};
    use serde_json::json;

    #[actix_web::test]
    async fn stats_endpoint_returns_the_four_cards() {
        let cache = ScanCache::from_value(json!({
            "hard_liquidations": [
                {"date": "2025-01-02", "network": "ethereum",
                 "market": "wstETH", "debt_repaid": 100.0}
            ],
            "ethereum_market_wstETH": {
                "results": [{"block_number": 21_515_000,
                             "soft_liq_count": 3,
                             "total_collateral_usd": 1000.0}]
            }
        }))
        .unwrap();

        let config = Config {
            cache_source: String::new(),
            server_host: String::from("127.0.0.1"),
            port: 0,
            allowed_origins: vec![String::from("*")],
            static_dir: String::new(),
            timeout: 30,
            block_timings: BlockTimeEstimator::default_timings(),
        };

        let app_state = AppState::new(State::new(config, cache));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state))
                .service(index),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/stats?network=all&from=2025-01-01&to=2025-01-31")
            .to_request();
        let cards: Vec<StatCard> =
            test::call_and_read_body_json(&app, request).await;

        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].value, "3");
        assert_eq!(cards[1].value, "1");
        assert_eq!(cards[3].label, "Active Markets");
    }
}
