use chrono::NaiveDate;
use coinforecast::application::forecast::SyntheticFallback;
use coinforecast::application::ml::TrainerConfig;
use coinforecast::application::service::{ForecastService, ServiceLimits};
use coinforecast::domain::catalog::{AssetCatalog, CurrencyTable};
use coinforecast::domain::errors::RequestValidationError;
use coinforecast::domain::forecast::{ErrorResponse, ForecastRequest};
use coinforecast::infrastructure::mock::MockHistoricalDataFetcher;
use std::sync::Arc;

fn service() -> ForecastService {
    ForecastService::build(
        AssetCatalog::default(),
        CurrencyTable::default(),
        Arc::new(MockHistoricalDataFetcher::new()),
        TrainerConfig::default(),
        SyntheticFallback::default(),
        ServiceLimits::default(),
    )
}

#[tokio::test]
async fn test_horizon_bounds() {
    let service = service();

    for days in [0, -1, 366] {
        let err = service
            .forecast(&ForecastRequest::new("BTC", days, "USD"))
            .await
            .unwrap_err();
        assert_eq!(err, RequestValidationError::InvalidHorizon { days, max: 365 });
        assert_eq!(err.status_code(), 400);
    }

    for days in [1, 365] {
        let response = service
            .forecast(&ForecastRequest::new("BTC", days, "USD"))
            .await
            .unwrap();
        assert_eq!(response.predictions.len(), days as usize);
    }
}

#[tokio::test]
async fn test_unknown_symbol_and_currency_rejected() {
    let service = service();

    let err = service
        .forecast(&ForecastRequest::new("DOGGO", 5, "USD"))
        .await
        .unwrap_err();
    assert!(matches!(err, RequestValidationError::UnsupportedSymbol { .. }));

    let err = service
        .forecast(&ForecastRequest::new("BTC", 5, "XAU"))
        .await
        .unwrap_err();
    assert!(matches!(err, RequestValidationError::UnsupportedCurrency { .. }));

    let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
    assert!(body["error"].as_str().unwrap().contains("XAU"));
}

#[tokio::test]
async fn test_symbol_and_currency_are_normalized() {
    let service = service();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let response = service
        .forecast_from(&ForecastRequest::new(" eth ", 2, "gbp"), start)
        .await
        .unwrap();

    assert_eq!(response.symbol, "ETH");
    assert_eq!(response.currency, "GBP");
    // ETH base 2000 USD at 0.79 GBP, fallback path stays near it
    for point in &response.predictions {
        assert!(point.price > 1_580.0 * 0.95 && point.price < 1_580.0 * 1.25);
    }
}

#[tokio::test]
async fn test_response_json_shape() {
    let service = service();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let response = service
        .forecast_from(&ForecastRequest::new("BTC", 2, "USD"), start)
        .await
        .unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["symbol"], "BTC");
    assert_eq!(json["currency"], "USD");
    assert_eq!(json["model_type"], "fallback");
    assert_eq!(json["predictions"][0]["date"], "2024-01-01");
    assert_eq!(json["predictions"][1]["date"], "2024-01-02");
    assert!(json["predictions"][0]["price"].is_f64());
}

#[test]
fn test_listings_and_health() {
    let service = service();

    assert_eq!(service.supported_coins().supported_coins.len(), 20);
    assert_eq!(service.supported_coins().supported_coins[0], "BTC");
    assert!(
        service
            .supported_currencies()
            .supported_currencies
            .contains(&"JPY".to_string())
    );

    let health = serde_json::to_value(service.health()).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["trained_models"], 0);
}
