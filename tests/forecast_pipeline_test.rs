use chrono::NaiveDate;
use coinforecast::application::forecast::SyntheticFallback;
use coinforecast::application::ml::TrainerConfig;
use coinforecast::application::service::{ForecastService, ServiceLimits};
use coinforecast::domain::catalog::{AssetCatalog, CurrencyTable};
use coinforecast::domain::forecast::{ForecastRequest, ModelType};
use coinforecast::infrastructure::mock::{MockHistoricalDataFetcher, daily_series};
use std::sync::{Arc, Once};
use std::time::Duration;

static INIT: Once = Once::new();

fn setup_logging() {
    INIT.call_once(|| {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

fn wavy(i: usize) -> f64 {
    27_000.0 + 40.0 * i as f64 + 600.0 * (i as f64 / 3.0).sin()
}

fn service(fetcher: Arc<MockHistoricalDataFetcher>) -> ForecastService {
    ForecastService::build(
        AssetCatalog::default(),
        CurrencyTable::default(),
        fetcher,
        TrainerConfig::default(),
        SyntheticFallback::default(),
        ServiceLimits::default(),
    )
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

#[tokio::test]
async fn test_unavailable_data_degrades_to_fallback() {
    setup_logging();
    let fetcher = Arc::new(MockHistoricalDataFetcher::new());
    let service = service(fetcher.clone());

    let response = service
        .forecast_from(&ForecastRequest::new("BTC", 30, "USD"), start())
        .await
        .unwrap();

    assert_eq!(response.model_type, ModelType::Fallback);
    assert_eq!(response.predictions.len(), 30);
    for point in &response.predictions {
        assert!(point.price.is_finite());
        assert!(point.price >= 30_000.0 * 0.95 && point.price <= 30_000.0 * 1.25);
    }
}

#[tokio::test]
async fn test_short_history_degrades_to_fallback() {
    setup_logging();
    // 40 closes -> 26 feature rows, below the 30 row minimum
    let fetcher = Arc::new(
        MockHistoricalDataFetcher::new().with_series("ETH", daily_series(40, wavy)),
    );
    let service = service(fetcher);

    let response = service
        .forecast_from(&ForecastRequest::new("ETH", 7, "USD"), start())
        .await
        .unwrap();

    assert_eq!(response.model_type, ModelType::Fallback);
    assert_eq!(response.predictions.len(), 7);
}

#[tokio::test]
async fn test_trained_tier_is_deterministic() {
    setup_logging();
    let fetcher = Arc::new(
        MockHistoricalDataFetcher::new().with_series("BTC", daily_series(120, wavy)),
    );
    let service = service(fetcher.clone());
    let request = ForecastRequest::new("BTC", 14, "USD");

    let first = service.forecast_from(&request, start()).await.unwrap();
    let second = service.forecast_from(&request, start()).await.unwrap();

    assert_eq!(first.model_type, ModelType::LinearRegression);
    assert_eq!(first.predictions.len(), 14);
    assert!(first.predictions.iter().all(|p| p.price.is_finite()));
    assert_eq!(first, second);
    // Second request is served from the cache
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn test_recorded_failure_short_circuits_training() {
    setup_logging();
    let fetcher = Arc::new(MockHistoricalDataFetcher::new());
    let service = service(fetcher.clone());
    let request = ForecastRequest::new("SOL", 5, "USD");

    service.forecast_from(&request, start()).await.unwrap();
    // Data shows up later but the failure stays cached until an explicit retrain
    fetcher.set_series("SOL", daily_series(120, wavy));
    let response = service.forecast_from(&request, start()).await.unwrap();

    assert_eq!(response.model_type, ModelType::Fallback);
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn test_currency_conversion_is_exact() {
    setup_logging();
    let fetcher = Arc::new(
        MockHistoricalDataFetcher::new().with_series("BTC", daily_series(120, wavy)),
    );
    let service = service(fetcher);

    let usd = service
        .forecast_from(&ForecastRequest::new("BTC", 10, "USD"), start())
        .await
        .unwrap();
    let eur = service
        .forecast_from(&ForecastRequest::new("BTC", 10, "EUR"), start())
        .await
        .unwrap();

    assert_eq!(eur.currency, "EUR");
    assert_eq!(eur.model_type, ModelType::LinearRegression);
    for (u, e) in usd.predictions.iter().zip(&eur.predictions) {
        assert_eq!(u.date, e.date);
        assert_eq!(e.price, u.price * 0.92);
    }
}

#[tokio::test]
async fn test_prediction_dates_are_consecutive() {
    setup_logging();
    let service = service(Arc::new(MockHistoricalDataFetcher::new()));

    let response = service
        .forecast_from(&ForecastRequest::new("ADA", 3, "USD"), start())
        .await
        .unwrap();

    let dates: Vec<String> = response
        .predictions
        .iter()
        .map(|p| p.date.to_string())
        .collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
}

#[tokio::test]
async fn test_concurrent_misses_train_once() {
    setup_logging();
    let fetcher = Arc::new(
        MockHistoricalDataFetcher::with_latency(Duration::from_millis(100))
            .with_series("BTC", daily_series(120, wavy)),
    );
    let service = service(fetcher.clone());
    let request = ForecastRequest::new("BTC", 5, "USD");

    let (a, b) = tokio::join!(
        service.forecast_from(&request, start()),
        service.forecast_from(&request, start())
    );

    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(a.unwrap(), b.unwrap());
}
