use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use display_feeds::{
    models::{candle::CandleRequest, timeframe::TimeFrame, weather::WeatherQuery},
    providers::{
        PriceProvider, ProviderError, WeatherProvider, binance::BinanceProvider,
        open_meteo::OpenMeteoProvider,
    },
};

type Queries = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

/// One canned response per path, recording every query string it receives.
#[derive(Clone)]
struct Stub {
    path: &'static str,
    queries: Queries,
    status: StatusCode,
    body: &'static str,
    delay: Duration,
}

async fn answer(
    State(stub): State<Stub>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, &'static str) {
    tokio::time::sleep(stub.delay).await;
    stub.queries.lock().unwrap().push((stub.path.to_string(), query));
    (stub.status, stub.body)
}

async fn spawn(
    routes: &[(&'static str, StatusCode, &'static str)],
    delay: Duration,
) -> (String, Queries) {
    let queries = Queries::default();
    let mut app = Router::new();
    for &(path, status, body) in routes {
        let stub = Stub {
            path,
            queries: Arc::clone(&queries),
            status,
            body,
            delay,
        };
        app = app.route(path, get(answer).with_state(stub));
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), queries)
}

const TICKER: &str = r#"{"symbol":"BTCUSDT","lastPrice":"65000.00","priceChangePercent":"-1.200"}"#;
const KLINES: &str = r#"[
    [1700000000000,"100.0","101.0","99.0","100.5","10",1700003599999,"0",1,"0","0","0"],
    [1700003600000,"100.5","102.0","100.0","101.5","12",1700007199999,"0",1,"0","0","0"]
]"#;

#[tokio::test]
async fn binance_sends_symbol_interval_and_limit() {
    let (base, queries) = spawn(
        &[
            ("/api/v3/ticker/24hr", StatusCode::OK, TICKER),
            ("/api/v3/klines", StatusCode::OK, KLINES),
        ],
        Duration::ZERO,
    )
    .await;
    let provider = BinanceProvider::new(base, Duration::from_secs(5)).unwrap();

    let ticker = provider.fetch_ticker("BTCUSDT").await.unwrap();
    assert_eq!(ticker.last_price, Some(65000.0));
    assert_eq!(ticker.price_change_percent, Some(-1.2));

    let request = CandleRequest::new("ETHUSDT", TimeFrame::FOUR_HOURS, 2);
    let candles = provider.fetch_candles(&request).await.unwrap();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    assert_eq!(closes, vec![100.5, 101.5]);

    let queries = queries.lock().unwrap();
    assert_eq!(queries[0].0, "/api/v3/ticker/24hr");
    assert_eq!(queries[0].1["symbol"], "BTCUSDT");
    assert_eq!(queries[1].0, "/api/v3/klines");
    assert_eq!(queries[1].1["symbol"], "ETHUSDT");
    assert_eq!(queries[1].1["interval"], "4h");
    assert_eq!(queries[1].1["limit"], "2");
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let (base, _queries) = spawn(
        &[(
            "/api/v3/ticker/24hr",
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"code":-1003,"msg":"Too many requests"}"#,
        )],
        Duration::ZERO,
    )
    .await;
    let provider = BinanceProvider::new(base, Duration::from_secs(5)).unwrap();

    let err = provider.fetch_ticker("BTCUSDT").await.unwrap_err();
    match err {
        ProviderError::Api { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("Too many requests"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_upstream_is_timeout() {
    let (base, _queries) = spawn(
        &[("/api/v3/ticker/24hr", StatusCode::OK, TICKER)],
        Duration::from_secs(5),
    )
    .await;
    let provider = BinanceProvider::new(base, Duration::from_millis(100)).unwrap();

    let err = provider.fetch_ticker("BTCUSDT").await.unwrap_err();
    assert!(matches!(err, ProviderError::Request(_)), "{err:?}");
    assert!(err.is_timeout());
}

#[tokio::test]
async fn open_meteo_requests_current_and_daily_fields() {
    let body = r#"{
        "current_weather": {"temperature": 24.3, "weathercode": 61},
        "daily": {"temperature_2m_max": [27.8], "temperature_2m_min": [18.2], "weathercode": [63]}
    }"#;
    let (base, queries) = spawn(&[("/v1/forecast", StatusCode::OK, body)], Duration::ZERO).await;
    let provider = OpenMeteoProvider::new(base, Duration::from_secs(5)).unwrap();

    let report = provider
        .fetch_weather(&WeatherQuery {
            latitude: 11.617917,
            longitude: 108.058922,
            timezone: "Asia/Ho_Chi_Minh".into(),
        })
        .await
        .unwrap();
    assert_eq!(report.current_temperature, Some(24.3));
    assert_eq!(report.effective_code(), Some(61));
    assert_eq!(report.daily_min, Some(18.2));

    let queries = queries.lock().unwrap();
    let q = &queries[0].1;
    assert_eq!(q["timezone"], "Asia/Ho_Chi_Minh");
    assert_eq!(q["current_weather"], "true");
    assert_eq!(q["daily"], "temperature_2m_max,temperature_2m_min,weathercode");
}
