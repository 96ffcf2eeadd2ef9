//! Integration tests for robinhood-rs against a mock server.
//!
//! Every test starts its own `wiremock` server and points both the
//! brokerage and the crypto base URLs at it (crypto under `/nummus/`).
//!
//! Run with: cargo test --test trader_tests

use std::sync::Once;

use rust_decimal_macros::dec;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use robinhood_rs::client::Endpoints;
use robinhood_rs::prelude::*;

const BTC_PAIR_ID: &str = "3d961844-d360-45fc-989b-f6fca761d511";

static INIT: Once = Once::new();

/// Initialize logging for tests
fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn config_for(server: &MockServer) -> ClientConfig {
    let endpoints = Endpoints::new(&server.uri(), &format!("{}/nummus/", server.uri())).unwrap();
    ClientConfig::default().with_endpoints(endpoints)
}

/// A client pointed at a fresh mock server, not logged in.
async fn setup() -> (MockServer, Trader) {
    init_logging();
    let server = MockServer::start().await;
    let trader = Trader::with_config(config_for(&server)).unwrap();
    (server, trader)
}

/// A client pointed at a fresh mock server, logged in.
async fn setup_authenticated() -> (MockServer, Trader) {
    let (server, trader) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-123",
            "refresh_token": "refresh-456",
            "expires_in": 603995,
            "token_type": "Bearer",
            "scope": "internal"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let outcome = trader.login("user", "pass").await.unwrap();
    assert!(outcome.is_authenticated());
    server.reset().await;

    (server, trader)
}

async fn mount_instrument(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/instruments/"))
        .and(query_param("symbol", "AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": "450dfc6d-5510-4d40-abfb-f633b7d9be3e",
                "url": format!("{}/instruments/450dfc6d-5510-4d40-abfb-f633b7d9be3e/", server.uri()),
                "symbol": "AAPL",
                "name": "Apple Inc. Common Stock",
                "tradeable": true,
                "type": "stock"
            }],
            "next": null
        })))
        .mount(server)
        .await;
}

async fn mount_equity_quote(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/quotes/"))
        .and(query_param("symbols", "AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "symbol": "AAPL",
                "bid_price": "99.900000",
                "ask_price": "100.000000",
                "last_trade_price": "99.950000",
                "previous_close": "98.000000",
                "trading_halted": false
            }]
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_account(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/accounts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "url": format!("{}/accounts/5QR12345/", server.uri()),
                "account_number": "5QR12345",
                "type": "margin",
                "cash": "1000.0000",
                "buying_power": "2000.0000"
            }]
        })))
        .mount(server)
        .await;
}

async fn mount_crypto_quote(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/marketdata/forex/quotes/{}/", BTC_PAIR_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": "BTCUSD",
            "id": BTC_PAIR_ID,
            "bid_price": "64999.000000",
            "ask_price": "65010.116000",
            "mark_price": "65004.558000",
            "high_price": "65500.000000",
            "low_price": "64000.000000",
            "open_price": "64200.000000",
            "volume": "0.000000"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_portfolio(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/portfolios/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "url": format!("{}/portfolios/5QR12345/", server.uri()),
                "account": format!("{}/accounts/5QR12345/", server.uri()),
                "account_id": "crypto-account-1",
                "equity": "1000.0000"
            }]
        })))
        .mount(server)
        .await;
}

fn equity_order_json(server: &MockServer, side: &str, trigger: &str) -> Value {
    json!({
        "id": "order-1",
        "url": format!("{}/orders/order-1/", server.uri()),
        "account": format!("{}/accounts/5QR12345/", server.uri()),
        "symbol": "AAPL",
        "side": side,
        "type": "market",
        "trigger": trigger,
        "time_in_force": "gfd",
        "quantity": "1.00000",
        "price": "100.00",
        "state": "unconfirmed",
        "cancel": format!("{}/orders/order-1/cancel/", server.uri()),
        "cumulative_quantity": "0.00000",
        "executions": []
    })
}

fn crypto_order_json(server: &MockServer) -> Value {
    json!({
        "id": "crypto-order-1",
        "account_id": "crypto-account-1",
        "currency_pair_id": BTC_PAIR_ID,
        "side": "buy",
        "type": "market",
        "time_in_force": "gtc",
        "quantity": "0.000500000000000000",
        "price": "65010.120000000000000000",
        "state": "unconfirmed",
        "cancel_url": format!("{}/nummus/orders/crypto-order-1/cancel/", server.uri()),
        "cumulative_quantity": "0.000000000000000000",
        "executions": []
    })
}

async fn posted_bodies(server: &MockServer, at: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == at)
        .map(|r| r.body_json::<Value>().unwrap())
        .collect()
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_login_without_challenge() {
    let (server, trader) = setup_authenticated().await;

    assert!(trader.is_authenticated().await);
    assert_eq!(
        trader.session().authorization().await.unwrap().expose_secret(),
        "Bearer access-123"
    );

    // The authorization header goes out with later requests.
    Mock::given(method("GET"))
        .and(path("/accounts/"))
        .and(header("authorization", "Bearer access-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"url": "https://example/accounts/1/", "account_number": "1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let account = trader.account().await.unwrap();
    assert_eq!(account.account_number, "1");
}

#[tokio::test]
async fn test_login_with_mfa_challenge_reuses_device_token() {
    let (server, trader) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token/"))
        .and(body_string_contains("challenge_type=sms"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "mfa_required": true,
            "mfa_type": "sms"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = trader.login("user", "pass").await.unwrap();
    let challenge = match outcome {
        LoginOutcome::ChallengeRequired(challenge) => challenge,
        other => panic!("expected a challenge, got {:?}", other),
    };
    assert_eq!(challenge.username(), "user");
    assert_eq!(challenge.mfa_type(), Some("sms"));
    assert!(!trader.is_authenticated().await);

    Mock::given(method("POST"))
        .and(path("/oauth2/token/"))
        .and(body_string_contains("mfa_code=123456"))
        .and(body_string_contains(format!(
            "device_token={}",
            challenge.device_token().as_str()
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-mfa",
            "refresh_token": "refresh-mfa"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = trader.complete_login(challenge, "123456").await.unwrap();
    assert!(outcome.is_authenticated());
    assert!(trader.is_authenticated().await);
}

#[tokio::test]
async fn test_login_rejected_is_not_an_error() {
    let (server, trader) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "detail": "Unable to log in with provided credentials."
        })))
        .mount(&server)
        .await;

    let outcome = trader.login("user", "wrong").await.unwrap();
    assert!(matches!(outcome, LoginOutcome::Rejected));
    assert!(!trader.is_authenticated().await);
}

#[tokio::test]
async fn test_login_http_failure_is_an_error() {
    let (server, trader) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Request was throttled."
        })))
        .mount(&server)
        .await;

    let err = trader.login("user", "pass").await.unwrap_err();
    match err {
        Error::Api { status, message, .. } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Request was throttled.");
        }
        other => panic!("expected an API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_logout_revokes_and_clears_tokens() {
    let (server, trader) = setup_authenticated().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/revoke_token/"))
        .and(body_string_contains("token=refresh-456"))
        .and(body_string_contains("client_id="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    trader.logout().await.unwrap();
    assert!(!trader.is_authenticated().await);
    assert!(trader.session().refresh_token().await.is_none());
}

#[tokio::test]
async fn test_logout_accepts_empty_revoke_response() {
    let (server, trader) = setup_authenticated().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/revoke_token/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    trader.logout().await.unwrap();
    assert!(!trader.is_authenticated().await);
}

#[tokio::test]
async fn test_logout_clears_tokens_even_when_revoke_fails() {
    let (server, trader) = setup_authenticated().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/revoke_token/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = trader.logout().await.unwrap_err();
    assert!(err.is_server_error());
    assert!(!trader.is_authenticated().await);
}

#[tokio::test]
async fn test_expired_token_surfaces_as_http_error() {
    let (server, trader) = setup_authenticated().await;

    Mock::given(method("GET"))
        .and(path("/positions/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Incorrect authentication credentials."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = trader.positions().await.unwrap_err();
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_save_and_load_session_round_trip() {
    let (server, trader) = setup_authenticated().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    trader.save_session(&file).await.unwrap();
    let restored = Trader::load_session_with_config(&file, config_for(&server))
        .await
        .unwrap();

    assert!(restored.is_authenticated().await);
    assert_eq!(
        restored.session().authorization().await.unwrap().expose_secret(),
        trader.session().authorization().await.unwrap().expose_secret()
    );
    assert_eq!(
        restored.session().access_token().await.unwrap().expose_secret(),
        "access-123"
    );
    assert_eq!(
        restored.session().refresh_token().await.unwrap().expose_secret(),
        "refresh-456"
    );
    assert_eq!(
        restored.session().default_headers().await,
        trader.session().default_headers().await
    );
}

// =============================================================================
// Market data
// =============================================================================

#[tokio::test]
async fn test_quote_routes_crypto_symbols_to_crypto_endpoint() {
    let (server, trader) = setup_authenticated().await;
    mount_crypto_quote(&server, 1).await;
    mount_equity_quote(&server, 0).await;

    let quote = trader.quote("btc").await.unwrap();
    assert!(quote.is_crypto());
    assert_eq!(quote.symbol(), "BTCUSD");
    assert_eq!(quote.ask(), dec!(65010.116));
    assert_eq!(quote.last(), Some(dec!(65004.558)));
}

#[tokio::test]
async fn test_quote_routes_equities_to_equity_endpoint() {
    let (server, trader) = setup_authenticated().await;
    mount_crypto_quote(&server, 0).await;
    mount_equity_quote(&server, 1).await;

    let quote = trader.quote("aapl").await.unwrap();
    assert!(!quote.is_crypto());
    assert_eq!(quote.bid(), dec!(99.9));
    assert_eq!(quote.ask(), dec!(100));
    assert_eq!(quote.as_equity().unwrap().previous_close(), Some(dec!(98)));
}

#[tokio::test]
async fn test_quote_unknown_symbol() {
    let (server, trader) = setup_authenticated().await;

    Mock::given(method("GET"))
        .and(path("/quotes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [null]})))
        .mount(&server)
        .await;

    let err = trader.quote("NOPE").await.unwrap_err();
    assert!(matches!(err, Error::InvalidSymbol(s) if s == "NOPE"));
}

#[tokio::test]
async fn test_instrument_lookup() {
    let (server, trader) = setup_authenticated().await;
    mount_instrument(&server).await;

    let instrument = trader.instrument("aapl").await.unwrap();
    assert_eq!(instrument.symbol, "AAPL");
    assert!(instrument.tradeable);
    assert_eq!(instrument.kind.as_deref(), Some("stock"));

    Mock::given(method("GET"))
        .and(path("/instruments/"))
        .and(query_param("symbol", "ZZZZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let err = trader.instrument("ZZZZ").await.unwrap_err();
    assert!(matches!(err, Error::InvalidSymbol(_)));
}

#[tokio::test]
async fn test_fundamentals() {
    let (server, trader) = setup_authenticated().await;

    Mock::given(method("GET"))
        .and(path("/fundamentals/AAPL/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "open": "170.000000",
            "high": "172.500000",
            "low": "169.100000",
            "market_cap": "2650000000000.000000",
            "pe_ratio": "28.500000",
            "description": "Apple Inc. designs consumer electronics.",
            "num_employees": 161000,
            "year_founded": 1976
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fundamentals = trader.fundamentals("aapl").await.unwrap();
    assert_eq!(fundamentals.high, Some(dec!(172.5)));
    assert_eq!(fundamentals.year_founded, Some(1976));
}

#[tokio::test]
async fn test_historical_quotes() {
    let (server, trader) = setup_authenticated().await;

    Mock::given(method("GET"))
        .and(path("/quotes/historicals/"))
        .and(query_param("symbols", "AAPL,MSFT"))
        .and(query_param("interval", "5minute"))
        .and(query_param("span", "day"))
        .and(query_param("bounds", "regular"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "symbol": "AAPL",
                "interval": "5minute",
                "span": "day",
                "bounds": "regular",
                "historicals": [{
                    "begins_at": "2024-03-01T14:30:00Z",
                    "open_price": "179.550000",
                    "close_price": "179.800000",
                    "high_price": "180.000000",
                    "low_price": "179.400000",
                    "volume": 1203311,
                    "session": "reg",
                    "interpolated": false
                }]
            }, {
                "symbol": "MSFT",
                "historicals": []
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let historicals = trader
        .historical_quotes(&["aapl", "msft"], Interval::FiveMinute, Span::Day, Bounds::Regular)
        .await
        .unwrap();

    assert_eq!(historicals.len(), 2);
    assert_eq!(historicals[0].historicals[0].close_price, dec!(179.8));
    assert!(historicals[1].historicals.is_empty());
}

#[tokio::test]
async fn test_historical_quotes_reject_crypto() {
    let (server, trader) = setup_authenticated().await;

    let err = trader
        .historical_quotes(&["AAPL", "ETH"], Interval::Day, Span::Year, Bounds::Regular)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unsupported(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_account_data() {
    let (server, trader) = setup_authenticated().await;
    mount_account(&server).await;
    mount_portfolio(&server).await;

    Mock::given(method("GET"))
        .and(path("/nummus/accounts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "crypto-account-1", "status": "active", "buying_power": "500.00"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dividends/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": "div-1",
                "amount": "1.25",
                "rate": "0.2500000000",
                "position": "5.00000000",
                "state": "paid",
                "payable_date": "2024-02-15"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/positions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "instrument": "https://api.robinhood.com/instruments/abc/",
                "quantity": "5.00000",
                "average_buy_price": "150.0000"
            }]
        })))
        .mount(&server)
        .await;

    let account = trader.account().await.unwrap();
    assert_eq!(account.account_number, "5QR12345");
    assert_eq!(account.buying_power, Some(dec!(2000)));

    let crypto = trader.crypto_account().await.unwrap();
    assert_eq!(crypto.id, "crypto-account-1");

    let portfolio = trader.portfolio().await.unwrap();
    assert_eq!(portfolio.account_id.as_deref(), Some("crypto-account-1"));

    let dividends = trader.dividends().await.unwrap();
    assert_eq!(dividends[0].amount, dec!(1.25));

    let positions = trader.positions().await.unwrap();
    assert_eq!(positions[0].cost_basis(), Some(dec!(750)));
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_list_and_fetch_orders() {
    let (server, trader) = setup_authenticated().await;
    let order = equity_order_json(&server, "buy", "immediate");

    Mock::given(method("GET"))
        .and(path("/orders/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [order.clone()]})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders/order-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order.clone()))
        .expect(3)
        .mount(&server)
        .await;

    let orders = trader.orders().await.unwrap();
    assert_eq!(orders.len(), 1);

    // By id, by a fetched order, and by raw JSON.
    let by_id = trader.order("order-1").await.unwrap();
    let by_order = trader.order(&orders[0]).await.unwrap();
    let by_json = trader.order(&json!({"id": "order-1"})).await.unwrap();

    assert_eq!(by_id, by_order);
    assert_eq!(by_order, by_json);
    assert_eq!(by_id.state(), OrderState::Unconfirmed);

    let err = trader.order(&json!({"state": "filled"})).await.unwrap_err();
    assert!(err.is_validation_error());
}

#[tokio::test]
async fn test_list_and_fetch_crypto_orders() {
    let (server, trader) = setup_authenticated().await;
    let order = crypto_order_json(&server);

    Mock::given(method("GET"))
        .and(path("/nummus/orders/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [order.clone()]})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/nummus/orders/crypto-order-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order))
        .expect(1)
        .mount(&server)
        .await;

    let orders = trader.crypto_orders().await.unwrap();
    let fetched = trader.crypto_order(&orders[0]).await.unwrap();
    assert_eq!(fetched.currency_pair_id(), Some(BTC_PAIR_ID));
    assert_eq!(fetched.trigger(), Trigger::Immediate);
}

#[tokio::test]
async fn test_equity_market_buy_uses_ask_as_price() {
    let (server, trader) = setup_authenticated().await;
    mount_instrument(&server).await;
    mount_equity_quote(&server, 1).await;
    mount_account(&server).await;

    Mock::given(method("POST"))
        .and(path("/orders/"))
        .and(header("content-type", "application/json"))
        .and(header("sec-fetch-mode", "cors"))
        .and(body_partial_json(json!({
            "account": format!("{}/accounts/5QR12345/", server.uri()),
            "instrument": format!("{}/instruments/450dfc6d-5510-4d40-abfb-f633b7d9be3e/", server.uri()),
            "symbol": "AAPL",
            "side": "buy",
            "type": "market",
            "trigger": "immediate",
            "time_in_force": "gfd",
            "price": "100.00",
            "extended_hours": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(equity_order_json(&server, "buy", "immediate")))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = trader
        .buy("aapl", dec!(1), OrderOptions::default())
        .await
        .unwrap();
    assert_eq!(ticket.id(), "order-1");
    assert!(!ticket.is_crypto());

    let body = &posted_bodies(&server, "/orders/").await[0];
    assert!(body.get("stop_price").is_none());
    assert!(body.get("trailing_peg").is_none());
}

#[tokio::test]
async fn test_equity_limit_order_skips_quote() {
    let (server, trader) = setup_authenticated().await;
    mount_instrument(&server).await;
    mount_equity_quote(&server, 0).await;
    mount_account(&server).await;

    Mock::given(method("POST"))
        .and(path("/orders/"))
        .and(body_partial_json(json!({
            "type": "limit",
            "price": "99.5",
            "time_in_force": "gtc",
            "extended_hours": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(equity_order_json(&server, "buy", "immediate")))
        .expect(1)
        .mount(&server)
        .await;

    trader
        .buy(
            "AAPL",
            dec!(1),
            OrderOptions::limit(dec!(99.5))
                .with_time_in_force(TimeInForce::Gtc)
                .with_extended_hours(true),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sell_trailing_stop_amount() {
    let (server, trader) = setup_authenticated().await;
    mount_instrument(&server).await;
    mount_equity_quote(&server, 1).await;
    mount_account(&server).await;

    Mock::given(method("POST"))
        .and(path("/orders/"))
        .and(body_partial_json(json!({
            "side": "sell",
            "trigger": "stop",
            "stop_price": "95.00",
            "trailing_peg": {
                "type": "price",
                "price": {"amount": "5", "currency_code": "USD"}
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(equity_order_json(&server, "sell", "stop")))
        .expect(1)
        .mount(&server)
        .await;

    trader
        .sell("AAPL", dec!(1), OrderOptions::default().with_trailing_stop_amount(dec!(5)))
        .await
        .unwrap();

    // Sell-side trailing stops carry no price.
    let body = &posted_bodies(&server, "/orders/").await[0];
    assert!(body.get("price").is_none());
}

#[tokio::test]
async fn test_buy_trailing_stop_amount() {
    let (server, trader) = setup_authenticated().await;
    mount_instrument(&server).await;
    mount_equity_quote(&server, 1).await;
    mount_account(&server).await;

    Mock::given(method("POST"))
        .and(path("/orders/"))
        .and(body_partial_json(json!({
            "side": "buy",
            "price": "100.00",
            "stop_price": "105.00"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(equity_order_json(&server, "buy", "stop")))
        .expect(1)
        .mount(&server)
        .await;

    trader
        .buy("AAPL", dec!(1), OrderOptions::default().with_trailing_stop_amount(dec!(5)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_buy_trailing_stop_percent() {
    let (server, trader) = setup_authenticated().await;
    mount_instrument(&server).await;
    mount_equity_quote(&server, 1).await;
    mount_account(&server).await;

    Mock::given(method("POST"))
        .and(path("/orders/"))
        .and(body_partial_json(json!({
            "stop_price": "110.00",
            "trailing_peg": {"type": "percentage", "percentage": 10}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(equity_order_json(&server, "buy", "stop")))
        .expect(1)
        .mount(&server)
        .await;

    trader
        .buy("AAPL", dec!(1), OrderOptions::default().with_trailing_stop_percent(10))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_mutually_exclusive_stops_send_nothing() {
    let (server, trader) = setup_authenticated().await;

    for symbol in ["AAPL", "BTC"] {
        for side in [Side::Buy, Side::Sell] {
            let request = OrderRequest::new(symbol, dec!(1), side).with_options(
                OrderOptions::default()
                    .with_stop_price(dec!(90))
                    .with_trailing_stop_percent(10),
            );
            let err = trader.place_order(request).await.unwrap_err();
            assert!(err.is_validation_error());
        }
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fractional_trailing_percent_rejected() {
    let (server, trader) = setup_authenticated().await;

    for symbol in ["AAPL", "BTC"] {
        let err = trader
            .sell(
                symbol,
                dec!(1),
                OrderOptions::default().with_trailing_stop_percent(dec!(10.5)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_crypto_extended_hours_rejected_before_any_request() {
    let (server, trader) = setup_authenticated().await;

    for extended in [false, true] {
        let err = trader
            .buy("BTC", dec!(0.001), OrderOptions::default().with_extended_hours(extended))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_crypto_market_buy() {
    let (server, trader) = setup_authenticated().await;
    mount_crypto_quote(&server, 1).await;
    mount_portfolio(&server).await;

    Mock::given(method("POST"))
        .and(path("/nummus/orders/"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "type": "market",
            "side": "buy",
            "quantity": "0.0005",
            "account_id": "crypto-account-1",
            "currency_pair_id": BTC_PAIR_ID,
            "price": "65010.12",
            "time_in_force": "gtc",
            "trigger": "immediate"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(crypto_order_json(&server)))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = trader
        .buy("btc", dec!(0.0005), OrderOptions::default())
        .await
        .unwrap();
    assert!(ticket.is_crypto());
    assert_eq!(ticket.as_crypto().unwrap().account_id(), Some("crypto-account-1"));

    let body = &posted_bodies(&server, "/nummus/orders/").await[0];
    let ref_id = body["ref_id"].as_str().unwrap();
    assert_eq!(ref_id.len(), 32);
    assert!(body.get("stop_price").is_none());
    assert!(body.get("extended_hours").is_none());
}

#[tokio::test]
async fn test_crypto_limit_price_formatted() {
    let (server, trader) = setup_authenticated().await;
    mount_crypto_quote(&server, 0).await;
    mount_portfolio(&server).await;

    Mock::given(method("POST"))
        .and(path("/nummus/orders/"))
        .and(body_partial_json(json!({"type": "limit", "price": "60000.00"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(crypto_order_json(&server)))
        .expect(1)
        .mount(&server)
        .await;

    trader
        .sell("BTC", dec!(0.0005), OrderOptions::limit(dec!(60000)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_crypto_rejects_day_orders() {
    let (server, trader) = setup_authenticated().await;

    let err = trader
        .buy("ETH", dec!(1), OrderOptions::default().with_time_in_force(TimeInForce::Gfd))
        .await
        .unwrap_err();
    assert!(err.is_validation_error());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_without_link_sends_nothing() {
    let (server, trader) = setup_authenticated().await;

    let err = trader
        .cancel(&json!({"id": "order-1", "state": "filled"}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingCancelUrl));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_accepts_either_link_name() {
    let (server, trader) = setup_authenticated().await;

    Mock::given(method("POST"))
        .and(path("/orders/order-1/cancel/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/nummus/orders/crypto-order-1/cancel/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    trader
        .cancel(&json!({"cancel": format!("{}/orders/order-1/cancel/", server.uri())}))
        .await
        .unwrap();
    trader
        .cancel(&json!({
            "cancel_url": format!("{}/nummus/orders/crypto-order-1/cancel/", server.uri())
        }))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_ticket_cancel_and_refresh() {
    let (server, trader) = setup_authenticated().await;
    mount_instrument(&server).await;
    mount_account(&server).await;

    Mock::given(method("POST"))
        .and(path("/orders/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(equity_order_json(&server, "buy", "immediate")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/orders/order-1/cancel/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cancelled = equity_order_json(&server, "buy", "immediate");
    cancelled["state"] = json!("cancelled");
    cancelled["cancel"] = Value::Null;

    Mock::given(method("GET"))
        .and(path("/orders/order-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cancelled))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = trader
        .buy("AAPL", dec!(1), OrderOptions::limit(dec!(100)))
        .await
        .unwrap();
    assert_eq!(ticket.cancel_url().map(|u| u.ends_with("/orders/order-1/cancel/")), Some(true));

    ticket.cancel().await.unwrap();

    let refreshed = ticket.refresh().await.unwrap();
    assert_eq!(refreshed.state(), OrderState::Canceled);
    assert!(refreshed.is_terminal());

    // A terminal order has no link left to follow.
    let err = refreshed.cancel().await.unwrap_err();
    assert!(matches!(err, Error::MissingCancelUrl));
}

#[tokio::test]
async fn test_order_placement_failure_is_reported() {
    let (server, trader) = setup_authenticated().await;
    mount_instrument(&server).await;
    mount_account(&server).await;

    Mock::given(method("POST"))
        .and(path("/orders/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["Not enough buying power."]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = trader
        .buy("AAPL", dec!(1000), OrderOptions::limit(dec!(100)))
        .await
        .unwrap_err();
    match err {
        Error::Api { status, message, .. } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Not enough buying power.");
        }
        other => panic!("expected an API error, got {:?}", other),
    }
}
