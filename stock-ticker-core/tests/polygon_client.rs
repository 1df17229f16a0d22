//! Integration tests for the Polygon client against a one-shot local HTTP stub.

use chrono::NaiveDate;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use stock_ticker_core::{
    ConnectorSettings, Credentials, MarketDataProvider, PolygonClient, QueryWindow,
    UpstreamError,
};

// ── Helpers ──────────────────────────────────────────────────────────

/// Serve exactly one HTTP response and hand back the request line.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut header = String::new();
            let n = reader.read_line(&mut header).unwrap();
            if n == 0 || header == "\r\n" {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request_line
    });

    (format!("http://{addr}"), handle)
}

fn client_for(base_url: &str) -> PolygonClient {
    let settings = ConnectorSettings {
        api_base_url: base_url.to_string(),
        ..Default::default()
    };
    let http = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    PolygonClient::with_http_client(http, &settings)
}

fn creds() -> Credentials<'static> {
    Credentials {
        stock_ticker: "AAPL",
        api_key: "k",
    }
}

fn window() -> QueryWindow {
    QueryWindow::trailing(NaiveDate::from_ymd_opt(2023, 11, 20).unwrap())
}

// ── Tests ────────────────────────────────────────────────────────────

#[test]
fn fetches_closes_in_upstream_order() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"ticker":"AAPL","results":[{"t":1700000000000,"c":123.45},{"t":1700086400000,"c":124.0}]}"#,
    );

    let closes = client_for(&base).daily_closes(&creds(), window()).unwrap();
    let request_line = server.join().unwrap();

    assert_eq!(closes.len(), 2);
    assert_eq!(closes[0].timestamp_ms, 1_700_000_000_000);
    assert_eq!(closes[0].close, 123.45);
    assert_eq!(closes[1].close, 124.0);

    assert!(request_line.starts_with("GET /v2/aggs/ticker/AAPL/range/1/day/2023-11-13/2023-11-20?"));
    assert!(request_line.contains("sort=asc"));
    assert!(request_line.contains("limit=120"));
    assert!(request_line.contains("apiKey=k"));
}

#[test]
fn reserved_characters_in_ticker_stay_in_path() {
    let (base, server) = serve_once("200 OK", r#"{"results":[]}"#);
    let ticker = Credentials {
        stock_ticker: "BRK#B",
        api_key: "k",
    };

    client_for(&base).daily_closes(&ticker, window()).unwrap();
    let request_line = server.join().unwrap();

    assert!(request_line
        .starts_with("GET /v2/aggs/ticker/BRK%23B/range/1/day/2023-11-13/2023-11-20?"));
    assert!(request_line.contains("apiKey=k"));
}

#[test]
fn query_characters_in_ticker_do_not_move_the_window() {
    let (base, server) = serve_once("200 OK", r#"{"results":[]}"#);
    let ticker = Credentials {
        stock_ticker: "AAPL?x=1",
        api_key: "k",
    };

    client_for(&base).probe(&ticker, window()).unwrap();
    let request_line = server.join().unwrap();

    assert!(request_line
        .starts_with("GET /v2/aggs/ticker/AAPL%3Fx=1/range/1/day/2023-11-13/2023-11-20?sort=asc"));
}

#[test]
fn empty_window_yields_no_closes() {
    let (base, server) = serve_once("200 OK", r#"{"ticker":"AAPL","resultsCount":0}"#);
    let closes = client_for(&base).daily_closes(&creds(), window()).unwrap();
    server.join().unwrap();
    assert!(closes.is_empty());
}

#[test]
fn forbidden_maps_to_forbidden() {
    let (base, server) = serve_once("403 Forbidden", r#"{"status":"NOT_AUTHORIZED"}"#);
    let result = client_for(&base).probe(&creds(), window());
    server.join().unwrap();
    assert!(matches!(result, Err(UpstreamError::Forbidden)));
}

#[test]
fn other_status_is_reported_with_code() {
    let (base, server) = serve_once("500 Internal Server Error", "{}");
    let result = client_for(&base).daily_closes(&creds(), window());
    server.join().unwrap();
    match result {
        Err(UpstreamError::Status { status }) => assert_eq!(status, 500),
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[test]
fn probe_ignores_body() {
    let (base, server) = serve_once("200 OK", "not json at all");
    let result = client_for(&base).probe(&creds(), window());
    server.join().unwrap();
    assert!(result.is_ok());
}

#[test]
fn malformed_body_fails_fetch() {
    let (base, server) = serve_once("200 OK", r#"{"results":[{"t":"yesterday"}]}"#);
    let result = client_for(&base).daily_closes(&creds(), window());
    server.join().unwrap();
    assert!(matches!(
        result,
        Err(UpstreamError::ResponseFormatChanged(_))
    ));
}

#[test]
fn refused_connection_is_network_error() {
    // Reserve a port, then close it so nothing is listening.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = client_for(&format!("http://127.0.0.1:{port}")).probe(&creds(), window());
    match result {
        Err(UpstreamError::Network(msg)) => assert!(!msg.contains("apiKey")),
        other => panic!("expected Network error, got: {other:?}"),
    }
}
