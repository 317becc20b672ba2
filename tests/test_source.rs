//! HTTP data source tests against a throwaway local server.
//!
//! Each test binds a `TcpListener` on an ephemeral port, answers a fixed
//! number of connections with canned responses, and reports the request
//! lines it saw.

mod common;

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use common::SAMPLE_JSON;
use sales_dashboard::{
    DashboardError, DataSource, Region, RemoteQuery, SalesDashboard, SalesFilter,
};

struct LocalApi {
    base_url: String,
    requests: mpsc::Receiver<String>,
}

/// Read the request head and return its first line.
fn read_request_line(stream: &mut TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut first = String::new();
    reader.read_line(&mut first).unwrap();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
            break;
        }
    }
    first.trim_end().to_string()
}

fn respond(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = if status == 200 { "OK" } else { "Internal Server Error" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).unwrap();
}

/// Answer one connection per entry of `responses`, in order.
fn serve(responses: Vec<(u16, &'static str)>) -> LocalApi {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let line = read_request_line(&mut stream);
            let _ = tx.send(line);
            respond(&mut stream, status, body);
        }
    });
    LocalApi {
        base_url: format!("http://{addr}/produtos"),
        requests: rx,
    }
}

fn dashboard_for(api: &LocalApi) -> SalesDashboard {
    SalesDashboard::builder()
        .base_url(&api.base_url)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

fn next_request(api: &LocalApi) -> String {
    api.requests.recv_timeout(Duration::from_secs(5)).unwrap()
}

// ---------------------------------------------------------------------------
// Query string
// ---------------------------------------------------------------------------

#[test]
fn region_and_year_are_sent_as_query_params() {
    let api = serve(vec![(200, SAMPLE_JSON)]);
    let dash = dashboard_for(&api);

    let data = dash
        .fetch(&RemoteQuery::new(Region::CentroOeste, Some(2021)))
        .unwrap();

    assert_eq!(
        next_request(&api),
        "GET /produtos?regiao=centro-oeste&ano=2021 HTTP/1.1"
    );
    assert_eq!(data.records().count(&SalesFilter::default()).unwrap(), 6);
}

#[test]
fn wildcards_are_sent_as_empty_values() {
    let api = serve(vec![(200, "[]")]);
    let dash = dashboard_for(&api);

    let data = dash.fetch(&RemoteQuery::default()).unwrap();

    assert_eq!(next_request(&api), "GET /produtos?regiao=&ano= HTTP/1.1");
    assert_eq!(data.records().count(&SalesFilter::default()).unwrap(), 0);
}

#[test]
fn out_of_range_year_fails_before_any_request() {
    let api = serve(vec![]);
    let dash = dashboard_for(&api);

    let err = dash
        .fetch(&RemoteQuery::new(Region::Sul, Some(2019)))
        .unwrap_err();

    assert!(matches!(err, DashboardError::InvalidArgument(_)));
    assert!(api.requests.recv_timeout(Duration::from_millis(200)).is_err());
}

// ---------------------------------------------------------------------------
// Error responses
// ---------------------------------------------------------------------------

#[test]
fn server_error_status_is_an_http_error() {
    let api = serve(vec![(500, r#"{"detail": "boom"}"#)]);
    let dash = dashboard_for(&api);

    let err = dash.fetch(&RemoteQuery::default()).unwrap_err();

    assert!(matches!(err, DashboardError::Http(_)), "got {err:?}");
    next_request(&api);
}

#[test]
fn non_array_body_is_invalid_data() {
    let api = serve(vec![(200, r#"{"detail": "not found"}"#)]);
    let source = DataSource::new(Some(api.base_url.clone()), Duration::from_secs(5)).unwrap();

    let err = source.fetch(&RemoteQuery::default()).unwrap_err();

    assert!(matches!(err, DashboardError::InvalidData(_)), "got {err:?}");
}

#[test]
fn unreachable_endpoint_is_an_http_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let dash = SalesDashboard::builder()
        .base_url(format!("http://{addr}/produtos"))
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let err = dash.fetch(&RemoteQuery::default()).unwrap_err();
    assert!(matches!(err, DashboardError::Http(_)), "got {err:?}");
}

// ---------------------------------------------------------------------------
// Sharing across threads
// ---------------------------------------------------------------------------

#[test]
fn dashboard_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SalesDashboard>();
    assert_send_sync::<DataSource>();
}

#[test]
fn fetches_from_two_threads_overlap() {
    // The server holds the first request open until the second arrives, so
    // this only completes if both fetches are in flight together.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut first, _) = listener.accept().unwrap();
        read_request_line(&mut first);
        let (mut second, _) = listener.accept().unwrap();
        read_request_line(&mut second);
        respond(&mut first, 200, SAMPLE_JSON);
        respond(&mut second, 200, "[]");
    });

    let dash = SalesDashboard::builder()
        .base_url(format!("http://{addr}/produtos"))
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    let dash = &dash;
    let mut counts: Vec<usize> = thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                s.spawn(move || {
                    dash.fetch(&RemoteQuery::default())
                        .and_then(|d| d.records().count(&SalesFilter::default()))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    });

    counts.sort_unstable();
    assert_eq!(counts, vec![0, 6]);
}
