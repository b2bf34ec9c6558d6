use futures::executor::block_on;

use super::fixture::{record_json, StubTransport};
use crate::fetch::{DataFetcher, Outcome, TransportError};

const BASE: &str = "http://localhost:8000/";

fn fetch_with(transport: StubTransport, name: &str) -> (Outcome, Vec<(String, u32)>) {
    let fetcher = DataFetcher::new(transport, BASE, 10_000);
    let outcome = block_on(fetcher.fetch(name));
    let requests = fetcher_requests(&fetcher);
    (outcome, requests)
}

fn fetcher_requests(fetcher: &DataFetcher<StubTransport>) -> Vec<(String, u32)> {
    fetcher.transport().requests.borrow().clone()
}

#[test]
fn test_request_url_and_timeout() {
    let (_, requests) = fetch_with(StubTransport::new().respond(404, ""), "Jane A. Doe");
    assert_eq!(
        requests,
        vec![("http://localhost:8000/professor?name=Jane%20A%2E%20Doe".to_string(), 10_000)]
    );
}

#[test]
fn test_success() {
    let body = record_json("Jane Doe", 4.2, 2);
    let (outcome, _) = fetch_with(StubTransport::new().respond(200, &body), "Jane Doe");
    match outcome {
        Outcome::Success(record) => {
            assert_eq!(record.name, "Jane Doe");
            assert_eq!(record.rating, Some(4.2));
            assert_eq!(record.reviews.len(), 2);
            assert_eq!(record.reviews[0].text, "Review number 1");
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[test]
fn test_status_classification() {
    let cases = [
        (404, "{\"detail\":\"Professor not found\"}", Outcome::NotFound),
        (500, "{\"detail\":\"boom\"}", Outcome::ServerError),
        (
            400,
            "{\"detail\":\"Professor name is required\"}",
            Outcome::GenericError("HTTP 400: Professor name is required".into()),
        ),
        (502, "<html>Bad Gateway</html>", Outcome::GenericError("HTTP 502".into())),
    ];
    for (status, body, expected) in cases {
        let (outcome, _) = fetch_with(StubTransport::new().respond(status, body), "Jane Doe");
        assert_eq!(outcome, expected, "status {}", status);
    }
}

#[test]
fn test_timeout_and_network_failure() {
    let (outcome, _) = fetch_with(StubTransport::new().fail(TransportError::TimedOut(10_000)), "Jane Doe");
    assert_eq!(outcome, Outcome::Timeout);

    let (outcome, _) = fetch_with(
        StubTransport::new().fail(TransportError::Network("Failed to fetch".into())),
        "Jane Doe",
    );
    assert_eq!(outcome, Outcome::NetworkFailure);
}

#[test]
fn test_malformed_success_bodies() {
    for body in ["{}", "[]", "not json", "{\"name\":\"Jane Doe\",\"reviews\":{}}"] {
        let (outcome, _) = fetch_with(StubTransport::new().respond(200, body), "Jane Doe");
        assert!(
            matches!(outcome, Outcome::MalformedResponse(_)),
            "{:?} -> {:?}",
            body,
            outcome
        );
    }
}

#[test]
fn test_loose_success_body_falls_back_to_requested_name() {
    let body = r#"{"rating": "3.9", "reviews": [{"text": "Fair grader"}, {"rating": 2}]}"#;
    let (outcome, _) = fetch_with(StubTransport::new().respond(200, body), " Jane Doe ");
    match outcome {
        Outcome::Success(record) => {
            assert_eq!(record.name, "Jane Doe");
            assert_eq!(record.rating, Some(3.9));
            assert_eq!(record.reviews.len(), 1);
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[test]
fn test_health_check() {
    let transport = StubTransport::new().respond(
        200,
        r#"{"status":"healthy","school":"University of Washington Tacoma","claude_configured":true}"#,
    );
    let fetcher = DataFetcher::new(transport, BASE, 5_000);

    let health = block_on(fetcher.check_health()).unwrap();
    assert!(health.is_healthy());
    assert!(health.claude_configured);
    assert_eq!(health.school.as_deref(), Some("University of Washington Tacoma"));
    assert_eq!(fetcher_requests(&fetcher)[0].0, "http://localhost:8000/health");
}

#[test]
fn test_health_check_reports_failures() {
    let fetcher = DataFetcher::new(StubTransport::new().respond(503, ""), BASE, 5_000);
    assert_eq!(
        block_on(fetcher.check_health()),
        Err("health check returned HTTP 503".to_string())
    );

    let fetcher = DataFetcher::new(StubTransport::new(), BASE, 5_000);
    assert!(block_on(fetcher.check_health()).is_err());
}
