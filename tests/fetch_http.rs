// tests/fetch_http.rs
//
// HttpFetcher against a local mock server: status handling, suggestion
// pages served with 404, timeouts.
//
use std::time::Duration;

use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bestiary_scrape::config::consts::USER_AGENT;
use bestiary_scrape::{Fetch, FetchError, HttpFetcher};

const SUGGESTION: &str = include_str!("fixtures/suggestion.html");

/// Mock server answering `GET /page` with `template`. The fetcher runs
/// outside the runtime: the blocking client must not be driven from async code.
fn serve(rt: &Runtime, template: ResponseTemplate) -> MockServer {
    rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    })
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(5)).unwrap()
}

#[test]
fn success_returns_body() {
    let rt = Runtime::new().unwrap();
    let server = serve(&rt, ResponseTemplate::new(200).set_body_string("<p>goblin</p>"));

    let body = fetcher().get(&format!("{}/page", server.uri())).unwrap();
    assert_eq!(body, "<p>goblin</p>");

    let received = rt.block_on(server.received_requests()).unwrap();
    assert_eq!(received.len(), 1);
    let agent = received[0].headers.get("user-agent").and_then(|v| v.to_str().ok());
    assert_eq!(agent, Some(USER_AGENT));
}

#[test]
fn not_found_with_suggestion_is_an_answer() {
    let rt = Runtime::new().unwrap();
    let server = serve(&rt, ResponseTemplate::new(404).set_body_string(SUGGESTION));

    let body = fetcher().get(&format!("{}/page", server.uri())).unwrap();
    assert!(body.contains("possible match"));
}

#[test]
fn error_statuses_fail_with_the_code() {
    let rt = Runtime::new().unwrap();
    for code in [404u16, 500] {
        let server = serve(&rt, ResponseTemplate::new(code).set_body_string("<h1>Oops</h1>"));
        let url = format!("{}/page", server.uri());

        match fetcher().get(&url) {
            Err(FetchError::Status { url: failed, status }) => {
                assert_eq!(status, code);
                assert_eq!(failed, url);
            }
            other => panic!("expected status error for {code}, got {other:?}"),
        }
    }
}

#[test]
fn slow_server_times_out() {
    let rt = Runtime::new().unwrap();
    let server = serve(
        &rt,
        ResponseTemplate::new(200).set_body_string("late").set_delay(Duration::from_secs(3)),
    );

    let mut slow = HttpFetcher::new(Duration::from_millis(300)).unwrap();
    let err = slow.get(&format!("{}/page", server.uri())).unwrap_err();
    assert!(matches!(err, FetchError::Timeout(t) if t == Duration::from_millis(300)));
}
