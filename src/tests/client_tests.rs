// src/tests/client_tests.rs
use crate::client::{ApartmentScraperClient, ClientError, JobState, ScrapeRequest};
use crate::tests::utils::{blocking, status_body};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn start_scrape_omits_filters_when_absent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scrape/start"))
        .and(body_json(json!({ "city": "austin", "state": "tx", "maxPages": 2 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "jobId": "job-1", "status": "pending" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let started = blocking(move || {
        let client = ApartmentScraperClient::new(&uri, None)?;
        client.start_scrape(&ScrapeRequest::new("austin", "tx").with_max_pages(2))
    })
    .await
    .unwrap();

    assert_eq!(started["jobId"], "job-1");
    assert_eq!(started["status"], "pending");
}

#[tokio::test(flavor = "multi_thread")]
async fn start_scrape_sends_filters_when_present() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scrape/start"))
        .and(body_json(json!({
            "city": "atlanta",
            "state": "ga",
            "maxPages": 3,
            "filters": { "minPrice": 1000, "maxPrice": 3000, "beds": [1, 2] }
        })))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({ "jobId": "job-2", "status": "pending" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let started = blocking(move || {
        let client = ApartmentScraperClient::new(&uri, None)?;
        let request = ScrapeRequest::new("atlanta", "ga")
            .with_max_pages(3)
            .filter("minPrice", 1000)
            .filter("maxPrice", 3000)
            .filter("beds", json!([1, 2]));
        client.start_scrape(&request)
    })
    .await
    .unwrap();

    assert_eq!(started["jobId"], "job-2");
}

#[tokio::test(flavor = "multi_thread")]
async fn api_key_is_sent_as_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/scrape/status/job-3"))
        .and(header("Authorization", "Bearer secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("job-3", "pending", None)))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let status = blocking(move || {
        let client = ApartmentScraperClient::new(&uri, Some("secret-key"))?;
        client.get_status("job-3")
    })
    .await
    .unwrap();

    assert_eq!(status.status, JobState::Pending);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_status_decodes_every_field() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/scrape/status/job-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobId": "job-4",
            "status": "failed",
            "progress": { "currentPage": 2, "totalPages": 5, "listingsScraped": 41 },
            "createdAt": "2024-05-01T12:00:00Z",
            "updatedAt": "2024-05-01T12:03:00Z",
            "completedAt": "2024-05-01T12:03:00Z",
            "error": "blocked by site"
        })))
        .mount(&server)
        .await;

    // Trailing slash on the base URL must not produce `//api/...`.
    let uri = format!("{}/", server.uri());
    let status = blocking(move || ApartmentScraperClient::new(&uri, None)?.get_status("job-4"))
        .await
        .unwrap();

    assert_eq!(status.job_id, "job-4");
    assert_eq!(status.status, JobState::Failed);
    assert_eq!(status.progress.current_page, 2);
    assert_eq!(status.progress.total_pages, 5);
    assert_eq!(status.progress.listings_scraped, 41);
    assert_eq!(status.completed_at.as_deref(), Some("2024-05-01T12:03:00Z"));
    assert_eq!(status.error.as_deref(), Some("blocked by site"));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_results_returns_raw_payload() {
    let server = MockServer::start().await;
    let payload = json!({
        "jobId": "job-5",
        "results": [{ "propertyName": "Elm Court", "unexpected": true }],
        "metadata": { "pages": 1 }
    });

    Mock::given(method("GET"))
        .and(path("/api/scrape/results/job-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let uri = server.uri();
    let results = blocking(move || ApartmentScraperClient::new(&uri, None)?.get_results("job-5"))
        .await
        .unwrap();

    assert_eq!(results, payload);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_job_posts_and_returns_confirmation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scrape/cancel/job-6"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Job cancelled" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let confirmation = blocking(move || ApartmentScraperClient::new(&uri, None)?.cancel_job("job-6"))
        .await
        .unwrap();

    assert_eq!(confirmation["message"], "Job cancelled");
}

#[tokio::test(flavor = "multi_thread")]
async fn non_success_status_surfaces_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/scrape/status/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || ApartmentScraperClient::new(&uri, None)?.get_status("missing"))
        .await
        .unwrap_err();

    match err {
        ClientError::Http(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(404)),
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_on_start_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scrape/start"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || {
        ApartmentScraperClient::new(&uri, None)?.start_scrape(&ScrapeRequest::new("denver", "co"))
    })
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::Http(_)));
}
