use linkpreview_http::{HttpClient, HttpError, RequestOpts};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_page_returns_body_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header("accept-language", "en-US,en;q=0.9"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string("<html><title>Hello</title></html>"),
        )
        .mount(&server)
        .await;

    let client = HttpClient::browser_like().unwrap();
    let page = client
        .get_page(&format!("{}/article", server.uri()), RequestOpts::default())
        .await
        .expect("page fetch");

    assert_eq!(page.status.as_u16(), 200);
    assert!(page.body.contains("<title>Hello</title>"));
    assert_eq!(
        page.content_type.as_deref(),
        Some("text/html; charset=utf-8")
    );
    assert_eq!(page.final_url.path(), "/article");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let client = HttpClient::browser_like().unwrap();
    let err = client
        .get_page(&format!("{}/gone", server.uri()), RequestOpts::default())
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert!(matches!(err, HttpError::Status { .. }));
}

#[tokio::test]
async fn retries_server_errors_when_budgeted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = HttpClient::browser_like().unwrap().with_retries(1);
    let page = client
        .get_page(&format!("{}/flaky", server.uri()), RequestOpts::default())
        .await
        .expect("second attempt succeeds");
    assert_eq!(page.body, "ok");
}

#[tokio::test]
async fn single_attempt_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::browser_like().unwrap();
    let result = client
        .get_page(&format!("{}/down", server.uri()), RequestOpts::default())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn get_bytes_returns_raw_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .mount(&server)
        .await;

    let client = HttpClient::browser_like().unwrap();
    let bytes = client
        .get_bytes(&format!("{}/img.png", server.uri()), RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn exists_requires_exactly_200() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/moved.ico"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = HttpClient::browser_like().unwrap();
    let timeout = Duration::from_secs(5);
    assert!(client.exists(&format!("{}/favicon.ico", server.uri()), timeout).await);
    assert!(!client.exists(&format!("{}/moved.ico", server.uri()), timeout).await);
    assert!(!client.exists(&format!("{}/missing.ico", server.uri()), timeout).await);
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = HttpClient::browser_like()
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let err = client
        .get_page(&format!("{}/slow", server.uri()), RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Timeout(_) | HttpError::Network(_)));
}

#[tokio::test]
async fn get_page_honours_declared_charset() {
    let server = MockServer::start().await;
    let mut body = b"<html><title>Caf".to_vec();
    body.push(0xE9);
    body.extend_from_slice(b"</title></html>");
    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=iso-8859-1"),
        )
        .mount(&server)
        .await;

    let client = HttpClient::browser_like().unwrap();
    let page = client
        .get_page(&format!("{}/latin1", server.uri()), RequestOpts::default())
        .await
        .unwrap();
    assert!(page.body.contains("<title>Café</title>"), "{}", page.body);
    assert!(!page.body.contains('\u{FFFD}'));
}

#[tokio::test]
async fn get_bytes_asks_for_an_image() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hero.jpg"))
        .and(header("sec-fetch-dest", "image"))
        .and(header("sec-fetch-mode", "no-cors"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::browser_like().unwrap();
    let bytes = client
        .get_bytes(&format!("{}/hero.jpg", server.uri()), RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);
}
