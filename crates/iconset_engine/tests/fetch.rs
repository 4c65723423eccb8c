use std::time::Duration;

use iconset_engine::{FetchError, FetchSettings, Fetcher, ReqwestFetcher, IPHONE_UA};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).expect("client builds")
}

async fn redirect(server: &MockServer, from: &str, to: &str) {
    Mock::given(method("GET"))
        .and(path(from))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}{to}", server.uri())),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn homepage_is_requested_with_mobile_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>hi</html>", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = fetcher(FetchSettings::for_documents())
        .fetch(&server.uri())
        .await
        .expect("homepage");

    assert_eq!(output.metadata.requested_url, server.uri());
    assert_eq!(output.metadata.status, 200);
    assert_eq!(output.metadata.mime_essence().as_deref(), Some("text/html"));
    assert_eq!(output.bytes, b"<html>hi</html>");

    // The Safari agent contains commas, so compare the raw header value.
    let received = server.received_requests().await.expect("recording enabled");
    let agent = received[0]
        .headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok());
    assert_eq!(agent, Some(IPHONE_UA));
}

#[tokio::test]
async fn redirect_chain_ends_at_final_url() {
    let server = MockServer::start().await;
    redirect(&server, "/", "/en/").await;
    Mock::given(method("GET"))
        .and(path("/en/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let output = fetcher(FetchSettings::for_documents())
        .fetch(&server.uri())
        .await
        .expect("redirected homepage");
    assert_eq!(output.metadata.final_url, format!("{}/en/", server.uri()));
}

#[tokio::test]
async fn long_redirect_chains_are_cut_off() {
    let server = MockServer::start().await;
    redirect(&server, "/a", "/b").await;
    redirect(&server, "/b", "/c").await;
    redirect(&server, "/c", "/d").await;
    redirect(&server, "/d", "/e").await;

    let settings = FetchSettings {
        redirect_limit: 2,
        ..FetchSettings::for_assets()
    };
    let err = fetcher(settings)
        .fetch(&format!("{}/a", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::TooManyRedirects { limit: 2 });
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher(FetchSettings::for_assets())
        .fetch(&format!("{}/favicon.ico", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::Status(404));
}

#[tokio::test]
async fn slow_server_hits_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_string("late"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings::for_assets().with_request_timeout(Duration::from_millis(50));
    let err = fetcher(settings).fetch(&server.uri()).await.unwrap_err();
    assert_eq!(err, FetchError::Timeout);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 64], "image/png"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 32,
        ..FetchSettings::for_assets()
    };
    let err = fetcher(settings).fetch(&server.uri()).await.unwrap_err();
    assert_eq!(err, FetchError::TooLarge { limit: 32 });
}

#[tokio::test]
async fn documents_reject_images_that_assets_accept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/icon.svg"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<svg/>", "image/svg+xml; charset=utf-8"),
        )
        .mount(&server)
        .await;
    let url = format!("{}/icon.svg", server.uri());

    let err = fetcher(FetchSettings::for_documents())
        .fetch(&url)
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::ContentType("image/svg+xml".to_string()));

    let output = fetcher(FetchSettings::for_assets())
        .fetch(&url)
        .await
        .expect("asset");
    assert_eq!(output.bytes, b"<svg/>");
}

#[tokio::test]
async fn unparsable_url_is_rejected_before_any_request() {
    let err = fetcher(FetchSettings::default())
        .fetch("not a url")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl { ref url, .. } if url == "not a url"));
}
