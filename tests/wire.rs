// Wire-level tests: drive the real reqwest transport against a wiremock
// server to pin down the exact headers and JSON bodies Pocket expects.
// The client is blocking, so every call runs inside `spawn_blocking` on a
// multi-thread runtime while the mock server serves from the async side.

use pocketctl::api::{PocketClient, PocketTransport};
use pocketctl::store::{self, FileStore, PropertyStore};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_store(name: &str) -> FileStore {
    let path = std::env::temp_dir().join(format!(
        "pocketctl-wire-{}-{}.json",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    FileStore::new(path)
}

fn client_against(uri: String, props: FileStore) -> PocketClient {
    PocketClient::new(
        uri,
        Box::new(PocketTransport::new().unwrap()),
        Box::new(props),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn request_token_call_carries_the_pocket_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/oauth/request"))
        .and(header("content-type", "application/json; charset=UTF-8"))
        .and(header("x-accept", "application/json"))
        .and(body_json(json!({
            "consumer_key": "ck",
            "redirect_uri": "https://example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "R1"})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let auth_url = tokio::task::spawn_blocking(move || {
        let props = temp_store("headers");
        props.set(store::CONSUMER_KEY, "ck").unwrap();
        client_against(uri, props).begin_authorization()
    })
    .await
    .unwrap()
    .unwrap();

    assert!(auth_url.contains("request_token=R1"), "got: {}", auth_url);
}

#[tokio::test(flavor = "multi_thread")]
async fn the_full_authorization_dance_ends_with_a_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/oauth/request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "R1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/oauth/authorize"))
        .and(body_json(json!({"consumer_key": "ck", "code": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "A1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/get"))
        .and(body_json(json!({
            "consumer_key": "ck",
            "access_token": "A1",
            "detailType": "complete"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (request_token, access_token, saved) = tokio::task::spawn_blocking(move || {
        let props = temp_store("dance");
        props.set(store::CONSUMER_KEY, "ck").unwrap();
        let client = client_against(uri, props.clone());
        client.begin_authorization().unwrap();
        client.complete_authorization().unwrap();
        let saved = client.fetch_saved().unwrap();
        (
            props.get(store::REQUEST_TOKEN).unwrap(),
            props.get(store::ACCESS_TOKEN).unwrap(),
            saved,
        )
    })
    .await
    .unwrap();

    assert_eq!(request_token.as_deref(), Some("R1"));
    assert_eq!(access_token.as_deref(), Some("A1"));
    assert_eq!(saved, json!({"list": {}}));
}

#[tokio::test(flavor = "multi_thread")]
async fn a_rejected_call_surfaces_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/get"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        let props = temp_store("rejected");
        props.set(store::CONSUMER_KEY, "ck").unwrap();
        props.set(store::ACCESS_TOKEN, "A1").unwrap();
        client_against(uri, props).fetch_saved().unwrap_err()
    })
    .await
    .unwrap();

    let msg = format!("{:#}", err);
    assert!(msg.contains("403"), "got: {}", msg);
    assert!(msg.contains("forbidden"), "got: {}", msg);
}
