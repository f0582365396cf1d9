use devbox_odin::{Credentials, DeployRequest, OdinClient, OdinError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> OdinClient {
    OdinClient::new(&server.uri(), Some(Credentials::new("secret-token"))).unwrap()
}

#[tokio::test]
async fn auth_exchanges_password_for_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice/auth_token"))
        .and(query_param("password", "hunter2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"authentication_token": "abc123"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let anonymous = OdinClient::new(&server.uri(), None).unwrap();
    let token = anonymous.auth("alice", "hunter2").await.unwrap();
    assert_eq!(token, "abc123");
}

#[tokio::test]
async fn app_lookup_sends_auth_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/blog"))
        .and(query_param("auth_token", "secret-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "a-1", "name": "blog"})),
        )
        .mount(&server)
        .await;

    let app = client(&server).app("blog").await.unwrap();
    assert_eq!(app.id, "a-1");
    assert_eq!(app.name, "blog");
    assert!(app.state.is_none());
}

#[tokio::test]
async fn deploy_posts_wrapped_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apps/a-1/deploys"))
        .and(query_param("auth_token", "secret-token"))
        .and(body_json(json!({
            "deploy": {
                "boxfile_content": "data.db:\n  image: postgres:13\n",
                "build_id": "b-7",
                "commit_message": "bump"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string("ignored"))
        .expect(1)
        .mount(&server)
        .await;

    let request = DeployRequest {
        boxfile_content: "data.db:\n  image: postgres:13\n".into(),
        build_id: "b-7".into(),
        commit_message: "bump".into(),
    };
    client(&server).deploy("a-1", &request).await.unwrap();
}

#[tokio::test]
async fn tunnel_console_and_warehouse_return_channels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/a-1/tunnels/data.db"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t1", "url": "tunnel.example.dev:443", "container": "c-db"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/apps/a-1/consoles/web.site"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t2", "url": "console.example.dev:443", "container": "c-web"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/apps/a-1/services/warehouse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t3", "url": "warehouse.example.dev"
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let tunnel = client.establish_tunnel("a-1", "data.db").await.unwrap();
    assert_eq!(tunnel.container, "c-db");
    let console = client.establish_console("a-1", "web.site").await.unwrap();
    assert_eq!(console.token, "t2");
    let warehouse = client.warehouse("a-1").await.unwrap();
    assert_eq!(warehouse.url, "warehouse.example.dev");
}

#[tokio::test]
async fn previous_build_takes_most_recent_deploy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/a-1/deploys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"build_id": "b-9"},
            {"build_id": "b-8"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/apps/fresh/deploys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.previous_build("a-1").await.unwrap().as_deref(), Some("b-9"));
    assert_eq!(client.previous_build("fresh").await.unwrap(), None);
}

#[tokio::test]
async fn error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such app"))
        .mount(&server)
        .await;

    let err = client(&server).app("missing").await.unwrap_err();
    match err {
        OdinError::Status { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such app");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/blog"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server).app("blog").await.unwrap_err();
    assert!(matches!(err, OdinError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Port 9 (discard) is not expected to be listening.
    let client = OdinClient::new("http://127.0.0.1:9/", None).unwrap();
    let err = client.app("blog").await.unwrap_err();
    assert!(matches!(err, OdinError::Transport(_)));
}
