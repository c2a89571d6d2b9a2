//! Mock endpoint tests for the sape client.
//!
//! These tests use wiremock to simulate the remote endpoint and test the
//! library's behavior without requiring network access or real
//! credentials: session cookie handling, the status gate, response
//! wrapping, and error surfacing.

use std::collections::BTreeMap;

use sape::error::TransportError;
use sape::xmlrpc::XmlRpcClient;
use sape::{ApiUrl, Credentials, Error, Page, PropertyMap, Sape, SiteStatus, Value};
use wiremock::matchers::{
    BodyContainsMatcher, body_string, body_string_contains, header, method, path,
};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Helper to create an endpoint URL from a mock server.
fn mock_endpoint(server: &MockServer) -> ApiUrl {
    ApiUrl::new(format!("http://127.0.0.1:{}/xmlrpc/", server.address().port())).unwrap()
}

/// A methodResponse carrying one value.
fn value_response(inner: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?><methodResponse><params><param>\
         <value>{inner}</value>\
         </param></params></methodResponse>"
    )
}

fn int_response(value: i64) -> String {
    value_response(&format!("<int>{value}</int>"))
}

fn double_response(value: f64) -> String {
    value_response(&format!("<double>{value}</double>"))
}

/// A methodResponse carrying a fault.
fn fault_response(code: i32, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?><methodResponse><fault><value><struct>\
         <member><name>faultCode</name><value><int>{code}</int></value></member>\
         <member><name>faultString</name><value><string>{message}</string></value></member>\
         </struct></value></fault></methodResponse>"
    )
}

/// Matches request bodies calling the given remote method.
fn calls(method_name: &str) -> BodyContainsMatcher {
    body_string_contains(format!("<methodName>{method_name}</methodName>"))
}

/// Matches requests that carry no Cookie header at all.
struct NoCookie;

impl Match for NoCookie {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("cookie")
    }
}

/// Mounts a login mock answering `user_id`, optionally setting a cookie.
async fn mount_login(server: &MockServer, user_id: i64, cookie: Option<&str>) {
    let mut template = ResponseTemplate::new(200).set_body_string(int_response(user_id));
    if let Some(cookie) = cookie {
        template = template.insert_header("set-cookie", cookie);
    }
    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.login"))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Mounts a get_user mock answering a small property struct.
async fn mount_user(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_user"))
        .respond_with(ResponseTemplate::new(200).set_body_string(value_response(
            "<struct>\
             <member><name>login</name><value><string>alice</string></value></member>\
             <member><name>email</name><value><string>alice@example.com</string></value></member>\
             </struct>",
        )))
        .mount(server)
        .await;
}

async fn login(server: &MockServer) -> Sape {
    Sape::login_with_endpoint(mock_endpoint(server), Credentials::new("alice", "secret"))
        .await
        .unwrap()
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    let expected_body = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
                         <methodCall><methodName>sape.login</methodName><params>\
                         <param><value><string>alice</string></value></param>\
                         <param><value><string>secret</string></value></param>\
                         <param><value><boolean>0</boolean></value></param>\
                         </params></methodCall>";

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(body_string(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_string(int_response(12345)))
        .expect(1)
        .mount(&server)
        .await;

    let sape = login(&server).await;
    assert_eq!(sape.user_id(), 12345);
}

#[tokio::test]
async fn test_login_fault() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(fault_response(666, "Wrong login or password")),
        )
        .mount(&server)
        .await;

    let err = Sape::login_with_endpoint(mock_endpoint(&server), Credentials::new("alice", "bad"))
        .await
        .unwrap_err();

    match err {
        Error::Fault(fault) => {
            assert_eq!(fault.code, 666);
            assert_eq!(fault.message, "Wrong login or password");
        }
        other => panic!("expected a fault, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_unexpected_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(value_response("<string>nope</string>")),
        )
        .mount(&server)
        .await;

    let err = Sape::login_with_endpoint(mock_endpoint(&server), Credentials::new("alice", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnexpectedResponse { .. }));
}

// ============================================================================
// Session Cookie Tests
// ============================================================================

#[tokio::test]
async fn test_first_request_has_no_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(NoCookie)
        .respond_with(ResponseTemplate::new(200).set_body_string(int_response(1)))
        .expect(1)
        .mount(&server)
        .await;

    let sape = login(&server).await;
    assert!(sape.session_cookie().is_none());
}

#[tokio::test]
async fn test_cookie_carried_forward() {
    let server = MockServer::start().await;
    mount_login(&server, 1, Some("sape_session=abc")).await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_user"))
        .and(header("cookie", "sape_session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(value_response(
            "<struct><member><name>login</name><value><string>alice</string></value></member></struct>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let sape = login(&server).await;
    assert_eq!(sape.session_cookie().as_deref(), Some("sape_session=abc"));

    let user = sape.user().await.unwrap();
    assert_eq!(user.login().unwrap(), "alice");
}

#[tokio::test]
async fn test_cookie_survives_cookieless_response() {
    let server = MockServer::start().await;
    mount_login(&server, 1, Some("sape_session=abc")).await;
    mount_user(&server).await;

    // The get_user response sets no cookie; the call after it must still
    // replay the one from login.
    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_balance_locks"))
        .and(header("cookie", "sape_session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(value_response("<string>none</string>")))
        .expect(1)
        .mount(&server)
        .await;

    let sape = login(&server).await;
    let user = sape.user().await.unwrap();
    user.balance_locks().await.unwrap();
    assert_eq!(sape.session_cookie().as_deref(), Some("sape_session=abc"));
}

#[tokio::test]
async fn test_newer_cookie_replaces_stored() {
    let server = MockServer::start().await;
    mount_login(&server, 1, Some("sape_session=abc")).await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_user"))
        .and(header("cookie", "sape_session=abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(value_response("<struct></struct>"))
                .insert_header("set-cookie", "sape_session=def"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_balance_locks"))
        .and(header("cookie", "sape_session=def"))
        .respond_with(ResponseTemplate::new(200).set_body_string(value_response("<string>none</string>")))
        .expect(1)
        .mount(&server)
        .await;

    let sape = login(&server).await;
    let user = sape.user().await.unwrap();
    user.balance_locks().await.unwrap();
    assert_eq!(sape.session_cookie().as_deref(), Some("sape_session=def"));
}

#[tokio::test]
async fn test_cookie_stored_before_body_is_read() {
    let server = MockServer::start().await;
    mount_login(&server, 1, Some("sape_session=abc")).await;

    // The cookie from a 200 is stored before the body is read; a body
    // that fails to parse still leaves the newer cookie behind.
    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_balance_locks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("garbage")
                .insert_header("set-cookie", "sape_session=mid"),
        )
        .mount(&server)
        .await;

    let sape = login(&server).await;

    let err = sape.call("sape.get_balance_locks", &[]).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::MalformedResponse(_))
    ));
    assert_eq!(sape.session_cookie().as_deref(), Some("sape_session=mid"));
}

// ============================================================================
// Status Gate Tests
// ============================================================================

#[tokio::test]
async fn test_non_200_is_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string("boom")
                .insert_header("x-request-trace", "trace-1"),
        )
        .mount(&server)
        .await;

    let endpoint = mock_endpoint(&server);
    let err = Sape::login_with_endpoint(endpoint.clone(), Credentials::new("alice", "secret"))
        .await
        .unwrap_err();

    match err {
        Error::Protocol(protocol) => {
            assert_eq!(protocol.status, 500);
            assert_eq!(protocol.reason, "Internal Server Error");
            assert_eq!(protocol.endpoint, endpoint.as_str());
            assert_eq!(
                protocol
                    .headers
                    .get("x-request-trace")
                    .and_then(|value| value.to_str().ok()),
                Some("trace-1")
            );
        }
        other => panic!("expected a protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_redirect_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/elsewhere/"))
        .mount(&server)
        .await;

    let err = Sape::login_with_endpoint(mock_endpoint(&server), Credentials::new("alice", "secret"))
        .await
        .unwrap_err();

    match err {
        Error::Protocol(protocol) => assert_eq!(protocol.status, 302),
        other => panic!("expected a protocol error, got {other:?}"),
    }
}

// ============================================================================
// Transport Failure Tests
// ============================================================================

#[tokio::test]
async fn test_connection_refused() {
    // Bind and drop a listener to get a port nothing is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let endpoint = ApiUrl::new(format!("http://127.0.0.1:{port}/xmlrpc/")).unwrap();
    let err = Sape::login_with_endpoint(endpoint, Credentials::new("alice", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_malformed_response_then_recovery() {
    let server = MockServer::start().await;

    // First exchange gets a body that is not XML-RPC at all; every
    // exchange after the reset gets a clean response.
    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not xml"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(int_response(7)))
        .mount(&server)
        .await;

    let client = XmlRpcClient::new(mock_endpoint(&server));

    let err = client.call("sape.get_balance", &[]).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::MalformedResponse(_))
    ));

    let value = client.call("sape.get_balance", &[]).await.unwrap();
    assert_eq!(value.as_i64(), Some(7));
}

#[tokio::test]
async fn test_cookie_survives_failed_exchange() {
    let server = MockServer::start().await;
    mount_login(&server, 1, Some("sape_session=abc")).await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_balance_locks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("garbage"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_user"))
        .and(header("cookie", "sape_session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(value_response("<struct></struct>")))
        .expect(1)
        .mount(&server)
        .await;

    let sape = login(&server).await;

    let err = sape.call("sape.get_balance_locks", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));

    // The reset replaced the HTTP client but kept the cookie.
    let user = sape.user().await.unwrap();
    assert!(user.properties().is_empty());
}

// ============================================================================
// Account Operation Tests
// ============================================================================

#[tokio::test]
async fn test_get_user_properties() {
    let server = MockServer::start().await;
    mount_login(&server, 42, None).await;
    mount_user(&server).await;

    let sape = login(&server).await;
    let user = sape.user().await.unwrap();

    assert_eq!(user.id(), 42);
    assert_eq!(user.login().unwrap(), "alice");
    assert_eq!(user.email().unwrap(), "alice@example.com");
    assert_eq!(user.property("login").unwrap().as_str(), Some("alice"));
}

#[tokio::test]
async fn test_missing_property() {
    let server = MockServer::start().await;
    mount_login(&server, 1, None).await;
    mount_user(&server).await;

    let sape = login(&server).await;
    let user = sape.user().await.unwrap();

    let err = user.property("foo").unwrap_err();
    assert!(matches!(err, Error::MissingProperty { ref name } if name == "foo"));
    assert!(err.to_string().contains("\"foo\""));
}

#[tokio::test]
async fn test_balance() {
    let server = MockServer::start().await;
    mount_login(&server, 1, None).await;
    mount_user(&server).await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_balance"))
        .respond_with(ResponseTemplate::new(200).set_body_string(double_response(100.5)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_balance_real"))
        .respond_with(ResponseTemplate::new(200).set_body_string(double_response(80.25)))
        .expect(1)
        .mount(&server)
        .await;

    let sape = login(&server).await;
    let user = sape.user().await.unwrap();
    let balance = user.balance().await.unwrap();

    assert_eq!(balance.nominal, 100.5);
    assert_eq!(balance.real, 80.25);
}

#[tokio::test]
async fn test_get_bills_default_sentinels() {
    let server = MockServer::start().await;
    mount_login(&server, 1, None).await;
    mount_user(&server).await;

    let expected_body = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
                         <methodCall><methodName>sape.get_bills</methodName><params>\
                         <param><value><int>2013</int></value></param>\
                         <param><value><nil/></value></param>\
                         <param><value><nil/></value></param>\
                         <param><value><boolean>0</boolean></value></param>\
                         </params></methodCall>";

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(body_string(expected_body))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(value_response("<array><data></data></array>")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sape = login(&server).await;
    let user = sape.user().await.unwrap();
    let bills = user.get_bills(2013, None, None, None).await.unwrap();
    assert_eq!(bills, Value::Array(vec![]));
}

#[tokio::test]
async fn test_get_bills_explicit_options() {
    let server = MockServer::start().await;
    mount_login(&server, 1, None).await;
    mount_user(&server).await;

    let expected_body = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
                         <methodCall><methodName>sape.get_bills</methodName><params>\
                         <param><value><int>2013</int></value></param>\
                         <param><value><int>7</int></value></param>\
                         <param><value><int>17</int></value></param>\
                         <param><value><int>99</int></value></param>\
                         </params></methodCall>";

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(body_string(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_string(value_response(
            "<array><data><value><struct>\
             <member><name>id</name><value><int>555</int></value></member>\
             </struct></value></data></array>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let sape = login(&server).await;
    let user = sape.user().await.unwrap();
    let bills = user.get_bills(2013, Some(7), Some(17), Some(99)).await.unwrap();
    assert_eq!(bills.as_array().map(|items| items.len()), Some(1));
}

#[tokio::test]
async fn test_get_sites() {
    let server = MockServer::start().await;
    mount_login(&server, 1, None).await;
    mount_user(&server).await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_sites"))
        .respond_with(ResponseTemplate::new(200).set_body_string(value_response(
            "<array><data>\
             <value><struct>\
             <member><name>id</name><value><int>101</int></value></member>\
             <member><name>url</name><value><string>example.com</string></value></member>\
             <member><name>status</name><value><string>OK</string></value></member>\
             </struct></value>\
             <value><struct>\
             <member><name>id</name><value><int>102</int></value></member>\
             <member><name>url</name><value><string>example.org</string></value></member>\
             <member><name>status</name><value><string>NEW</string></value></member>\
             <member><name>pages_count</name><value><int>12</int></value></member>\
             </struct></value>\
             </data></array>",
        )))
        .mount(&server)
        .await;

    let sape = login(&server).await;
    let user = sape.user().await.unwrap();
    let sites = user.get_sites().await.unwrap();

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].id().unwrap(), 101);
    assert_eq!(sites[0].url().unwrap(), "example.com");
    assert_eq!(sites[0].status().unwrap(), SiteStatus::Ok);
    assert_eq!(sites[1].status().unwrap(), SiteStatus::New);
    assert_eq!(sites[1].property("pages_count").unwrap().as_i64(), Some(12));
}

// ============================================================================
// Unwired Operation Tests
// ============================================================================

#[tokio::test]
async fn test_unwired_operations() {
    let server = MockServer::start().await;
    mount_login(&server, 1, None).await;
    mount_user(&server).await;

    Mock::given(method("POST"))
        .and(path("/xmlrpc/"))
        .and(calls("sape.get_sites"))
        .respond_with(ResponseTemplate::new(200).set_body_string(value_response(
            "<array><data><value><struct>\
             <member><name>id</name><value><int>101</int></value></member>\
             </struct></value></data></array>",
        )))
        .mount(&server)
        .await;

    let sape = login(&server).await;
    let user = sape.user().await.unwrap();
    let sites = user.get_sites().await.unwrap();
    let site = &sites[0];

    let err = site.update().await.unwrap_err();
    assert!(matches!(
        err,
        Error::NotImplemented {
            operation: "Site::update"
        }
    ));
    assert!(site.regions().await.unwrap_err().to_string().contains("Site::regions"));
    assert!(site.pages().await.unwrap_err().to_string().contains("Site::pages"));
    assert!(site.links().await.unwrap_err().to_string().contains("Site::links"));

    let page = Page::new(&sape, PropertyMap::new(BTreeMap::new()));
    assert!(page.activate().await.unwrap_err().to_string().contains("Page::activate"));
    assert!(page.exclude().await.unwrap_err().to_string().contains("Page::exclude"));
    assert!(page.purge().await.unwrap_err().to_string().contains("Page::purge"));
}
