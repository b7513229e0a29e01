//! Tests for the execution loop.

use std::io;
use std::sync::{Arc, Mutex};

use http::header::COOKIE;
use http::{Method, StatusCode};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::config::ConfigFile;
use crate::response::SchemaError;
use crate::transport::{HttpRequest, HttpResponse};

/// Mock HTTP client that returns a configurable sequence of responses.
#[derive(Debug)]
struct MockClient {
    responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn statuses(codes: &[u16]) -> Self {
        Self::new(codes.iter().map(|&c| Ok(ok_response(c))).collect())
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        self.responses.lock().unwrap().remove(0)
    }
}

/// Validator that accepts everything.
#[derive(Debug, Default)]
struct AcceptAll;

impl SchemaValidator for AcceptAll {
    fn validate(&self, _body: &[u8], _location: &str) -> Result<(), SchemaError> {
        Ok(())
    }
}

fn ok_response(status: u16) -> HttpResponse {
    HttpResponse::new(StatusCode::from_u16(status).unwrap(), Vec::new())
}

fn refused() -> HttpError {
    HttpError::Connection(Box::new(io::Error::from(io::ErrorKind::ConnectionRefused)))
}

fn config_for(root: &str, endpoints: &str) -> ValidatedConfig {
    ValidatedConfig::from_file(
        ConfigFile::parse_json(&format!(r#"{{ "root": "{root}", "endpoints": {endpoints} }}"#))
            .unwrap(),
    )
    .unwrap()
}

fn mock_runner(config: ValidatedConfig, client: MockClient) -> Runner<MockClient, AcceptAll> {
    let cookies = CookieStore::new(config.root_url.clone());
    Runner::with_parts(config, cookies, client, AcceptAll)
}

mod with_mock_client {
    use super::*;

    #[tokio::test]
    async fn accepted_status_succeeds() {
        let config = config_for(
            "https://api.example.com",
            r#"[{ "name": "ping", "path": "/health", "method": "GET", "acceptStatus": [200] }]"#,
        );
        let runner = mock_runner(config, MockClient::statuses(&[200]));

        let outcome = runner
            .execute_endpoint(&runner.config.endpoints[0])
            .await
            .unwrap();

        assert_eq!(outcome.status, StatusCode::OK);
        assert!(outcome.exported_to.is_none());
    }

    #[tokio::test]
    async fn rejected_status_is_process_error() {
        let config = config_for(
            "https://api.example.com",
            r#"[{ "name": "ping", "path": "/health", "method": "GET", "acceptStatus": [200] }]"#,
        );
        let runner = mock_runner(config, MockClient::statuses(&[503]));

        let err = runner
            .execute_endpoint(&runner.config.endpoints[0])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TaskError::Process(ProcessError::StatusMismatch { status: 503 })
        ));
        assert_eq!(
            err.to_string(),
            "Failed to process response: invalid HTTP status received: 503"
        );
    }

    #[tokio::test]
    async fn transport_error_is_reported() {
        let config = config_for(
            "https://api.example.com",
            r#"[{ "name": "ping", "path": "/health", "method": "GET" }]"#,
        );
        let runner = mock_runner(config, MockClient::new(vec![Err(refused())]));

        let err = runner
            .execute_endpoint(&runner.config.endpoints[0])
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::Transport(HttpError::Connection(_))));
    }

    #[tokio::test]
    async fn build_error_sends_nothing() {
        let mut config = config_for(
            "https://api.example.com",
            r#"[{ "name": "ping", "path": "/health", "method": "GET" }]"#,
        );
        config.root = "https://api.example.com:99999".to_string();
        let runner = mock_runner(config, MockClient::statuses(&[200]));

        let err = runner
            .execute_endpoint(&runner.config.endpoints[0])
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::Build(BuildError::InvalidUrl { .. })));
        assert!(runner.client.captured_requests().is_empty());
    }

    #[tokio::test]
    async fn run_continues_after_failures_in_order() {
        let config = config_for(
            "https://api.example.com",
            r#"[
                { "name": "one", "path": "/1", "method": "GET", "acceptStatus": [200] },
                { "name": "two", "path": "/2", "method": "POST", "acceptStatus": [200] },
                { "name": "three", "path": "/3", "method": "DELETE" }
            ]"#,
        );
        let client = MockClient::new(vec![
            Err(refused()),
            Ok(ok_response(500)),
            Ok(ok_response(204)),
        ]);
        let runner = mock_runner(config, client);

        runner.run().await;

        let paths: Vec<(Method, String)> = runner
            .client
            .captured_requests()
            .into_iter()
            .map(|r| (r.method, r.url.path().to_string()))
            .collect();
        assert_eq!(
            paths,
            vec![
                (Method::GET, "/1".to_string()),
                (Method::POST, "/2".to_string()),
                (Method::DELETE, "/3".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn startup_jar_is_loaded() {
        let config = ValidatedConfig::from_file(
            ConfigFile::parse_json(
                r#"{ "root": "https://api.example.com",
                     "jar": [{ "name": "boot", "value": "1" }],
                     "endpoints": [{ "name": "a", "path": "/", "method": "GET" }] }"#,
            )
            .unwrap(),
        )
        .unwrap();
        let runner = mock_runner(config, MockClient::statuses(&[200]));

        let root = runner.config.root_url.clone();
        assert_eq!(runner.cookies.jar_header(&root).as_deref(), Some("boot=1"));
    }

    #[tokio::test]
    async fn jar_cookies_accumulate_across_endpoints() {
        let config = config_for(
            "https://api.example.com",
            r#"[
                { "name": "e1", "path": "/1", "method": "GET",
                  "jar": [{ "name": "a", "value": "1" }], "cookies": [{ "name": "r", "value": "1" }] },
                { "name": "e2", "path": "/2", "method": "GET",
                  "jar": [{ "name": "a", "value": "2" }], "cookies": [{ "name": "r", "value": "2" }] },
                { "name": "e3", "path": "/3", "method": "GET",
                  "cookies": [{ "name": "r", "value": "3" }] }
            ]"#,
        );
        let runner = mock_runner(config, MockClient::statuses(&[200, 200, 200]));

        runner.run().await;

        let cookies: Vec<String> = runner
            .client
            .captured_requests()
            .iter()
            .map(|r| r.headers.get(COOKIE).unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies, vec!["a=1; r=1", "a=2; r=2", "a=2; r=3"]);
        let root = runner.config.root_url.clone();
        assert_eq!(runner.cookies.jar_header(&root).as_deref(), Some("a=2"));
    }

    #[tokio::test]
    async fn export_directory_receives_body() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(
            "https://api.example.com",
            r#"[{ "name": "users/list", "path": "/users", "method": "GET" }]"#,
        );
        config.save_response_dir = Some(dir.path().to_path_buf());
        let client = MockClient::new(vec![Ok(HttpResponse::new(
            StatusCode::OK,
            b"[1,2,3]".to_vec(),
        ))]);
        let runner = mock_runner(config, client);

        let outcome = runner
            .execute_endpoint(&runner.config.endpoints[0])
            .await
            .unwrap();

        let exported = outcome.exported_to.unwrap();
        assert_eq!(exported, dir.path().join("userslist.json"));
        assert_eq!(std::fs::read(exported).unwrap(), b"[1,2,3]");
    }
}

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn ping_succeeds_without_export_or_schema() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let config = config_for(
            &server.uri(),
            r#"[{ "name": "ping", "path": "/health", "method": "GET", "acceptStatus": [200] }]"#,
        );
        let runner = Runner::new(config).unwrap();

        let outcome = runner
            .execute_endpoint(&runner.config.endpoints[0])
            .await
            .unwrap();

        assert_eq!(outcome.status, StatusCode::OK);
        assert!(outcome.exported_to.is_none());
    }

    #[tokio::test]
    async fn service_unavailable_is_reported_and_run_ends() {
        let server = MockServer::start().await;
        Mock::given(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let config = config_for(
            &server.uri(),
            r#"[{ "name": "ping", "path": "/health", "method": "GET", "acceptStatus": [200] }]"#,
        );
        let runner = Runner::new(config).unwrap();

        let err = runner
            .execute_endpoint(&runner.config.endpoints[0])
            .await
            .unwrap_err();
        runner.run().await;

        assert!(err.to_string().contains("invalid HTTP status received: 503"));
    }

    #[tokio::test]
    async fn set_cookie_reaches_later_endpoints() {
        let server = MockServer::start().await;
        Mock::given(path("/login"))
            .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "sid=abc; Path=/"))
            .mount(&server)
            .await;
        Mock::given(path("/me"))
            .and(header("cookie", "sid=abc"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let config = config_for(
            &server.uri(),
            r#"[
                { "name": "login", "path": "/login", "method": "POST", "acceptStatus": [200] },
                { "name": "me", "path": "/me", "method": "GET", "acceptStatus": [200] }
            ]"#,
        );
        let runner = Runner::new(config).unwrap();

        let login = runner.execute_endpoint(&runner.config.endpoints[0]).await;
        let me = runner.execute_endpoint(&runner.config.endpoints[1]).await;

        assert!(login.is_ok());
        assert!(me.is_ok(), "expected cookie to be replayed, got {me:?}");
    }

    #[tokio::test]
    async fn schema_validated_response_is_exported() {
        let server = MockServer::start().await;
        Mock::given(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":7}"#))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("user.schema.json");
        std::fs::write(
            &schema,
            r#"{ "type": "object", "required": ["id"], "properties": { "id": { "type": "integer" } } }"#,
        )
        .unwrap();
        let export = dir.path().join("out/user.json");
        let config = config_for(
            &server.uri(),
            &format!(
                r#"[{{ "name": "user", "path": "/user", "method": "GET", "acceptStatus": [200],
                       "schema": "{}", "saveResponse": "{}" }}]"#,
                schema.display(),
                export.display()
            ),
        );
        let runner = Runner::new(config).unwrap();

        let outcome = runner
            .execute_endpoint(&runner.config.endpoints[0])
            .await
            .unwrap();

        assert_eq!(outcome.exported_to, Some(export.clone()));
        assert_eq!(std::fs::read(export).unwrap(), br#"{"id":7}"#);
    }
}

mod logging {
    use super::*;

    /// Writer that appends to a shared buffer.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn outcomes_are_logged_with_task_context() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let config = config_for(
            "https://api.example.com",
            r#"[
                { "name": "down", "path": "/health", "method": "GET", "acceptStatus": [200] },
                { "name": "up", "path": "/ready", "method": "HEAD" }
            ]"#,
        );
        let runner = mock_runner(config, MockClient::statuses(&[503, 200]));

        runner.run().await;

        let logs = buf.contents();
        assert!(logs.contains("invalid HTTP status received: 503"));
        assert!(logs.contains("task_name=down"));
        assert!(logs.contains("Task Succeeded"));
        assert!(logs.contains("task_name=up"));
        assert!(logs.contains("root=https://api.example.com"));
    }
}
