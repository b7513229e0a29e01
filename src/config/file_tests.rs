//! Tests for configuration file parsing.

use std::io::Write;

use super::ConfigError;
use super::file::{ConfigFile, default_config_template};

mod json {
    use super::*;

    #[test]
    fn parse_full_config() {
        let file = ConfigFile::parse_json(
            r#"{
                "root": "https://api.example.com",
                "headers": [{ "key": "Accept", "value": "application/json" }],
                "jar": [{ "name": "sid", "value": "abc" }],
                "saveResponseDir": "out",
                "endpoints": [{
                    "name": "create",
                    "path": "/items",
                    "method": "POST",
                    "headers": [{ "key": "X-Trace", "value": "1" }],
                    "cookies": [{ "name": "c", "value": "d" }],
                    "jar": [{ "name": "j", "value": "k" }],
                    "body": { "a": 1 },
                    "acceptStatus": [200, 201],
                    "saveResponse": "out/create.json",
                    "schema": "schemas/item.json"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(file.root.as_deref(), Some("https://api.example.com"));
        assert_eq!(file.headers.len(), 1);
        assert_eq!(file.jar[0].name, "sid");
        assert_eq!(file.save_response_dir.as_deref(), Some("out"));

        let endpoint = &file.endpoints[0];
        assert_eq!(endpoint.name, "create");
        assert_eq!(endpoint.method, "POST");
        assert_eq!(endpoint.headers[0].key, "X-Trace");
        assert_eq!(endpoint.cookies[0].value, "d");
        assert_eq!(endpoint.jar[0].name, "j");
        assert_eq!(endpoint.body, Some(serde_json::json!({ "a": 1 })));
        assert_eq!(endpoint.accept_status, Some(vec![200, 201]));
        assert_eq!(endpoint.save_response.as_deref(), Some("out/create.json"));
        assert_eq!(endpoint.schema.as_deref(), Some("schemas/item.json"));
    }

    #[test]
    fn null_body_is_absent() {
        let file = ConfigFile::parse_json(
            r#"{ "endpoints": [{ "name": "a", "path": "/", "method": "GET", "body": null }] }"#,
        )
        .unwrap();

        assert!(file.endpoints[0].body.is_none());
    }

    #[test]
    fn string_body_is_kept_as_string() {
        let file = ConfigFile::parse_json(
            r#"{ "endpoints": [{ "name": "a", "path": "/", "method": "POST", "body": "{\"x\":1}" }] }"#,
        )
        .unwrap();

        assert_eq!(
            file.endpoints[0].body,
            Some(serde_json::Value::String(r#"{"x":1}"#.to_string()))
        );
    }

    #[test]
    fn missing_accept_status_is_none() {
        let file = ConfigFile::parse_json(
            r#"{ "endpoints": [{ "name": "a", "path": "/", "method": "GET" }] }"#,
        )
        .unwrap();

        assert!(file.endpoints[0].accept_status.is_none());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = ConfigFile::parse_json(r#"{ "root": "https://x", "retries": 3 }"#);

        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let result = ConfigFile::parse_json("{ not json");

        assert!(matches!(result, Err(ConfigError::Json(_))));
    }
}

mod toml_format {
    use super::*;

    #[test]
    fn parse_toml_config() {
        let file = ConfigFile::parse_toml(
            r#"
            root = "https://api.example.com"
            saveResponseDir = "out"

            [[headers]]
            key = "Accept"
            value = "application/json"

            [[endpoints]]
            name = "ping"
            path = "/health"
            method = "GET"
            acceptStatus = [200]

            [endpoints.body]
            hello = "world"
            "#,
        )
        .unwrap();

        assert_eq!(file.root.as_deref(), Some("https://api.example.com"));
        assert_eq!(file.endpoints[0].accept_status, Some(vec![200]));
        assert_eq!(
            file.endpoints[0].body,
            Some(serde_json::json!({ "hello": "world" }))
        );
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let result = ConfigFile::parse_toml("root = ");

        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}

mod loading {
    use super::*;

    #[test]
    fn load_picks_toml_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "root = \"https://example.com\"").unwrap();

        let config = ConfigFile::load(file.path()).unwrap();

        assert_eq!(config.root.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn load_defaults_to_json() {
        let mut file = tempfile::Builder::new().suffix(".conf").tempfile().unwrap();
        write!(file, r#"{{ "root": "https://example.com" }}"#).unwrap();

        let config = ConfigFile::load(file.path()).unwrap();

        assert_eq!(config.root.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn load_missing_file_returns_read_error() {
        let result = ConfigFile::load(std::path::Path::new("/nonexistent/visor.json"));

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let file = ConfigFile::parse_json(&default_config_template()).unwrap();

        assert_eq!(file.endpoints.len(), 2);
        assert!(file.root.is_some());
    }
}
