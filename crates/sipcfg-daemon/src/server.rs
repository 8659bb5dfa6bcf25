//! Web server setup and routing

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::api;
use crate::config::TlsConfig;
use crate::state::AppState;

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/provisioning/{mac}", get(api::get_provisioning))
        .route("/api/v1/devices", get(api::list_devices))
        .route("/api/v1/devices/reload", post(api::reload_devices))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the web server (HTTP or HTTPS depending on config)
pub async fn run(state: Arc<AppState>, bind: &str, tls: Option<&TlsConfig>) -> Result<()> {
    let app = router(state);

    if let Some(tls_config) = tls {
        run_https(app, bind, tls_config).await
    } else {
        run_http(app, bind).await
    }
}

/// Run plain HTTP server
async fn run_http(app: Router, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(address = %bind, protocol = "HTTP", "Starting web server");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Run HTTPS server with TLS
async fn run_https(app: Router, bind: &str, tls: &TlsConfig) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::path::PathBuf;

    let cert_path = PathBuf::from(&tls.cert);
    let key_path = PathBuf::from(&tls.key);

    if !cert_path.exists() {
        anyhow::bail!("TLS certificate file not found: {}", tls.cert);
    }
    if !key_path.exists() {
        anyhow::bail!("TLS key file not found: {}", tls.key);
    }

    let rustls_config = RustlsConfig::from_pem_file(&cert_path, &key_path).await?;

    let addr: std::net::SocketAddr = bind.parse()?;
    info!(address = %bind, protocol = "HTTPS", cert = %tls.cert, "Starting web server with TLS");

    axum_server::bind_rustls(addr, rustls_config)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use sipcfg_core::DeviceRegistry;
    use tower::ServiceExt;

    const DEVICES: &str = r#"
[[device]]
mac = "aa-bb-cc-dd-ee-ff"
model = "DESK"
username = "john"
password = "doe"

[[device]]
mac = "aa-bb-cc-11-22-33"
model = "CONFERENCE"
username = "john"
password = "doe"
override = '{"domain":"sip.anotherdomain.com","port":"5161","timeout":10}'

[[device]]
mac = "aa-bb-cc-44-55-66"
model = "DESK"
username = "john"
password = "doe"
override = "timeout"

[[device]]
mac = "aa-bb-cc-77-88-99"
model = "CONFERENCE"
username = "john"
password = "doe"
override = "   "
"#;

    fn setup() -> Router {
        let registry = DeviceRegistry::from_toml(DEVICES).unwrap();
        router(AppState::with_registry(Config::default(), registry))
    }

    async fn call(router: &Router, method: &str, uri: &str) -> (StatusCode, Option<String>, String) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn provision_desk_device() {
        let r = setup();
        let (status, content_type, body) = call(&r, "GET", "/api/v1/provisioning/aa-bb-cc-dd-ee-ff").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
        assert_eq!(
            body,
            "username=john\npassword=doe\ndomain=sip.voxloud.com\nport=5060\ncodecs=G711,G729,OPUS"
        );
    }

    #[tokio::test]
    async fn provision_conference_device() {
        let r = setup();
        let (status, content_type, body) = call(&r, "GET", "/api/v1/provisioning/AA:BB:CC:11:22:33").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "username": "john",
                "password": "doe",
                "domain": "sip.anotherdomain.com",
                "port": "5161",
                "codecs": ["G711", "G729", "OPUS"],
                "timeout": 10
            })
        );
    }

    #[tokio::test]
    async fn provision_device_not_found() {
        let r = setup();
        let (status, _, body) = call(&r, "GET", "/api/v1/provisioning/aa-bb-cc-11-22-34").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Device not found for MAC address: aa-bb-cc-11-22-34");
    }

    #[tokio::test]
    async fn provision_invalid_mac() {
        let r = setup();
        let (status, _, body) = call(&r, "GET", "/api/v1/provisioning/invalid-mac").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid MAC address: invalid-mac"));
    }

    #[tokio::test]
    async fn provision_malformed_override() {
        let r = setup();
        let (status, _, body) = call(&r, "GET", "/api/v1/provisioning/aa-bb-cc-44-55-66").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(value["error"].as_str().unwrap().contains("Malformed override fragment"));
        assert!(!body.contains("username="));
    }

    #[tokio::test]
    async fn provision_blank_override_is_server_error() {
        let r = setup();
        let (status, _, body) = call(&r, "GET", "/api/v1/provisioning/aa-bb-cc-77-88-99").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Invalid JSON in override fragment"));
        assert!(!body.contains("sip.voxloud.com"));
    }

    #[tokio::test]
    async fn list_devices_hides_credentials() {
        let r = setup();
        let (status, _, body) = call(&r, "GET", "/api/v1/devices").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("doe"));
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let devices = value.as_array().unwrap();
        assert_eq!(devices.len(), 4);
        assert_eq!(devices[0]["mac"], "aa-bb-cc-11-22-33");
        assert_eq!(devices[0]["has_override"], true);
    }

    #[tokio::test]
    async fn reload_without_index_fails() {
        let mut config = Config::default();
        config.devices.path = "/nonexistent/sipcfg/devices.toml".to_string();
        let r = router(AppState::with_registry(config, DeviceRegistry::empty()));
        let (status, _, body) = call(&r, "POST", "/api/v1/devices/reload").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Failed to reload devices"));
    }
}
