//! HTTP side of the link page: the store file itself and the endpoint that
//! overwrites it.
//!
//! Every save rewrites the whole file in place. There is no lock and no
//! temp-file rename, so two overlapping saves may interleave their writes and
//! the last one to finish wins.

use std::io::ErrorKind;
use std::path::PathBuf;

use actix_web::middleware::DefaultHeaders;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::models::SaveResponse;

pub const SAVE_PATH: &str = "/save_links";

/// Upper bound on a save request body.
const MAX_PAYLOAD: usize = 16 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub store_path: PathBuf,
    pub store_file_name: String,
}

impl ServerConfig {
    pub fn new(store_path: PathBuf) -> ServerConfig {
        let store_file_name = store_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| crate::config::DEFAULT_STORE_FILE.to_string());
        ServerConfig {
            store_path,
            store_file_name,
        }
    }

    /// Path the store file is served under, e.g. `/links_db.txt`.
    pub fn store_route(&self) -> String {
        format!("/{}", self.store_file_name)
    }
}

impl From<&Config> for ServerConfig {
    fn from(config: &Config) -> ServerConfig {
        ServerConfig {
            store_path: config.store_file.clone(),
            store_file_name: config.store_file_name(),
        }
    }
}

/// Registers the store file route and the save endpoint.
pub fn configure(store: ServerConfig) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let store_route = store.store_route();
        cfg.app_data(web::Data::new(store))
            .app_data(web::PayloadConfig::new(MAX_PAYLOAD))
            .service(
                web::resource(SAVE_PATH)
                    .route(web::post().to(save_links))
                    .default_service(web::to(method_not_allowed)),
            )
            .route(&store_route, web::get().to(read_store));
    }
}

/// Lets any origin call the endpoint.
pub fn cors() -> DefaultHeaders {
    DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*"))
}

async fn save_links(
    store: web::Data<ServerConfig>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let input: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejecting save with unparsable body: {e}");
        AppError::InvalidData
    })?;

    let links = match input.get("links") {
        Some(links) if !links.is_null() => links,
        _ => {
            warn!("Rejecting save without links");
            return Err(AppError::InvalidData);
        }
    };

    let data = to_pretty_json(links).map_err(|e| AppError::WriteFailed(e.into()))?;

    tokio::fs::write(&store.store_path, data).await.map_err(|e| {
        error!("Failed to write {}: {e}", store.store_path.display());
        AppError::WriteFailed(e)
    })?;

    let count = links.as_array().map(Vec::len).unwrap_or_default();
    info!("Saved {count} links to {}", store.store_path.display());

    Ok(HttpResponse::Ok().json(SaveResponse { success: true }))
}

async fn read_store(store: web::Data<ServerConfig>) -> Result<HttpResponse, AppError> {
    let text = tokio::fs::read(&store.store_path).await.map_err(|e| {
        warn!("Failed to read {}: {e}", store.store_path.display());
        match e.kind() {
            ErrorKind::NotFound => AppError::StoreMissing(e),
            _ => AppError::ReadFailed(e),
        }
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(text))
}

async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}

fn to_pretty_json(value: &Value) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorBody;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    fn store_in(dir: &tempfile::TempDir) -> ServerConfig {
        ServerConfig::new(dir.path().join("links_db.txt"))
    }

    #[actix_rt::test]
    async fn save_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let path = store.store_path.clone();
        let app = test::init_service(App::new().wrap(cors()).configure(configure(store))).await;

        let body = json!({
            "links": [{"id": 1, "title": "Foo", "url": "https://foo.dev", "description": "",
                       "icon": "fas fa-link", "category": "Tools", "imageUrl": ""}],
            "action": "save"
        });
        let req = test::TestRequest::post()
            .uri(SAVE_PATH)
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
        let saved: SaveResponse = test::read_body_json(resp).await;
        assert!(saved.success);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("[\n    {"));
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, body["links"]);
    }

    #[actix_rt::test]
    async fn empty_object_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().configure(configure(store_in(&dir)))).await;

        let req = test::TestRequest::post()
            .uri(SAVE_PATH)
            .set_payload("{}")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/json"
        );
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Invalid data");
        assert!(!dir.path().join("links_db.txt").exists());
    }

    #[actix_rt::test]
    async fn garbage_and_null_links_are_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().configure(configure(store_in(&dir)))).await;

        for payload in ["not json", r#"{"links": null}"#, "[1, 2]"] {
            let req = test::TestRequest::post()
                .uri(SAVE_PATH)
                .set_payload(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {payload}");
        }
    }

    #[actix_rt::test]
    async fn non_post_is_method_not_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().wrap(cors()).configure(configure(store_in(&dir)))).await;

        let req = test::TestRequest::get().uri(SAVE_PATH).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Method not allowed");
    }

    #[actix_rt::test]
    async fn unwritable_store_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ServerConfig::new(dir.path().join("missing").join("links_db.txt"));
        let app = test::init_service(App::new().configure(configure(store))).await;

        let req = test::TestRequest::post()
            .uri(SAVE_PATH)
            .set_payload(r#"{"links": []}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Failed to write file");
    }

    #[actix_rt::test]
    async fn store_file_is_served_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(&store.store_path, "[]").unwrap();
        let app = test::init_service(App::new().configure(configure(store))).await;

        let req = test::TestRequest::get().uri("/links_db.txt").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"[]");
    }

    #[actix_rt::test]
    async fn missing_store_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().configure(configure(store_in(&dir)))).await;

        let req = test::TestRequest::get().uri("/links_db.txt").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
