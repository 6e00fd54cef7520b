//! Read-only HTTP backend serving the stored record documents.
//!
//! Routes:
//! - `GET /api/data`: every stored document as a JSON array.
//! - `OPTIONS <any>`: CORS preflight, `204`.
//!
//! Every response allows any origin.

use crate::api::DATA_ROUTE;
use crate::config::ServerConfig;
use crate::error::{DashError, Result};
use crate::store::{DocumentStore, SeedStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Header, Request, Response, Server, StatusCode};

const JSON: &str = "application/json; charset=utf-8";
const STORE_FAILURE_BODY: &str = r#"{"message":"Error retrieving data"}"#;

/// A response before it is bound to a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: vec![("Access-Control-Allow-Origin", "*".to_string())],
            body: body.into(),
        }
    }

    fn json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, body).with_header("Content-Type", JSON)
    }

    fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn into_response(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let mut resp = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        for (name, value) in &self.headers {
            match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(h) => resp.add_header(h),
                Err(()) => log::warn!("dropping invalid header {}", name),
            }
        }
        resp
    }
}

/// Route one request. `url` may carry a query string, which is ignored.
pub fn route(method: &str, url: &str, store: &dyn DocumentStore) -> ApiResponse {
    let path = url.split(['?', '#']).next().unwrap_or("");
    let is_data = path.trim_end_matches('/') == DATA_ROUTE;

    if method.eq_ignore_ascii_case("OPTIONS") {
        return ApiResponse::new(204, Vec::new())
            .with_header("Access-Control-Allow-Methods", "GET,HEAD,PUT,PATCH,POST,DELETE")
            .with_header("Access-Control-Allow-Headers", "Content-Type");
    }
    if !is_data {
        return ApiResponse::json(404, format!(r#"{{"message":"Cannot {} {}"}}"#, method, path));
    }
    if !(method.eq_ignore_ascii_case("GET") || method.eq_ignore_ascii_case("HEAD")) {
        return ApiResponse::json(405, r#"{"message":"Method not allowed"}"#)
            .with_header("Allow", "GET, HEAD, OPTIONS");
    }

    match store.find_all().and_then(|docs| {
        serde_json::to_vec(&docs).map_err(|e| DashError::decode("stored documents", e))
    }) {
        Ok(body) => ApiResponse::json(200, body),
        Err(e) => {
            log::error!("GET {} failed: {}", DATA_ROUTE, e);
            ApiResponse::json(500, STORE_FAILURE_BODY)
        }
    }
}

/// A bound listener plus the store it serves.
pub struct Backend {
    server: Server,
    store: Arc<dyn DocumentStore>,
}

impl Backend {
    /// Bind `addr` (`host:port`; port `0` picks a free one).
    pub fn bind(addr: &str, store: Arc<dyn DocumentStore>) -> Result<Self> {
        let server = Server::http(addr)
            .map_err(|e| DashError::Configuration(format!("cannot listen on {}: {}", addr, e)))?;
        Ok(Self { server, store })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve requests one at a time until the listener closes.
    pub fn run(&self) {
        for request in self.server.incoming_requests() {
            self.respond(request);
        }
    }

    fn respond(&self, request: Request) {
        let method = request.method().to_string();
        let url = request.url().to_string();
        let resp = route(&method, &url, self.store.as_ref());
        log::debug!("{} {} -> {}", method, url, resp.status);
        if let Err(e) = request.respond(resp.into_response()) {
            log::warn!("failed to write response for {} {}: {}", method, url, e);
        }
    }
}

/// Load the seed file and serve it until the process is stopped.
pub fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    config.validate()?;
    let store = SeedStore::from_seed_file(&config.seed)?;
    let backend = Backend::bind(&config.addr(), Arc::new(store))?;
    match backend.local_addr() {
        Some(addr) => log::info!("serving {} on http://{}", DATA_ROUTE, addr),
        None => log::info!("serving {} on {}", DATA_ROUTE, config.addr()),
    }
    backend.run();
    Ok(())
}
