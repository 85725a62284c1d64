//! In-process upstream used by the async tests
//!
//! Serves canned pages keyed by raw path-and-query and records how often it
//! was hit, so cache behaviour can be observed from the outside.

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Request headers captured from the last request
#[derive(Debug, Clone, Default)]
pub struct SeenHeaders {
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
}

struct UpstreamState {
    pages: HashMap<String, (u16, String)>,
    hits: AtomicUsize,
    last_headers: Mutex<SeenHeaders>,
}

pub struct MockUpstream {
    base_url: String,
    state: Arc<UpstreamState>,
}

impl MockUpstream {
    /// Bind to an ephemeral port and start serving `(path_and_query, status, body)`.
    /// Unknown paths answer 404. Must be called inside an actix runtime.
    pub fn start(pages: Vec<(&str, u16, String)>) -> Self {
        let state = Arc::new(UpstreamState {
            pages: pages
                .into_iter()
                .map(|(path, status, body)| (path.to_string(), (status, body)))
                .collect(),
            hits: AtomicUsize::new(0),
            last_headers: Mutex::new(SeenHeaders::default()),
        });

        let data = web::Data::from(state.clone());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .default_service(web::to(serve))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("mock upstream should bind");

        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Origin of the mock, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_headers(&self) -> SeenHeaders {
        self.state
            .last_headers
            .lock()
            .expect("header lock poisoned")
            .clone()
    }
}

async fn serve(req: HttpRequest, state: web::Data<UpstreamState>) -> HttpResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };
    *state.last_headers.lock().expect("header lock poisoned") = SeenHeaders {
        user_agent: header("user-agent"),
        accept_language: header("accept-language"),
    };

    let key = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    match state.pages.get(key) {
        Some((status, body)) => HttpResponse::build(
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        )
        .content_type("text/html; charset=utf-8")
        .body(body.clone()),
        None => HttpResponse::NotFound().finish(),
    }
}
