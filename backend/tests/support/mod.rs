//! Stub prediction services for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so the
//! stub lives here and each test crate pulls it in with `mod support;`.

use std::collections::HashMap;
use std::net::TcpListener;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::header;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use namesake::outbound::predictors::{MAX_BODY_BYTES, PredictorEndpoint};
use serde_json::json;
use url::Url;

pub const API_TOKEN: &str = "stub-token";

/// How long the `/slow` route stalls before answering.
pub const STALL: Duration = Duration::from_secs(5);

fn authorised(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {API_TOKEN}"))
}

fn name_of(query: &HashMap<String, String>) -> String {
    query.get("name").cloned().unwrap_or_default()
}

async fn agify(req: HttpRequest, query: web::Query<HashMap<String, String>>) -> HttpResponse {
    if !authorised(&req) {
        return HttpResponse::Unauthorized().body("missing token");
    }
    let name = name_of(&query);
    let age = match name.as_str() {
        "Nobody" => None,
        "Methuselah" => Some(3_000_000_000_u64),
        _ => Some(42),
    };
    HttpResponse::Ok().json(json!({ "count": 1, "name": name, "age": age }))
}

async fn genderize(req: HttpRequest, query: web::Query<HashMap<String, String>>) -> HttpResponse {
    if !authorised(&req) {
        return HttpResponse::Unauthorized().body("missing token");
    }
    let name = name_of(&query);
    HttpResponse::Ok().json(json!({
        "count": 1,
        "name": name,
        "gender": "male",
        "probability": 0.99
    }))
}

async fn nationalize(req: HttpRequest, query: web::Query<HashMap<String, String>>) -> HttpResponse {
    if !authorised(&req) {
        return HttpResponse::Unauthorized().body("missing token");
    }
    HttpResponse::Ok().json(json!({
        "count": 1,
        "name": name_of(&query),
        "country": [
            { "country_id": "UA", "probability": 0.3 },
            { "country_id": "RU", "probability": 0.6 }
        ]
    }))
}

/// Reflects the authorization header and decoded name as the gender.
async fn echo(req: HttpRequest, query: web::Query<HashMap<String, String>>) -> HttpResponse {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let name = name_of(&query);
    HttpResponse::Ok().json(json!({
        "name": name,
        "gender": format!("{authorization}|{name}")
    }))
}

async fn rejects() -> HttpResponse {
    HttpResponse::TooManyRequests().body("  rate\n  limited  ")
}

async fn huge() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(vec![b' '; MAX_BODY_BYTES + 1])
}

async fn slow() -> HttpResponse {
    actix_web::rt::time::sleep(STALL).await;
    HttpResponse::Ok().json(json!({ "age": 1, "gender": "female", "country": [] }))
}

/// A running stub server and its base URL.
pub struct StubPredictors {
    pub base: Url,
    pub handle: ServerHandle,
}

impl StubPredictors {
    /// Endpoint for `path` authenticated with `token`.
    pub fn endpoint_with_token(&self, path: &str, token: &str) -> PredictorEndpoint {
        PredictorEndpoint {
            url: self.base.join(path).expect("stub path"),
            api_token: token.to_owned(),
        }
    }

    /// Endpoint for `path` authenticated with [`API_TOKEN`].
    pub fn endpoint(&self, path: &str) -> PredictorEndpoint {
        self.endpoint_with_token(path, API_TOKEN)
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// Serve the stub routes on an ephemeral localhost port.
pub fn spawn_stub_predictors() -> StubPredictors {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");

    let server = HttpServer::new(|| {
        App::new()
            .route("/agify", web::get().to(agify))
            .route("/genderize", web::get().to(genderize))
            .route("/nationalize", web::get().to(nationalize))
            .route("/echo", web::get().to(echo))
            .route("/rejects", web::get().to(rejects))
            .route("/huge", web::get().to(huge))
            .route("/slow", web::get().to(slow))
    })
    .disable_signals()
    .workers(1)
    .shutdown_timeout(0)
    .listen(listener)
    .expect("listen on stub socket")
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    StubPredictors {
        base: Url::parse(&format!("http://{addr}/")).expect("stub base url"),
        handle,
    }
}
