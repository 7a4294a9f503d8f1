use crate::application::use_cases::fingerprint::compute_fingerprint;
use crate::application::{LostItemAnalysisUseCase, ResultCache};
use crate::domain::activity::ActivityEntry;
use crate::domain::error::AppError;
use crate::domain::fingerprint::Fingerprint;
use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{delete, dev::Server, get, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};
use validator::Validate;

pub struct HttpState {
    pub analysis: Arc<LostItemAnalysisUseCase>,
    pub cache: Mutex<ResultCache>,
}

impl HttpState {
    pub fn new(analysis: Arc<LostItemAnalysisUseCase>, cache: ResultCache) -> Self {
        Self {
            analysis,
            cache: Mutex::new(cache),
        }
    }

    fn cache(&self) -> MutexGuard<'_, ResultCache> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintRequest {
    #[validate(length(max = 100))]
    pub activities: Vec<ActivityEntry>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub lost_item: Option<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[validate(length(max = 100))]
    pub activities: Vec<ActivityEntry>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub lost_item: Option<String>,
    /// Skip the cache lookup and ask the model again.
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Serialize, Deserialize)]
pub struct FingerprintResponse {
    pub fingerprint: Fingerprint,
}

#[derive(Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub fingerprint: Fingerprint,
    pub result: String,
    pub cached: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub credential_configured: bool,
}

pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        AppError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        AppError::RemoteService(_) => StatusCode::BAD_GATEWAY,
        AppError::Cancelled(_) => StatusCode::REQUEST_TIMEOUT,
    }
}

fn error_response(err: &AppError) -> HttpResponse {
    HttpResponse::build(status_for(err)).json(err)
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    error_response(&AppError::ValidationError(errors.to_string()))
}

/// Bodies that fail to deserialize get the same JSON error shape as validator failures.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = error_response(&AppError::ValidationError(err.to_string()));
    InternalError::from_response(err, response).into()
}

#[post("/fingerprint")]
async fn create_fingerprint(req: web::Json<FingerprintRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let fingerprint = compute_fingerprint(&req.activities, req.lost_item.as_deref());
    HttpResponse::Ok().json(FingerprintResponse { fingerprint })
}

#[post("/analyze")]
async fn analyze_activities(data: web::Data<HttpState>, req: web::Json<AnalyzeRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let activities = &req.activities;
    let lost_item = req.lost_item.as_deref();
    let fingerprint = compute_fingerprint(activities, lost_item);

    if !req.refresh {
        let cached = data.cache().get(&fingerprint);
        if let Some(result) = cached {
            info!(fingerprint = %fingerprint, "Serving analysis from cache");
            return HttpResponse::Ok().json(AnalyzeResponse {
                fingerprint,
                result,
                cached: true,
            });
        }
    }

    info!(
        fingerprint = %fingerprint,
        activity_count = activities.len(),
        refresh = req.refresh,
        "Analyzing activities"
    );

    match data.analysis.analyze(activities, lost_item).await {
        Ok(result) => {
            data.cache().put(fingerprint.clone(), result.clone());
            HttpResponse::Ok().json(AnalyzeResponse {
                fingerprint,
                result,
                cached: false,
            })
        }
        Err(err) => {
            warn!(fingerprint = %fingerprint, kind = err.kind(), "Analysis failed");
            error_response(&err)
        }
    }
}

#[get("/health")]
async fn health_check(data: web::Data<HttpState>) -> impl Responder {
    let config = data.analysis.config();
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model: config.model.clone(),
        credential_configured: config.credential().is_some(),
    })
}

#[get("/cache/stats")]
async fn cache_stats(data: web::Data<HttpState>) -> impl Responder {
    let stats = data.cache().stats();
    HttpResponse::Ok().json(stats)
}

#[delete("/cache")]
async fn clear_cache(data: web::Data<HttpState>) -> impl Responder {
    data.cache().clear();
    info!("Result cache cleared");
    HttpResponse::NoContent().finish()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .service(create_fingerprint)
            .service(analyze_activities)
            .service(health_check)
            .service(cache_stats)
            .service(clear_cache),
    );
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::Result;
    use crate::domain::llm_config::LLMConfig;
    use crate::domain::prompt::PromptLanguage;
    use crate::infrastructure::llm_clients::LLMClient;
    use actix_web::test;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingClient {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl LLMClient for CountingClient {
        async fn generate(&self, _config: &LLMConfig, _prompt: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(AppError::RemoteService("API error (503)".to_string()));
            }
            Ok(format!("ranking #{}", call))
        }
    }

    fn state_with(client: Arc<CountingClient>, api_key: Option<&str>) -> web::Data<HttpState> {
        let config = LLMConfig {
            api_key: api_key.map(str::to_string),
            ..Default::default()
        };
        let analysis = LostItemAnalysisUseCase::new(client, config, PromptLanguage::Indonesian);
        web::Data::new(HttpState::new(Arc::new(analysis), ResultCache::new(16, 3600)))
    }

    fn counting(fail: bool) -> Arc<CountingClient> {
        Arc::new(CountingClient {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    fn wallet_body() -> serde_json::Value {
        json!({
            "activities": [{
                "location": "Mall ABC, Jakarta",
                "activity": "shopping",
                "startTime": "10:00",
                "endTime": "11:00"
            }],
            "lostItem": "wallet"
        })
    }

    #[actix_web::test]
    async fn test_fingerprint_endpoint_matches_library() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(counting(false), None))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/fingerprint")
            .set_json(wallet_body())
            .to_request();
        let resp: FingerprintResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.fingerprint.as_str(), "ai-result--1554957973");
    }

    #[actix_web::test]
    async fn test_analyze_caches_by_fingerprint() {
        let client = counting(false);
        let app = test::init_service(
            App::new()
                .app_data(state_with(client.clone(), Some("key")))
                .configure(configure),
        )
        .await;

        let first: AnalyzeResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/analyze")
                .set_json(wallet_body())
                .to_request(),
        )
        .await;
        assert!(!first.cached);
        assert_eq!(first.result, "ranking #1");

        let second: AnalyzeResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/analyze")
                .set_json(wallet_body())
                .to_request(),
        )
        .await;
        assert!(second.cached);
        assert_eq!(second.result, "ranking #1");
        assert_eq!(second.fingerprint, first.fingerprint);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);

        let mut refresh = wallet_body();
        refresh["refresh"] = json!(true);
        let third: AnalyzeResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/analyze")
                .set_json(refresh)
                .to_request(),
        )
        .await;
        assert!(!third.cached);
        assert_eq!(third.result, "ranking #2");
    }

    #[actix_web::test]
    async fn test_analyze_without_credential_is_unavailable() {
        let client = counting(false);
        let app = test::init_service(
            App::new()
                .app_data(state_with(client.clone(), None))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/analyze")
                .set_json(wallet_body())
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "Configuration");
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_remote_failure_is_bad_gateway_and_not_cached() {
        let client = counting(true);
        let state = state_with(client.clone(), Some("key"));
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/analyze")
                .set_json(wallet_body())
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(state.cache().stats().entries, 0);
    }

    #[actix_web::test]
    async fn test_rejects_oversized_lost_item() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(counting(false), Some("key")))
                .configure(configure),
        )
        .await;

        let mut body = wallet_body();
        body["lostItem"] = json!("x".repeat(201));
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/fingerprint")
                .set_json(body)
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_malformed_body_returns_validation_error() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(counting(false), Some("key")))
                .configure(configure),
        )
        .await;

        for uri in ["/api/fingerprint", "/api/analyze"] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(uri)
                    .set_json(json!({"activities": [{"location": "x"}]}))
                    .to_request(),
            )
            .await;

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["kind"], "ValidationError");
            assert!(body["message"].is_string());
        }
    }

    #[actix_web::test]
    async fn test_rejects_too_many_activities() {
        let client = counting(false);
        let app = test::init_service(
            App::new()
                .app_data(state_with(client.clone(), Some("key")))
                .configure(configure),
        )
        .await;

        let entry = wallet_body()["activities"][0].clone();
        let mut body = wallet_body();
        body["activities"] = json!(vec![entry.clone(); 101]);
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/analyze")
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "ValidationError");
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);

        let mut body = wallet_body();
        body["activities"] = json!(vec![entry; 100]);
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/fingerprint")
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_error_status_mapping() {
        let resp = error_response(&AppError::Cancelled("request cancelled".to_string()));
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["kind"], "Cancelled");
        assert_eq!(body["message"], "request cancelled");

        assert_eq!(
            status_for(&AppError::ValidationError("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AppError::Configuration("x".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&AppError::RemoteService("x".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[actix_web::test]
    async fn test_health_and_cache_endpoints() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(counting(false), Some("key")))
                .configure(configure),
        )
        .await;

        let health_body: HealthResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/health").to_request(),
        )
        .await;
        assert_eq!(health_body.model, "gemini-2.5-flash");
        assert!(health_body.credential_configured);

        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/analyze")
                .set_json(wallet_body())
                .to_request(),
        )
        .await;

        let stats: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/cache/stats").to_request(),
        )
        .await;
        assert_eq!(stats["entries"], 1);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete().uri("/api/cache").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let stats: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/cache/stats").to_request(),
        )
        .await;
        assert_eq!(stats["entries"], 0);
    }
}
