use crate::server::api::{self, ApiError, ApiState};

pub struct HttpResponse {
    pub status_code: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            content_type: "application/json",
            body,
        }
    }
}

pub fn route_request(state: &ApiState, method: &str, path: &str, body: &str) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    match (method, path) {
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, &err.to_string()),
        },
        ("GET", "/api/config") => match api::config_payload(state) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, &err.to_string()),
        },
        ("POST", "/api/optimize") => match api::optimize_payload(state, body) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => api_error_response(err),
        },
        ("POST", "/api/score") => match api::score_payload(state, body) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => api_error_response(err),
        },
        (_, "/api/health" | "/api/config" | "/api/optimize" | "/api/score") => {
            error_response(405, "method not allowed")
        }
        _ => error_response(404, "route not found"),
    }
}

fn api_error_response(err: ApiError) -> HttpResponse {
    match err {
        ApiError::Parse(err) => error_response(400, &format!("Invalid request body: {err}")),
        ApiError::Validation(details) => match serde_json::to_string_pretty(&details) {
            Ok(body) => HttpResponse {
                status_code: 400,
                content_type: "application/json",
                body,
            },
            Err(err) => error_response(500, &err.to_string()),
        },
        ApiError::Scoring(err) => error_response(422, &err.to_string()),
        ApiError::Serialize(err) => error_response(500, &err.to_string()),
    }
}

fn error_response(status_code: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "status": "error", "message": message }).to_string();
    HttpResponse {
        status_code,
        content_type: "application/json",
        body,
    }
}
