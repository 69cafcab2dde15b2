use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Json, Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::core::{
    DEFAULT_QUBITS, DEFAULT_STRENGTH, ModelKind, SimulationInputs, SimulationResult, WorkDelay,
    run_simulation, simulation_rng,
};
use crate::error::{ServeError, SimulateError};

const INDEX_HTML: &str = include_str!("../../web/index.html");

struct AppState {
    /// Cross-origin allow-list plus the server's own origins.
    accepted_origins: Vec<HeaderValue>,
    work_delay: WorkDelay,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SimulatePayload {
    #[serde(deserialize_with = "present")]
    qubits: Option<Value>,
    #[serde(deserialize_with = "present")]
    strength: Option<Value>,
    #[serde(deserialize_with = "present")]
    model: Option<Value>,
    #[serde(deserialize_with = "present")]
    seed: Option<Value>,
}

/// Keeps an explicit `null` distinct from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy)]
struct SimulationRequest {
    inputs: SimulationInputs,
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(config: &ServerConfig) -> Result<Router, ServeError> {
    let allowed_origins = config.origin_header_values()?;
    let mut accepted_origins = allowed_origins.clone();
    accepted_origins.extend(config.self_origins()?);
    let state = Arc::new(AppState {
        accepted_origins,
        work_delay: config.work_delay,
        seed: config.seed,
    });

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let simulate = Router::new()
        .route("/simulate", post(simulate_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), origin_guard))
        .layer(cors);

    Ok(Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .merge(simulate)
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

pub async fn run_http_server(config: ServerConfig) -> Result<(), ServeError> {
    let addr = config.socket_addr()?;
    let app = router(&config)?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!(address = %addr, "pulse-sim HTTP API listening");
    info!(
        origins = ?config.allowed_origins,
        work_delay_ms = config.work_delay.duration().as_millis() as u64,
        "cross-origin allow-list for /simulate"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request = match simulation_request_from_body(&body) {
        Ok(request) => request,
        Err(err) => {
            error!(error = %err, "Error during simulation");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
        }
    };

    let inputs = request.inputs;
    let model = inputs.model.label().unwrap_or("unrecognised");
    debug!(
        qubits = inputs.qubits,
        strength = inputs.strength,
        model,
        "running simulation"
    );

    let result = match simulate(request, state.seed) {
        Ok(result) => result,
        Err(err) => {
            error!(error = %err, "Error during simulation");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
        }
    };
    state.work_delay.wait().await;

    info!(
        model,
        final_energy = result.final_energy,
        learning_time = result.learning_time,
        model_params = result.model_params,
        "simulation complete"
    );
    json_response(StatusCode::OK, result)
}

fn simulate(
    request: SimulationRequest,
    fallback_seed: Option<u64>,
) -> Result<SimulationResult, SimulateError> {
    let mut rng = simulation_rng(request.seed.or(fallback_seed));
    let result = run_simulation(&request.inputs, &mut rng);
    if !result.is_finite() {
        return Err(SimulateError::NonFinite {
            qubits: request.inputs.qubits,
            strength: request.inputs.strength,
        });
    }
    Ok(result)
}

/// Rejects cross-origin calls from outside the allow-list before they reach
/// the handler. Requests without an `Origin` header pass through, and the
/// server's own configured origins count as allowed. The client's `Host`
/// header is never trusted for this.
async fn origin_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !state.accepted_origins.contains(origin) {
            warn!(origin = ?origin, "rejected cross-origin request");
            return error_response(StatusCode::FORBIDDEN, "Origin not allowed");
        }
    }
    next.run(request).await
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn simulation_request_from_body(body: &[u8]) -> Result<SimulationRequest, SimulateError> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(SimulateError::NotAnObject(json_kind(&value)));
    }
    let payload: SimulatePayload = serde_json::from_value(value)?;
    simulation_request_from_payload(payload)
}

fn simulation_request_from_payload(
    payload: SimulatePayload,
) -> Result<SimulationRequest, SimulateError> {
    Ok(SimulationRequest {
        inputs: SimulationInputs {
            qubits: coerce_qubits(payload.qubits.as_ref())?,
            strength: coerce_strength(payload.strength.as_ref())?,
            model: coerce_model(payload.model.as_ref()),
        },
        seed: coerce_seed(payload.seed.as_ref())?,
    })
}

/// Python-style `int()` coercion into a 32-bit count. Negative counts are
/// passed through to the formulas unchanged.
fn coerce_qubits(value: Option<&Value>) -> Result<i32, SimulateError> {
    let Some(value) = value else {
        return Ok(DEFAULT_QUBITS);
    };
    let invalid = |reason: String| SimulateError::invalid_field("qubits", reason);

    let count = match value {
        Value::Bool(flag) => i64::from(*flag),
        Value::Number(number) => {
            if let Some(v) = number.as_i64() {
                v
            } else if let Some(v) = number.as_u64() {
                return Err(invalid(format!("{v} is out of range")));
            } else {
                let v = number.as_f64().unwrap_or(f64::NAN);
                if !v.is_finite() || v.abs() > i64::MAX as f64 {
                    return Err(invalid(format!("{v} is not a finite integer")));
                }
                v.trunc() as i64
            }
        }
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(format!("'{text}' is not an integer")))?,
        other => return Err(invalid(format!("expected a number, got {}", json_kind(other)))),
    };

    i32::try_from(count).map_err(|_| invalid(format!("{count} is out of range")))
}

fn coerce_strength(value: Option<&Value>) -> Result<f64, SimulateError> {
    let Some(value) = value else {
        return Ok(DEFAULT_STRENGTH);
    };
    let invalid = |reason: String| SimulateError::invalid_field("strength", reason);

    let strength = match value {
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| invalid(format!("{number} is not representable")))?,
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("'{text}' is not a number")))?,
        other => return Err(invalid(format!("expected a number, got {}", json_kind(other)))),
    };

    if !strength.is_finite() {
        return Err(invalid(format!("{strength} is not finite")));
    }
    Ok(strength)
}

fn coerce_model(value: Option<&Value>) -> ModelKind {
    match value {
        None => ModelKind::default(),
        Some(Value::String(label)) => ModelKind::from_label(label),
        Some(_) => ModelKind::Unknown,
    }
}

fn coerce_seed(value: Option<&Value>) -> Result<Option<u64>, SimulateError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number.as_u64().map(Some).ok_or_else(|| {
            SimulateError::invalid_field("seed", format!("{number} is not a non-negative integer"))
        }),
        Some(other) => Err(SimulateError::invalid_field(
            "seed",
            format!("expected an integer, got {}", json_kind(other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
