//! REST API for the combinatorics solvers.
//!
//! Provides endpoints for:
//! - One POST endpoint per solver (session required)
//! - OAuth login, callback and logout
//! - Health and info
//! - Swagger UI at /q/swagger-ui

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{self, CallerIdentity, OAuthClient, SessionStore};
use crate::config::AppConfig;
use crate::console::{self, SolveTimer};
use crate::dto::*;
use crate::error::{ApiError, ErrorResponse, Result as SolverResult};
use crate::solvers::bin_packing::{self, Bin};
use crate::solvers::graph_coloring::{self, ColorAssignment};
use crate::solvers::hamiltonian::{self, HamiltonianOutcome};
use crate::solvers::knapsack::{self, KnapsackSolution};
use crate::solvers::tsp::{self, Tour};
use crate::solvers::{partitions, ProblemKind};

/// Application state shared across handlers.
pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
    /// `None` when no OAuth provider is configured.
    pub oauth: Option<OAuthClient>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let oauth = config
            .oauth
            .clone()
            .map(|oauth| OAuthClient::new(oauth, &config.public_url));
        Self {
            sessions: SessionStore::new(config.session_ttl),
            oauth,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

/// Creates the API router with CORS, request tracing and Swagger UI enabled.
///
/// The configured static directory, when it exists, serves everything that
/// no API route matches.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info))
        // Authentication
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", get(auth::logout))
        // Solvers
        .route("/tsp", post(solve_tsp))
        .route("/knapsack", post(solve_knapsack))
        .route("/graph_coloring", post(solve_graph_coloring))
        .route("/hamiltonian_cycle", post(solve_hamiltonian_cycle))
        .route("/bin_packing", post(solve_bin_packing))
        .route("/partitions", post(solve_partitions))
        // Swagger UI at /q/swagger-ui (Quarkus-style path)
        .merge(SwaggerUi::new("/q/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if static_dir.is_dir() {
        router.fallback_service(ServeDir::new(static_dir))
    } else {
        router
    }
}

// ============================================================================
// Health & Info
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status indicator ("UP" when healthy).
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

/// Application info response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    /// Application name.
    pub name: &'static str,
    /// Application version.
    pub version: &'static str,
    /// Endpoint names of the available solvers.
    pub problems: Vec<&'static str>,
    /// Whether `/login` is available.
    pub login_enabled: bool,
}

/// GET /info - Application info endpoint.
#[utoipa::path(
    get,
    path = "/info",
    responses((status = 200, description = "Application info", body = InfoResponse))
)]
async fn info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Combinatorics Solver",
        version: env!("CARGO_PKG_VERSION"),
        problems: ProblemKind::ALL.iter().map(|p| p.as_str()).collect(),
        login_enabled: state.oauth.is_some(),
    })
}

// ============================================================================
// Solver dispatch
// ============================================================================

/// Short human-readable description of a solver result, used in logs.
trait SolveSummary {
    fn summary(&self) -> String;
}

impl SolveSummary for Tour {
    fn summary(&self) -> String {
        format!("length {:.3}", self.length)
    }
}

impl SolveSummary for KnapsackSolution {
    fn summary(&self) -> String {
        format!("value {} with {} items", self.max_value, self.selected.len())
    }
}

impl SolveSummary for ColorAssignment {
    fn summary(&self) -> String {
        format!("{} colors", self.color_count())
    }
}

impl SolveSummary for HamiltonianOutcome {
    fn summary(&self) -> String {
        match self {
            HamiltonianOutcome::Cycle(_) => "cycle found".to_string(),
            HamiltonianOutcome::NoCycle => "no cycle".to_string(),
        }
    }
}

impl SolveSummary for Vec<Bin> {
    fn summary(&self) -> String {
        format!("{} bins", self.len())
    }
}

impl SolveSummary for u128 {
    fn summary(&self) -> String {
        self.to_string()
    }
}

/// Unwraps a parsed body and validates it, logging rejections.
fn validated<R, T>(
    problem: ProblemKind,
    payload: Result<Json<R>, JsonRejection>,
    validate: impl FnOnce(R) -> SolverResult<T>,
) -> Result<T, ApiError> {
    let result = match payload {
        Ok(Json(request)) => validate(request).map_err(ApiError::from),
        Err(rejection) => Err(ApiError::from(rejection)),
    };
    if let Err(ApiError::BadRequest(reason)) = &result {
        warn!(problem = %problem, reason = %reason, "Rejected invalid input");
        console::print_solve_rejected(problem, reason);
    }
    result
}

/// Runs a solver on the blocking pool and logs the outcome.
async fn run_solver<T, F>(
    caller: &CallerIdentity,
    problem: ProblemKind,
    input_size: usize,
    solve: F,
) -> Result<T, ApiError>
where
    T: SolveSummary + Send + 'static,
    F: FnOnce() -> SolverResult<T> + Send + 'static,
{
    let timer = SolveTimer::start(problem, input_size);
    let result = tokio::task::spawn_blocking(solve).await?;

    match result {
        Ok(solution) => {
            let summary = solution.summary();
            let elapsed = timer.finish(&summary);
            info!(
                problem = %problem,
                caller = %caller.subject,
                input_size,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                result = %summary,
                "Solved"
            );
            Ok(solution)
        }
        Err(e) => {
            warn!(problem = %problem, caller = %caller.subject, error = %e, "Solver rejected input");
            console::print_solve_rejected(problem, &e.to_string());
            Err(e.into())
        }
    }
}

/// POST /tsp - Shortest closed tour by exhaustive search.
#[utoipa::path(
    post,
    path = "/tsp",
    request_body = TspRequest,
    responses(
        (status = 200, description = "Optimal tour", body = TspResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "No valid session", body = ErrorResponse)
    )
)]
async fn solve_tsp(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    payload: Result<Json<TspRequest>, JsonRejection>,
) -> Result<Json<TspResponse>, ApiError> {
    let cities = validated(ProblemKind::Tsp, payload, |r: TspRequest| r.into_domain(&state.config.limits))?;
    let tour = run_solver(&caller, ProblemKind::Tsp, cities.len(), move || tsp::solve(&cities)).await?;
    Ok(Json(tour.into()))
}

/// POST /knapsack - Maximum value 0/1 knapsack.
#[utoipa::path(
    post,
    path = "/knapsack",
    request_body = KnapsackRequest,
    responses(
        (status = 200, description = "Maximum value", body = KnapsackResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "No valid session", body = ErrorResponse)
    )
)]
async fn solve_knapsack(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    payload: Result<Json<KnapsackRequest>, JsonRejection>,
) -> Result<Json<KnapsackResponse>, ApiError> {
    let (items, capacity) =
        validated(ProblemKind::Knapsack, payload, |r: KnapsackRequest| r.into_domain(&state.config.limits))?;
    let solution = run_solver(&caller, ProblemKind::Knapsack, items.len(), move || {
        knapsack::solve(&items, capacity)
    })
    .await?;
    Ok(Json(solution.into()))
}

/// POST /graph_coloring - Greedy proper coloring.
#[utoipa::path(
    post,
    path = "/graph_coloring",
    request_body = GraphColoringRequest,
    responses(
        (status = 200, description = "Color per node", body = GraphColoringResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "No valid session", body = ErrorResponse)
    )
)]
async fn solve_graph_coloring(
    caller: CallerIdentity,
    payload: Result<Json<GraphColoringRequest>, JsonRejection>,
) -> Result<Json<GraphColoringResponse>, ApiError> {
    let graph = validated(ProblemKind::GraphColoring, payload, GraphColoringRequest::into_domain)?;
    let color_assignment = run_solver(&caller, ProblemKind::GraphColoring, graph.len(), move || {
        graph_coloring::solve(&graph)
    })
    .await?;
    Ok(Json(GraphColoringResponse { color_assignment }))
}

/// POST /hamiltonian_cycle - Backtracking search for a cycle through node 0.
#[utoipa::path(
    post,
    path = "/hamiltonian_cycle",
    request_body = HamiltonianCycleRequest,
    responses(
        (status = 200, description = "Cycle, or a message when none exists", body = HamiltonianCycleResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "No valid session", body = ErrorResponse)
    )
)]
async fn solve_hamiltonian_cycle(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    payload: Result<Json<HamiltonianCycleRequest>, JsonRejection>,
) -> Result<Json<HamiltonianCycleResponse>, ApiError> {
    let graph = validated(ProblemKind::HamiltonianCycle, payload, |r: HamiltonianCycleRequest| {
        r.into_domain(&state.config.limits)
    })?;
    let outcome = run_solver(&caller, ProblemKind::HamiltonianCycle, graph.size(), move || {
        hamiltonian::solve(&graph)
    })
    .await?;
    Ok(Json(outcome.into()))
}

/// POST /bin_packing - First-fit-decreasing bin packing.
#[utoipa::path(
    post,
    path = "/bin_packing",
    request_body = BinPackingRequest,
    responses(
        (status = 200, description = "Packed bins", body = BinPackingResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "No valid session", body = ErrorResponse)
    )
)]
async fn solve_bin_packing(
    caller: CallerIdentity,
    payload: Result<Json<BinPackingRequest>, JsonRejection>,
) -> Result<Json<BinPackingResponse>, ApiError> {
    let (items, bin_capacity) =
        validated(ProblemKind::BinPacking, payload, BinPackingRequest::into_domain)?;
    let bins = run_solver(&caller, ProblemKind::BinPacking, items.len(), move || {
        bin_packing::solve(&items, bin_capacity)
    })
    .await?;
    Ok(Json(bins.into()))
}

/// POST /partitions - Number of integer partitions.
#[utoipa::path(
    post,
    path = "/partitions",
    request_body = PartitionsRequest,
    responses(
        (status = 200, description = "Partition count", body = PartitionsResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "No valid session", body = ErrorResponse)
    )
)]
async fn solve_partitions(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    payload: Result<Json<PartitionsRequest>, JsonRejection>,
) -> Result<Json<PartitionsResponse>, ApiError> {
    let number =
        validated(ProblemKind::Partitions, payload, |r: PartitionsRequest| {
            r.into_domain(&state.config.limits)
        })?;
    let input_size = usize::try_from(number).unwrap_or(usize::MAX);
    let partition_count =
        run_solver(&caller, ProblemKind::Partitions, input_size, move || partitions::count(number))
            .await?;
    Ok(Json(PartitionsResponse { partition_count }))
}

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        info,
        solve_tsp,
        solve_knapsack,
        solve_graph_coloring,
        solve_hamiltonian_cycle,
        solve_bin_packing,
        solve_partitions,
    ),
    components(schemas(
        HealthResponse,
        InfoResponse,
        ErrorResponse,
        TspRequest,
        TspResponse,
        ItemDto,
        KnapsackRequest,
        KnapsackResponse,
        GraphColoringRequest,
        GraphColoringResponse,
        HamiltonianCycleRequest,
        HamiltonianCycleResponse,
        BinPackingRequest,
        BinPackingResponse,
        PartitionsRequest,
        PartitionsResponse,
    ))
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::default())
    }

    fn login(state: &AppState) -> String {
        let id = state.sessions.create(json!({ "sub": "auth0|tester" }));
        format!("session={}", id)
    }

    async fn post_json(
        state: Arc<AppState>,
        path: &str,
        cookie: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let response = create_router(state)
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let response = create_router(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_solver_requires_session() {
        let state = test_state();
        let (status, body) =
            post_json(state.clone(), "/partitions", None, json!({ "number": 4 })).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Unauthorized access" }));

        let forged = format!("session={}", uuid::Uuid::new_v4());
        let (status, _) =
            post_json(state, "/partitions", Some(&forged), json!({ "number": 4 })).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unauthorized_wins_over_bad_body() {
        let (status, _) = post_json(test_state(), "/tsp", None, json!({})).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_tsp_endpoint() {
        let state = test_state();
        let cookie = login(&state);
        let (status, body) = post_json(
            state,
            "/tsp",
            Some(&cookie),
            json!({ "cities": [[0, 0], [0, 1], [1, 1], [1, 0]] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["best_route"], json!([0, 1, 2, 3]));
        assert_eq!(body["total_distance"], json!(4.0));
    }

    #[tokio::test]
    async fn test_tsp_missing_cities() {
        let state = test_state();
        let cookie = login(&state);
        let (status, body) = post_json(state, "/tsp", Some(&cookie), json!({ "cities": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required field: cities");
    }

    #[tokio::test]
    async fn test_knapsack_endpoint() {
        let state = test_state();
        let cookie = login(&state);
        let (status, body) = post_json(
            state.clone(),
            "/knapsack",
            Some(&cookie),
            json!({
                "items": [
                    { "weight": 2, "value": 3 },
                    { "weight": 3, "value": 4 },
                    { "weight": 4, "value": 5 }
                ],
                "capacity": 5
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["max_value"], 7);

        let (status, _) =
            post_json(state.clone(), "/knapsack", Some(&cookie), json!({ "items": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let items = vec![json!({ "weight": 1, "value": 1 }); 5000];
        let (status, _) = post_json(
            state,
            "/knapsack",
            Some(&cookie),
            json!({ "items": items, "capacity": 1_000_000 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_graph_coloring_endpoint_keeps_order() {
        let state = test_state();
        let cookie = login(&state);
        let (status, body) = post_json(
            state,
            "/graph_coloring",
            Some(&cookie),
            json!({ "graph": { "0": [1, 2], "1": [0, 2], "2": [0, 1], "3": [] } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["color_assignment"],
            json!({ "0": 0, "1": 1, "2": 2, "3": 0 })
        );
    }

    #[tokio::test]
    async fn test_graph_coloring_endpoint_accepts_string_neighbors() {
        let state = test_state();
        let cookie = login(&state);
        let (status, body) = post_json(
            state,
            "/graph_coloring",
            Some(&cookie),
            json!({ "graph": { "0": ["1"], "1": ["0"] } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["color_assignment"], json!({ "0": 0, "1": 1 }));
    }

    #[tokio::test]
    async fn test_hamiltonian_endpoint() {
        let state = test_state();
        let cookie = login(&state);
        let (status, body) = post_json(
            state.clone(),
            "/hamiltonian_cycle",
            Some(&cookie),
            json!({ "graph": [[0, 1, 1], [1, 0, 1], [1, 1, 0]] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "cycle": [0, 1, 2, 0] }));

        let (status, body) = post_json(
            state.clone(),
            "/hamiltonian_cycle",
            Some(&cookie),
            json!({ "graph": [[0, 1], [0, 0]] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "No Hamiltonian cycle found" }));

        let (status, _) = post_json(
            state.clone(),
            "/hamiltonian_cycle",
            Some(&cookie),
            json!({ "graph": [[0, 1]] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post_json(
            state,
            "/hamiltonian_cycle",
            Some(&cookie),
            json!({ "graph": vec![vec![0; 21]; 21] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Too many nodes: 21 (at most 20 are supported)");
    }

    #[tokio::test]
    async fn test_bin_packing_endpoint() {
        let state = test_state();
        let cookie = login(&state);
        let (status, body) = post_json(
            state.clone(),
            "/bin_packing",
            Some(&cookie),
            json!({ "items": [4, 8, 1, 4, 2, 1], "bin_capacity": 10 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bins"].as_array().map(Vec::len), Some(2));

        let (status, body) = post_json(
            state,
            "/bin_packing",
            Some(&cookie),
            json!({ "items": [1], "bin_capacity": 0 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required field: bin_capacity");
    }

    #[tokio::test]
    async fn test_partitions_endpoint() {
        let state = test_state();
        let cookie = login(&state);
        let (status, body) =
            post_json(state.clone(), "/partitions", Some(&cookie), json!({ "number": 10 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "partition_count": 42 }));

        let (status, _) =
            post_json(state, "/partitions", Some(&cookie), json!({ "number": "ten" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_without_provider_is_unavailable() {
        let response = create_router(test_state())
            .oneshot(Request::get("/login").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let state = test_state();
        let cookie = login(&state);
        assert_eq!(state.sessions.len(), 1);

        let response = create_router(state.clone())
            .oneshot(
                Request::get("/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert!(state.sessions.is_empty());

        let (status, _) =
            post_json(state, "/partitions", Some(&cookie), json!({ "number": 1 })).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
