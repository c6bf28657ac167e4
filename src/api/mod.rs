use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    CalcError, GrowthResult, Page, SortConfig, SortOrder, TableRow, cagr, elss_lumpsum,
    elss_monthly, emi, filter_rows, fire_targets, goal_planning, lumpsum_future_value, paginate,
    retirement_plan, sip_future_value, sort_rows, swp_schedule,
};
use crate::data::{DataError, IndexSortKey, MarketDataClient, SmaSortKey};

const DEFAULT_PAGE: usize = 1;
const DEFAULT_PAGE_SIZE: usize = 25;

/// Savings style on the retirement planner; picks the accumulation return
/// assumption.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum SavingsType {
    #[serde(alias = "safe")]
    Safe,
    #[serde(alias = "aggressive")]
    Aggressive,
}

impl SavingsType {
    fn annual_return_pct(self) -> f64 {
        match self {
            SavingsType::Safe => 6.0,
            SavingsType::Aggressive => 10.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
enum ElssMode {
    #[serde(rename = "oneTime", alias = "one-time", alias = "lumpsum")]
    OneTime,
    #[serde(rename = "monthly")]
    Monthly,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SipPayload {
    monthly_investment: Option<f64>,
    years: Option<u32>,
    annual_step_up: Option<f64>,
    expected_return: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SwpPayload {
    lump_sum: Option<f64>,
    monthly_withdrawal: Option<f64>,
    months: Option<u32>,
    expected_return: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EmiPayload {
    loan_amount: Option<f64>,
    interest_rate: Option<f64>,
    years: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CagrPayload {
    initial_investment: Option<f64>,
    maturity_value: Option<f64>,
    years: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LumpsumPayload {
    principal: Option<f64>,
    expected_return: Option<f64>,
    years: Option<f64>,
    compounds_per_year: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementPayload {
    current_age: Option<u32>,
    monthly_expense: Option<f64>,
    retirement_age: Option<u32>,
    life_expectancy: Option<u32>,
    inflation_rate: Option<f64>,
    savings_type: Option<SavingsType>,
    expected_return: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FirePayload {
    monthly_expense: Option<f64>,
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    coast_age: Option<u32>,
    inflation_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoalPlanningPayload {
    financial_goal: Option<f64>,
    existing_investment: Option<f64>,
    years: Option<u32>,
    inflation_rate: Option<f64>,
    expected_return: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ElssPayload {
    mode: Option<ElssMode>,
    monthly_investment: Option<f64>,
    one_time_investment: Option<f64>,
    years: Option<u32>,
    expected_return: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CagrResponse {
    cagr_pct: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// View selection for the market tables: free-text search, a sort column
/// with direction, and a 1-based page window.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ViewParams<K> {
    search: Option<String>,
    sort_key: Option<K>,
    order: Option<SortOrder>,
    page: Option<usize>,
    page_size: Option<usize>,
}

// Derived Default would demand `K: Default`, which the sort-key enums
// deliberately do not implement.
impl<K> Default for ViewParams<K> {
    fn default() -> Self {
        Self {
            search: None,
            sort_key: None,
            order: None,
            page: None,
            page_size: None,
        }
    }
}

// The query deserializer cannot flatten a nested struct, so the view
// fields are repeated here instead of embedding `ViewParams`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SmaByDateParams {
    tp: Option<u32>,
    date: Option<String>,
    search: Option<String>,
    sort_key: Option<SmaSortKey>,
    order: Option<SortOrder>,
    page: Option<usize>,
    page_size: Option<usize>,
}

impl SmaByDateParams {
    fn view(self) -> ViewParams<SmaSortKey> {
        ViewParams {
            search: self.search,
            sort_key: self.sort_key,
            order: self.order,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn table_view<R>(rows: Vec<R>, params: ViewParams<R::SortKey>) -> Page<R>
where
    R: TableRow,
{
    let mut rows = filter_rows(rows, params.search.as_deref().unwrap_or(""));
    sort_rows(
        &mut rows,
        SortConfig {
            key: params.sort_key,
            order: params.order.unwrap_or_default(),
        },
    );
    paginate(
        rows,
        params.page.unwrap_or(DEFAULT_PAGE),
        params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    )
}

pub async fn run_http_server(port: u16, client: MarketDataClient) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(client);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "HTTP API listening");

    axum::serve(listener, app).await
}

fn router(client: MarketDataClient) -> Router {
    Router::new()
        .route("/api/tools/sip", get(sip_get_handler).post(sip_post_handler))
        .route("/api/tools/swp", get(swp_get_handler).post(swp_post_handler))
        .route("/api/tools/emi", get(emi_get_handler).post(emi_post_handler))
        .route(
            "/api/tools/cagr",
            get(cagr_get_handler).post(cagr_post_handler),
        )
        .route(
            "/api/tools/lumpsum",
            get(lumpsum_get_handler).post(lumpsum_post_handler),
        )
        .route(
            "/api/tools/retirement",
            get(retirement_get_handler).post(retirement_post_handler),
        )
        .route(
            "/api/tools/fire",
            get(fire_get_handler).post(fire_post_handler),
        )
        .route(
            "/api/tools/goal-planning",
            get(goal_planning_get_handler).post(goal_planning_post_handler),
        )
        .route(
            "/api/tools/elss",
            get(elss_get_handler).post(elss_post_handler),
        )
        .route("/api/markets/n-50", get(nifty50_handler))
        .route("/api/markets/sma/dates", get(sma_dates_handler))
        .route("/api/markets/sma/by-date", get(sma_by_date_handler))
        .route("/api/markets/sma/:tp", get(sma_handler))
        .fallback(not_found_handler)
        .with_state(Arc::new(client))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn sip_get_handler(Query(payload): Query<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

async fn sip_post_handler(Json(payload): Json<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

fn sip_handler_impl(payload: SipPayload) -> Response {
    calc_response(sip_future_value(
        payload.monthly_investment.unwrap_or(5_000.0),
        payload.years.unwrap_or(5),
        payload.annual_step_up.unwrap_or(10.0),
        payload.expected_return.unwrap_or(15.0),
    ))
}

async fn swp_get_handler(Query(payload): Query<SwpPayload>) -> Response {
    swp_handler_impl(payload)
}

async fn swp_post_handler(Json(payload): Json<SwpPayload>) -> Response {
    swp_handler_impl(payload)
}

fn swp_handler_impl(payload: SwpPayload) -> Response {
    calc_response(swp_schedule(
        payload.lump_sum.unwrap_or(100_000.0),
        payload.monthly_withdrawal.unwrap_or(1_000.0),
        payload.months.unwrap_or(12),
        payload.expected_return.unwrap_or(10.0),
    ))
}

async fn emi_get_handler(Query(payload): Query<EmiPayload>) -> Response {
    emi_handler_impl(payload)
}

async fn emi_post_handler(Json(payload): Json<EmiPayload>) -> Response {
    emi_handler_impl(payload)
}

fn emi_handler_impl(payload: EmiPayload) -> Response {
    calc_response(emi(
        payload.loan_amount.unwrap_or(1_000_000.0),
        payload.interest_rate.unwrap_or(6.5),
        payload.years.unwrap_or(5.0),
    ))
}

async fn cagr_get_handler(Query(payload): Query<CagrPayload>) -> Response {
    cagr_handler_impl(payload)
}

async fn cagr_post_handler(Json(payload): Json<CagrPayload>) -> Response {
    cagr_handler_impl(payload)
}

fn cagr_handler_impl(payload: CagrPayload) -> Response {
    calc_response(
        cagr(
            payload.initial_investment.unwrap_or(1_000.0),
            payload.maturity_value.unwrap_or(10_000.0),
            payload.years.unwrap_or(5.0),
        )
        .map(|cagr_pct| CagrResponse { cagr_pct }),
    )
}

async fn lumpsum_get_handler(Query(payload): Query<LumpsumPayload>) -> Response {
    lumpsum_handler_impl(payload)
}

async fn lumpsum_post_handler(Json(payload): Json<LumpsumPayload>) -> Response {
    lumpsum_handler_impl(payload)
}

fn lumpsum_handler_impl(payload: LumpsumPayload) -> Response {
    let principal = payload.principal.unwrap_or(100_000.0);
    calc_response(
        lumpsum_future_value(
            principal,
            payload.expected_return.unwrap_or(12.0),
            payload.years.unwrap_or(5.0),
            payload.compounds_per_year.unwrap_or(2),
        )
        .map(|future_value| GrowthResult {
            invested: principal,
            future_value,
            returns: future_value - principal,
        }),
    )
}

async fn retirement_get_handler(Query(payload): Query<RetirementPayload>) -> Response {
    retirement_handler_impl(payload)
}

async fn retirement_post_handler(Json(payload): Json<RetirementPayload>) -> Response {
    retirement_handler_impl(payload)
}

fn retirement_handler_impl(payload: RetirementPayload) -> Response {
    // An explicit expectedReturn wins over the savingsType presets.
    let return_pct = payload.expected_return.unwrap_or_else(|| {
        payload
            .savings_type
            .unwrap_or(SavingsType::Safe)
            .annual_return_pct()
    });
    calc_response(retirement_plan(
        payload.monthly_expense.unwrap_or(25_000.0),
        payload.current_age.unwrap_or(25),
        payload.retirement_age.unwrap_or(60),
        payload.life_expectancy.unwrap_or(80),
        payload.inflation_rate.unwrap_or(6.0),
        return_pct,
    ))
}

async fn fire_get_handler(Query(payload): Query<FirePayload>) -> Response {
    fire_handler_impl(payload)
}

async fn fire_post_handler(Json(payload): Json<FirePayload>) -> Response {
    fire_handler_impl(payload)
}

fn fire_handler_impl(payload: FirePayload) -> Response {
    let args = match build_fire_args(&payload) {
        Ok(args) => args,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    calc_response(fire_targets(
        args.monthly_expense,
        args.years_to_retirement,
        args.years_to_coast,
        args.inflation_pct,
    ))
}

#[derive(Debug)]
struct FireArgs {
    monthly_expense: f64,
    years_to_retirement: u32,
    years_to_coast: u32,
    inflation_pct: f64,
}

fn build_fire_args(payload: &FirePayload) -> Result<FireArgs, String> {
    let current_age = payload.current_age.unwrap_or(25);
    let retirement_age = payload.retirement_age.unwrap_or(40);
    let coast_age = payload.coast_age.unwrap_or(30);

    if retirement_age <= current_age {
        return Err("retirementAge must be > currentAge".to_string());
    }
    if coast_age < current_age {
        return Err("coastAge must be >= currentAge".to_string());
    }

    Ok(FireArgs {
        monthly_expense: payload.monthly_expense.unwrap_or(50_000.0),
        years_to_retirement: retirement_age - current_age,
        years_to_coast: coast_age - current_age,
        inflation_pct: payload.inflation_rate.unwrap_or(6.0),
    })
}

async fn goal_planning_get_handler(Query(payload): Query<GoalPlanningPayload>) -> Response {
    goal_planning_handler_impl(payload)
}

async fn goal_planning_post_handler(Json(payload): Json<GoalPlanningPayload>) -> Response {
    goal_planning_handler_impl(payload)
}

fn goal_planning_handler_impl(payload: GoalPlanningPayload) -> Response {
    calc_response(goal_planning(
        payload.financial_goal.unwrap_or(1_000_000.0),
        payload.existing_investment.unwrap_or(0.0),
        payload.years.unwrap_or(8),
        payload.inflation_rate.unwrap_or(7.0),
        payload.expected_return.unwrap_or(8.0),
    ))
}

async fn elss_get_handler(Query(payload): Query<ElssPayload>) -> Response {
    elss_handler_impl(payload)
}

async fn elss_post_handler(Json(payload): Json<ElssPayload>) -> Response {
    elss_handler_impl(payload)
}

fn elss_handler_impl(payload: ElssPayload) -> Response {
    let years = payload.years.unwrap_or(10);
    let expected_return = payload.expected_return.unwrap_or(12.0);
    let result = match payload.mode.unwrap_or(ElssMode::OneTime) {
        ElssMode::OneTime => elss_lumpsum(
            payload.one_time_investment.unwrap_or(25_000.0),
            years,
            expected_return,
        ),
        ElssMode::Monthly => elss_monthly(
            payload.monthly_investment.unwrap_or(5_000.0),
            years,
            expected_return,
        ),
    };
    calc_response(result)
}

async fn nifty50_handler(
    State(client): State<Arc<MarketDataClient>>,
    Query(params): Query<ViewParams<IndexSortKey>>,
) -> Response {
    match client.nifty50().await {
        Ok(rows) => json_response(StatusCode::OK, table_view(rows, params)),
        Err(err) => upstream_error_response(err),
    }
}

async fn sma_handler(
    State(client): State<Arc<MarketDataClient>>,
    Path(tp): Path<u32>,
    Query(params): Query<ViewParams<SmaSortKey>>,
) -> Response {
    if tp == 0 {
        return error_response(StatusCode::BAD_REQUEST, "tp must be > 0");
    }
    match client.sma(tp).await {
        Ok(rows) => json_response(StatusCode::OK, table_view(rows, params)),
        Err(err) => upstream_error_response(err),
    }
}

async fn sma_dates_handler(State(client): State<Arc<MarketDataClient>>) -> Response {
    match client.sma_dates().await {
        Ok(dates) => json_response(StatusCode::OK, dates),
        Err(err) => upstream_error_response(err),
    }
}

async fn sma_by_date_handler(
    State(client): State<Arc<MarketDataClient>>,
    Query(mut params): Query<SmaByDateParams>,
) -> Response {
    let Some(tp) = params.tp.filter(|tp| *tp > 0) else {
        return error_response(StatusCode::BAD_REQUEST, "tp must be > 0");
    };
    let Some(date) = params.date.take().filter(|d| !d.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "date is required");
    };
    match client.sma_by_date(tp, &date).await {
        Ok(rows) => json_response(StatusCode::OK, table_view(rows, params.view())),
        Err(err) => upstream_error_response(err),
    }
}

fn calc_response<T: Serialize>(result: Result<T, CalcError>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

fn upstream_error_response(err: DataError) -> Response {
    warn!(error = %err, "upstream fetch failed");
    error_response(StatusCode::BAD_GATEWAY, &err.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
