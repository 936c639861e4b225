//! HTTP handler functions for the violation map API.
//!
//! Validation failures answer with a 400 naming the offending field; store
//! failures are logged and answered with a generic 500. Payloads are
//! wrapped as `{ "data": ... }` to match what the dashboard hooks expect.

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use violation_map_analytics::{AnalyticsError, tools};
use violation_map_analytics_models::{
    Granularity, HistogramParams, LocationQuery, RangeParams, StreetQuery, SummaryParams,
    ViolationTypeQuery,
};
use violation_map_server_models::{
    ApiHealth, DateRangeBody, GranularityQueryParams, PeriodQueryParams, RangeBody,
    SearchQueryParams, SummaryQueryParams, YearQueryParams, parse_date_input,
};
use violation_map_temporal::Period;

use crate::AppState;

fn error_response(e: &AnalyticsError) -> HttpResponse {
    match e {
        AnalyticsError::Validation { field, message } => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": message,
                "field": field,
            }))
        }
        AnalyticsError::Store(err) => {
            log::error!("Store query failed: {err}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

fn parse_period(value: &str) -> Result<Period, HttpResponse> {
    value.parse::<Period>().map_err(|_| {
        HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Unknown period '{value}'. Expected one of: day, week, month, year"),
            "field": "period",
        }))
    })
}

fn parse_date_field(value: &str, field: &str) -> Result<NaiveDate, HttpResponse> {
    parse_date_input(value).ok_or_else(|| {
        HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Invalid date '{value}'. Expected format: YYYY-MM-DD"),
            "field": field,
        }))
    })
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/violations`
///
/// With `?period=`, returns the per-dimension stats for the rolling
/// current window; without it, returns every recorded violation.
pub async fn violations(
    state: web::Data<AppState>,
    params: web::Query<PeriodQueryParams>,
) -> HttpResponse {
    if let Some(period) = params.period.as_deref() {
        let period = match parse_period(period) {
            Ok(period) => period,
            Err(resp) => return resp,
        };
        return match tools::get_stats_for_period(state.store.as_ref(), period).await {
            Ok(stats) => HttpResponse::Ok().json(serde_json::json!({ "data": stats })),
            Err(e) => error_response(&e),
        };
    }

    match tools::get_all(state.store.as_ref()).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/violations/range`
///
/// Records, a count, or a summary for an explicit range.
pub async fn range(state: web::Data<AppState>, body: web::Json<RangeBody>) -> HttpResponse {
    let from = match parse_date_field(&body.from, "from") {
        Ok(date) => date,
        Err(resp) => return resp,
    };
    let to = match parse_date_field(&body.to, "to") {
        Ok(date) => date,
        Err(resp) => return resp,
    };

    let params = RangeParams {
        from,
        to,
        count_only: body.count_only.unwrap_or(false),
        summary: body.summary.unwrap_or(false),
        // The dashboard serializes dates in the browser.
        date_from_frontend: body.date_from_frontend.unwrap_or(true),
    };

    match tools::get_all_in_range(state.store.as_ref(), &state.engine, &params).await {
        Ok(result) => HttpResponse::Ok().json(serde_json::json!({ "data": result })),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/violations/summary`
///
/// Summary for explicit date parts and/or a symbolic period.
pub async fn summary(
    state: web::Data<AppState>,
    params: web::Query<SummaryQueryParams>,
) -> HttpResponse {
    let period = match params.period.as_deref() {
        Some(value) => match parse_period(value) {
            Ok(period) => Some(period),
            Err(resp) => return resp,
        },
        None => None,
    };

    let has_date_parts = params.year.is_some() || params.month.is_some() || params.day.is_some();
    let engine_params = SummaryParams {
        year: params.year,
        month: params.month,
        day: params.day,
        period,
        date_from_frontend: params.date_from_frontend.unwrap_or(has_date_parts),
    };

    match tools::get_summary(state.store.as_ref(), &state.engine, &engine_params).await {
        Ok(summary) => HttpResponse::Ok().json(serde_json::json!({ "data": summary })),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/violations/comparison`
///
/// Current vs previous period counts.
pub async fn comparison(
    state: web::Data<AppState>,
    params: web::Query<PeriodQueryParams>,
) -> HttpResponse {
    let Some(period) = params.period.as_deref() else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid request. Provide period: day, week, month, or year",
            "field": "period",
        }));
    };
    let period = match parse_period(period) {
        Ok(period) => period,
        Err(resp) => return resp,
    };

    match tools::get_comparison(state.store.as_ref(), period).await {
        Ok(result) => HttpResponse::Ok().json(serde_json::json!({ "data": result })),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/violations/totals`
///
/// Total violations recorded in a year.
pub async fn totals_for_year(
    state: web::Data<AppState>,
    params: web::Query<YearQueryParams>,
) -> HttpResponse {
    let Some(year) = params.year else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid request. Provide year",
            "field": "year",
        }));
    };

    match tools::get_total_for_year(state.store.as_ref(), year).await {
        Ok(total) => HttpResponse::Ok().json(serde_json::json!({ "data": total })),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/violations/totals`
///
/// Interval histogram over a range at the requested granularity.
pub async fn totals_interval(
    state: web::Data<AppState>,
    params: web::Query<GranularityQueryParams>,
    body: web::Json<DateRangeBody>,
) -> HttpResponse {
    let granularity = match params.granularity.as_deref() {
        Some(value) => match value.parse::<Granularity>() {
            Ok(granularity) => granularity,
            Err(_) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!(
                        "Unknown granularity '{value}'. Expected one of: hourly, daily, monthly, yearly"
                    ),
                    "field": "granularity",
                }));
            }
        },
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid request. Provide granularity: hourly, daily, monthly, or yearly",
                "field": "granularity",
            }));
        }
    };

    let (Some(from), Some(to)) = (body.from.as_deref(), body.to.as_deref()) else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "There is no date range. Provide from and to to get the expected response",
            "field": "from",
        }));
    };
    let from = match parse_date_field(from, "from") {
        Ok(date) => date,
        Err(resp) => return resp,
    };
    let to = match parse_date_field(to, "to") {
        Ok(date) => date,
        Err(resp) => return resp,
    };

    let engine_params = HistogramParams {
        from,
        to,
        granularity,
        // The chart hooks serialize the picker range in the browser.
        date_from_frontend: true,
    };

    match tools::get_histogram(state.store.as_ref(), &state.engine, &engine_params).await {
        Ok(result) => HttpResponse::Ok().json(serde_json::json!({ "data": result })),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/violations/search`
///
/// Filtered record lists by violation type, street name, or exact
/// location, with an optional range in the body.
pub async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchQueryParams>,
    body: Option<web::Json<DateRangeBody>>,
) -> HttpResponse {
    let range = body.map(web::Json::into_inner).unwrap_or_default();

    let from = match range.from.as_deref() {
        Some(value) => match parse_date_field(value, "from") {
            Ok(date) => Some(date),
            Err(resp) => return resp,
        },
        None => None,
    };
    let to = match range.to.as_deref() {
        Some(value) => match parse_date_field(value, "to") {
            Ok(date) => Some(date),
            Err(resp) => return resp,
        },
        None => None,
    };

    if let Some(violation_type) = params.violation_type.as_deref() {
        let query = ViolationTypeQuery {
            violation_type: violation_type.to_string(),
            from,
            to,
        };
        return match tools::get_by_violation_type(state.store.as_ref(), &query).await {
            Ok(records) => HttpResponse::Ok().json(serde_json::json!({ "data": records })),
            Err(e) => error_response(&e),
        };
    }

    if let Some(street_name) = params.street_name.as_deref() {
        let query = StreetQuery {
            street_name: street_name.to_string(),
            from,
            to,
        };
        return match tools::get_by_street_name(state.store.as_ref(), &query).await {
            Ok(records) => HttpResponse::Ok().json(serde_json::json!({ "data": records })),
            Err(e) => error_response(&e),
        };
    }

    if let (Some(lat), Some(long)) = (params.lat, params.long) {
        let query = LocationQuery {
            latitude: lat,
            longitude: long,
        };
        return match tools::get_by_location(state.store.as_ref(), &query).await {
            Ok(records) => HttpResponse::Ok().json(serde_json::json!({ "data": records })),
            Err(e) => error_response(&e),
        };
    }

    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "Invalid request. Provide violationType, streetName, or lat and long"
    }))
}
