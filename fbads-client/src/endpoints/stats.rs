//! Statistics, report stats and conversion stats.

use super::act;
use chrono::{Datelike, NaiveDate};
use fbads_core::{AdsError, AdsResult, ApiRequest, EndpointSpec, Param, Values};
use serde_json::{json, Value};

const NO_PARAMS: EndpointSpec = EndpointSpec::get(&[]);
const ADCAMPAIGN_GROUP_STATS: EndpointSpec =
    EndpointSpec::get(&[Param::json("fields"), Param::json("filters")]);
const ADCAMPAIGN_STATS: EndpointSpec = EndpointSpec::get(&[Param::json("campaign_ids")]);
const ADGROUP_STATS: EndpointSpec = EndpointSpec::get(&[Param::json("adgroup_ids")]);

const REPORT_STATS: EndpointSpec = EndpointSpec::get(&[
    Param::plain("date_preset").required(),
    Param::plain("time_increment").required(),
    Param::json("data_columns").required(),
    Param::json("filters"),
    Param::plain("actions_group_by"),
]);

const REPORT_STATS2_PARAMS: &[Param] = &[
    Param::json("data_columns").required(),
    Param::plain("date_preset"),
    Param::json("time_interval"),
    Param::plain("time_increment"),
    Param::json("filters"),
    Param::json("actions_group_by"),
    Param::plain("async"),
];
const REPORT_STATS2: EndpointSpec = EndpointSpec::get(REPORT_STATS2_PARAMS);
const REPORT_STATS2_ASYNC: EndpointSpec = EndpointSpec::post(REPORT_STATS2_PARAMS);

const ASYNC_JOB_RESULT: EndpointSpec =
    EndpointSpec::get(&[Param::plain("report_run_id").required()]);

const ADCAMPAIGN_CONVERSIONS: EndpointSpec = EndpointSpec::get(&[
    Param::json("campaign_ids"),
    Param::plain("include_deleted"),
]);
const ADGROUP_CONVERSIONS: EndpointSpec = EndpointSpec::get(&[
    Param::json("adgroup_ids"),
    Param::plain("include_deleted"),
]);

/// Query for the synchronous `reportstats` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportStatsQuery {
    pub date_preset: String,
    /// A day count or `"all_days"` / `"monthly"`.
    pub time_increment: Value,
    pub data_columns: Vec<String>,
    pub filters: Option<Value>,
    pub actions_group_by: Vec<String>,
}

/// Query for [`get_adreport_stats2`].
///
/// Needs either `date_preset` or a `date_start`/`date_end` pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportQuery {
    pub data_columns: Vec<String>,
    pub date_preset: Option<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub time_increment: Option<Value>,
    pub filters: Option<Value>,
    pub actions_group_by: Vec<String>,
    /// Start an async report job instead of returning the stats directly.
    pub run_async: bool,
}

/// Render an inclusive day range as a `time_interval` argument.
///
/// The API treats `day_stop` as exclusive, so `end` is advanced by a day.
pub fn time_interval(start: NaiveDate, end: NaiveDate) -> AdsResult<Value> {
    let stop = end
        .succ_opt()
        .ok_or_else(|| AdsError::precondition(format!("no day after {}", end)))?;
    Ok(json!({
        "day_start": day(start),
        "day_stop": day(stop),
    }))
}

fn day(date: NaiveDate) -> Value {
    json!({ "day": date.day(), "month": date.month(), "year": date.year() })
}

pub fn get_stats_by_adaccount(account_id: &str) -> AdsResult<ApiRequest> {
    NO_PARAMS.bind(format!("{}/adcampaignstats", act(account_id)), Values::new())
}

pub fn get_stats_by_adcampaign_group(
    campaign_group_id: &str,
    fields: Option<&[&str]>,
    filters: Option<&Value>,
) -> AdsResult<ApiRequest> {
    ADCAMPAIGN_GROUP_STATS.bind(
        format!("{}/stats", campaign_group_id),
        Values::new()
            .set_opt("fields", fields)
            .set_opt("filters", filters),
    )
}

/// Campaign stats of an account, restricted to `campaign_ids` when given.
pub fn get_stats_by_adcampaign(
    account_id: &str,
    campaign_ids: Option<&[&str]>,
) -> AdsResult<ApiRequest> {
    ADCAMPAIGN_STATS.bind(
        format!("{}/adcampaignstats", act(account_id)),
        Values::new().set_opt("campaign_ids", campaign_ids),
    )
}

pub fn get_stats_by_adgroup(account_id: &str, adgroup_ids: Option<&[&str]>) -> AdsResult<ApiRequest> {
    ADGROUP_STATS.bind(
        format!("{}/adgroupstats", act(account_id)),
        Values::new().set_opt("adgroup_ids", adgroup_ids),
    )
}

pub fn get_adreport_stats(account_id: &str, query: &ReportStatsQuery) -> AdsResult<ApiRequest> {
    let group_by = (!query.actions_group_by.is_empty()).then_some(&query.actions_group_by);
    REPORT_STATS.bind(
        format!("{}/reportstats", act(account_id)),
        Values::new()
            .set("date_preset", &query.date_preset)
            .set("time_increment", &query.time_increment)
            .set("data_columns", &query.data_columns)
            .set_opt("filters", query.filters.as_ref())
            .set_opt("actions_group_by", group_by),
    )
}

/// Report stats over a preset or explicit date range.
///
/// An asynchronous query is a POST that starts a report job; poll it with
/// [`get_async_job_status`] and fetch it with [`get_async_job_result`].
pub fn get_adreport_stats2(account_id: &str, query: &ReportQuery) -> AdsResult<ApiRequest> {
    if query.date_preset.is_none() && query.date_start.is_none() && query.date_end.is_none() {
        return Err(AdsError::precondition(
            "either a date_preset or a date_start/date_end must be set when requesting stats",
        ));
    }
    let interval = match (query.date_start, query.date_end) {
        (Some(start), Some(end)) => Some(time_interval(start, end)?),
        _ => None,
    };
    let filters = query
        .filters
        .as_ref()
        .filter(|f| match f {
            Value::Null => false,
            Value::Array(items) => !items.is_empty(),
            _ => true,
        });
    let group_by = (!query.actions_group_by.is_empty()).then_some(&query.actions_group_by);

    let spec = if query.run_async {
        REPORT_STATS2_ASYNC
    } else {
        REPORT_STATS2
    };
    spec.bind(
        format!("{}/reportstats", act(account_id)),
        Values::new()
            .set("data_columns", &query.data_columns)
            .set_opt("date_preset", query.date_preset.as_deref().filter(|p| !p.is_empty()))
            .set_opt("time_interval", interval)
            .set_opt("time_increment", query.time_increment.as_ref())
            .set_opt("filters", filters)
            .set_opt("actions_group_by", group_by)
            .set_opt("async", query.run_async.then_some("true")),
    )
}

pub fn get_async_job_status(job_id: &str) -> AdsResult<ApiRequest> {
    NO_PARAMS.bind(job_id, Values::new())
}

pub fn get_async_job_result(account_id: &str, job_id: &str) -> AdsResult<ApiRequest> {
    ASYNC_JOB_RESULT.bind(
        format!("{}/reportstats", act(account_id)),
        Values::new().set("report_run_id", job_id),
    )
}

pub fn get_conversion_stats_by_adaccount(account_id: &str) -> AdsResult<ApiRequest> {
    NO_PARAMS.bind(format!("{}/conversions", act(account_id)), Values::new())
}

pub fn get_conversion_stats_by_adcampaign(
    account_id: &str,
    campaign_ids: Option<&[&str]>,
    include_deleted: bool,
) -> AdsResult<ApiRequest> {
    ADCAMPAIGN_CONVERSIONS.bind(
        format!("{}/adcampaignconversions", act(account_id)),
        Values::new()
            .set_opt("campaign_ids", campaign_ids)
            .set("include_deleted", &include_deleted),
    )
}

pub fn get_conversion_stats_by_adgroup(
    account_id: &str,
    adgroup_ids: Option<&[&str]>,
    include_deleted: bool,
) -> AdsResult<ApiRequest> {
    ADGROUP_CONVERSIONS.bind(
        format!("{}/adgroupconversions", act(account_id)),
        Values::new()
            .set_opt("adgroup_ids", adgroup_ids)
            .set("include_deleted", &include_deleted),
    )
}

/// Conversion stats of a single ad group.
pub fn get_conversion_stats(adgroup_id: &str) -> AdsResult<ApiRequest> {
    NO_PARAMS.bind(format!("{}/conversions", adgroup_id), Values::new())
}

pub fn get_keyword_stats(adgroup_id: &str) -> AdsResult<ApiRequest> {
    NO_PARAMS.bind(format!("{}/keywordstats", adgroup_id), Values::new())
}
