//! Custom and lookalike audiences.

use super::act;
use fbads_core::{AdsResult, ApiRequest, EndpointSpec, Param, Values};
use serde_json::{json, Value};

/// Retention applied when a custom audience does not name one.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

const WEBSITE: &str = "WEBSITE";

const GET_CUSTOM_AUDIENCES: EndpointSpec = EndpointSpec::get(&[]);
const CREATE_CUSTOM_AUDIENCE: EndpointSpec = EndpointSpec::post(&[
    Param::plain("name").required(),
    Param::plain("subtype"),
    Param::plain("description"),
    Param::json("rule"),
    Param::plain("opt_out_link"),
    Param::plain("retention_days"),
]);
const CREATE_LOOKALIKE_AUDIENCE: EndpointSpec = EndpointSpec::post(&[
    Param::plain("name").required(),
    Param::plain("origin_audience_id").required(),
    Param::json("lookalike_spec").required(),
]);

#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomAudience {
    pub name: String,
    pub subtype: Option<String>,
    pub description: Option<String>,
    pub rule: Option<Value>,
    pub opt_out_link: Option<String>,
    /// `None` or zero leaves retention to the API default.
    pub retention_days: Option<u32>,
}

impl NewCustomAudience {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subtype: None,
            description: None,
            rule: None,
            opt_out_link: None,
            retention_days: Some(DEFAULT_RETENTION_DAYS),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

pub fn get_custom_audiences(account_id: &str) -> AdsResult<ApiRequest> {
    GET_CUSTOM_AUDIENCES.bind(format!("{}/customaudiences", act(account_id)), Values::new())
}

pub fn create_custom_audience(account_id: &str, audience: &NewCustomAudience) -> AdsResult<ApiRequest> {
    CREATE_CUSTOM_AUDIENCE.bind(
        format!("{}/customaudiences", act(account_id)),
        Values::new()
            .set("name", &audience.name)
            .set_opt("subtype", non_blank(&audience.subtype))
            .set_opt("description", non_blank(&audience.description))
            .set_opt("rule", audience.rule.as_ref().filter(|r| !r.is_null()))
            .set_opt("opt_out_link", non_blank(&audience.opt_out_link))
            .set_opt("retention_days", audience.retention_days.filter(|d| *d > 0)),
    )
}

/// Website visitors whose URL contains `domain`.
pub fn create_custom_audience_from_website(
    account_id: &str,
    name: &str,
    domain: &str,
    description: Option<&str>,
    retention_days: Option<u32>,
) -> AdsResult<ApiRequest> {
    let audience = NewCustomAudience {
        subtype: Some(WEBSITE.to_string()),
        description: description.map(str::to_string),
        rule: Some(json!({ "url": { "i_contains": domain } })),
        retention_days,
        ..NewCustomAudience::new(name)
    };
    create_custom_audience(account_id, &audience)
}

/// An audience resembling `origin_audience_id`, shaped by `lookalike_spec`.
pub fn create_lookalike_audience(
    account_id: &str,
    name: &str,
    origin_audience_id: &str,
    lookalike_spec: &Value,
) -> AdsResult<ApiRequest> {
    CREATE_LOOKALIKE_AUDIENCE.bind(
        format!("{}/customaudiences", act(account_id)),
        Values::new()
            .set("name", name)
            .set("origin_audience_id", origin_audience_id)
            .set("lookalike_spec", lookalike_spec),
    )
}
