//! Ad groups.

use super::{act, non_empty};
use fbads_core::{AdsError, AdsResult, ApiRequest, EndpointSpec, Param, Values};
use serde_json::{json, Value};

const GET_ADGROUP: EndpointSpec = EndpointSpec::get(&[Param::plain("fields")]);
const LIST_ADGROUPS: EndpointSpec =
    EndpointSpec::get(&[Param::plain("fields"), Param::json("adgroup_status")]);

const CREATE_ADGROUP: EndpointSpec = EndpointSpec::post(&[
    Param::plain("name").required(),
    Param::plain("bid_type").required(),
    Param::json("bid_info"),
    Param::plain("max_bid"),
    Param::plain("campaign_id").required(),
    Param::json("creative").required(),
    Param::json("targeting").required(),
    Param::json("conversion_specs"),
    Param::json("tracking_specs"),
    Param::json("view_tags"),
    Param::plain("objective"),
    Param::plain("adgroup_status"),
]);
const UPDATE_ADGROUP: EndpointSpec = EndpointSpec::post(&[
    Param::plain("name"),
    Param::plain("adgroup_status"),
    Param::plain("bid_type"),
    Param::json("bid_info"),
    Param::json("creative"),
    Param::json("targeting"),
    Param::json("conversion_specs"),
    Param::json("tracking_specs"),
    Param::json("view_tags"),
    Param::plain("objective"),
]);

const CPM: &str = "CPM";

/// An ad group to create.
///
/// `max_bid` is only valid with `CPM` bidding and replaces `bid_info`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAdGroup {
    pub name: String,
    pub bid_type: String,
    pub bid_info: Option<Value>,
    pub campaign_id: String,
    pub creative_id: String,
    pub targeting: Value,
    pub max_bid: Option<u64>,
    pub conversion_specs: Option<Value>,
    pub tracking_specs: Option<Value>,
    pub view_tags: Option<Value>,
    pub objective: Option<String>,
    pub adgroup_status: Option<String>,
}

/// Fields to change on an ad group; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdGroupUpdate {
    pub name: Option<String>,
    pub adgroup_status: Option<String>,
    pub bid_type: Option<String>,
    pub bid_info: Option<Value>,
    pub creative_id: Option<String>,
    pub targeting: Option<Value>,
    pub conversion_specs: Option<Value>,
    pub tracking_specs: Option<Value>,
    pub view_tags: Option<Value>,
    pub objective: Option<String>,
}

fn creative(creative_id: &str) -> Value {
    json!({ "creative_id": creative_id })
}

pub fn get_adgroup(adgroup_id: &str, fields: &[&str]) -> AdsResult<ApiRequest> {
    GET_ADGROUP.bind(adgroup_id, Values::new().set_opt("fields", non_empty(fields)))
}

/// Ad groups of an account, optionally filtered by status.
pub fn get_adgroups_by_adaccount(
    account_id: &str,
    fields: &[&str],
    status_fields: &[&str],
) -> AdsResult<ApiRequest> {
    LIST_ADGROUPS.bind(
        format!("{}/adgroups", act(account_id)),
        Values::new()
            .set_opt("fields", non_empty(fields))
            .set_opt("adgroup_status", non_empty(status_fields)),
    )
}

/// Ad groups of a campaign, optionally filtered by status.
pub fn get_adgroups_by_adcampaign(
    campaign_id: &str,
    fields: &[&str],
    status_fields: &[&str],
) -> AdsResult<ApiRequest> {
    LIST_ADGROUPS.bind(
        format!("{}/adgroups", campaign_id),
        Values::new()
            .set_opt("fields", non_empty(fields))
            .set_opt("adgroup_status", non_empty(status_fields)),
    )
}

pub fn create_adgroup(account_id: &str, adgroup: &NewAdGroup) -> AdsResult<ApiRequest> {
    let max_bid = adgroup.max_bid.filter(|bid| *bid > 0);
    if max_bid.is_some() && adgroup.bid_type != CPM {
        return Err(AdsError::precondition(format!(
            "max_bid can only be used with CPM bidding, not {}",
            adgroup.bid_type
        )));
    }
    let bid_info = match max_bid {
        Some(_) => None,
        None => Some(adgroup.bid_info.clone().unwrap_or(Value::Null)),
    };

    CREATE_ADGROUP.bind(
        format!("{}/adgroups", act(account_id)),
        Values::new()
            .set("name", &adgroup.name)
            .set("bid_type", &adgroup.bid_type)
            .set_opt("bid_info", bid_info)
            .set_opt("max_bid", max_bid)
            .set("campaign_id", &adgroup.campaign_id)
            .set("creative", &creative(&adgroup.creative_id))
            .set("targeting", &adgroup.targeting)
            .set_opt("conversion_specs", adgroup.conversion_specs.as_ref())
            .set_opt("tracking_specs", adgroup.tracking_specs.as_ref())
            .set_opt("view_tags", adgroup.view_tags.as_ref())
            .set_opt("objective", adgroup.objective.as_deref())
            .set_opt("adgroup_status", adgroup.adgroup_status.as_deref()),
    )
}

pub fn update_adgroup(adgroup_id: &str, update: &AdGroupUpdate) -> AdsResult<ApiRequest> {
    UPDATE_ADGROUP.bind(
        adgroup_id,
        Values::new()
            .set_opt("name", update.name.as_deref())
            .set_opt("adgroup_status", update.adgroup_status.as_deref())
            .set_opt("bid_type", update.bid_type.as_deref())
            .set_opt("bid_info", update.bid_info.as_ref())
            .set_opt("creative", update.creative_id.as_deref().map(creative))
            .set_opt("targeting", update.targeting.as_ref())
            .set_opt("conversion_specs", update.conversion_specs.as_ref())
            .set_opt("tracking_specs", update.tracking_specs.as_ref())
            .set_opt("view_tags", update.view_tags.as_ref())
            .set_opt("objective", update.objective.as_deref()),
    )
}
