//! Campaign groups and campaigns (ad sets).

use super::{act, non_empty, DATA_LIMIT};
use fbads_core::{AdsError, AdsResult, ApiRequest, EndpointSpec, Param, Values};

const GET_BY_ID: EndpointSpec = EndpointSpec::get(&[Param::plain("fields")]);
const GET_ADCAMPAIGN_GROUPS: EndpointSpec =
    EndpointSpec::get(&[Param::plain("fields"), Param::plain("limit")]);
const DELETE_BY_ID: EndpointSpec = EndpointSpec::delete(&[]);

const CREATE_ADCAMPAIGN_GROUP: EndpointSpec = EndpointSpec::post(&[
    Param::plain("name").required(),
    Param::plain("campaign_group_status").required(),
    Param::plain("objective"),
]);
const UPDATE_ADCAMPAIGN_GROUP: EndpointSpec = EndpointSpec::post(&[
    Param::plain("name"),
    Param::plain("campaign_group_status"),
    Param::plain("objective"),
]);

const CREATE_ADSET: EndpointSpec = EndpointSpec::post(&[
    Param::plain("campaign_group_id").required(),
    Param::plain("name").required(),
    Param::plain("campaign_status").required(),
    Param::plain("daily_budget"),
    Param::plain("lifetime_budget"),
    Param::plain("start_time"),
    Param::plain("end_time"),
]);
const CREATE_ADCAMPAIGN: EndpointSpec = EndpointSpec::post(&[
    Param::plain("name").required(),
    Param::plain("campaign_status").required(),
    Param::plain("daily_budget"),
    Param::plain("lifetime_budget"),
    Param::plain("start_time"),
    Param::plain("end_time"),
]);
const UPDATE_ADCAMPAIGN: EndpointSpec = EndpointSpec::post(&[
    Param::plain("name"),
    Param::plain("campaign_status"),
    Param::plain("daily_budget"),
    Param::plain("lifetime_budget"),
    Param::plain("end_time"),
]);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCampaignGroup {
    pub name: String,
    pub campaign_group_status: String,
    pub objective: Option<String>,
}

/// Fields to change on a campaign group; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignGroupUpdate {
    pub name: Option<String>,
    pub campaign_group_status: Option<String>,
    pub objective: Option<String>,
}

/// A campaign to create. Budgets are in the account currency's minor unit.
///
/// At least one budget must be set, and a lifetime budget needs an end time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCampaign {
    pub name: String,
    pub campaign_status: String,
    pub daily_budget: Option<u64>,
    pub lifetime_budget: Option<u64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl NewCampaign {
    fn validate(&self) -> AdsResult<()> {
        if self.daily_budget.is_none() && self.lifetime_budget.is_none() {
            return Err(AdsError::precondition(
                "either a lifetime_budget or a daily_budget must be set when creating a campaign",
            ));
        }
        if self.lifetime_budget.is_some() && self.end_time.is_none() {
            return Err(AdsError::precondition(
                "end_time is required when lifetime_budget is specified",
            ));
        }
        Ok(())
    }

    fn values(&self) -> Values {
        Values::new()
            .set("name", &self.name)
            .set("campaign_status", &self.campaign_status)
            .set_opt("daily_budget", self.daily_budget.filter(|b| *b > 0))
            .set_opt("lifetime_budget", self.lifetime_budget.filter(|b| *b > 0))
            .set_opt("start_time", self.start_time.as_deref())
            .set_opt("end_time", self.end_time.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignUpdate {
    pub name: Option<String>,
    pub campaign_status: Option<String>,
    pub daily_budget: Option<u64>,
    pub lifetime_budget: Option<u64>,
    pub end_time: Option<String>,
}

pub fn get_adcampaign_group(campaign_group_id: &str, fields: &[&str]) -> AdsResult<ApiRequest> {
    GET_BY_ID.bind(campaign_group_id, Values::new().set_opt("fields", non_empty(fields)))
}

/// Campaign groups of an account, one page of [`DATA_LIMIT`] entries.
pub fn get_adcampaign_groups(account_id: &str, fields: &[&str]) -> AdsResult<ApiRequest> {
    GET_ADCAMPAIGN_GROUPS.bind(
        format!("{}/adcampaign_groups", act(account_id)),
        Values::new()
            .set_opt("fields", non_empty(fields))
            .set("limit", &DATA_LIMIT),
    )
}

pub fn create_adcampaign_group(account_id: &str, group: &NewCampaignGroup) -> AdsResult<ApiRequest> {
    CREATE_ADCAMPAIGN_GROUP.bind(
        format!("{}/adcampaign_groups", act(account_id)),
        Values::new()
            .set("name", &group.name)
            .set("campaign_group_status", &group.campaign_group_status)
            .set_opt("objective", group.objective.as_deref()),
    )
}

pub fn update_adcampaign_group(
    campaign_group_id: &str,
    update: &CampaignGroupUpdate,
) -> AdsResult<ApiRequest> {
    UPDATE_ADCAMPAIGN_GROUP.bind(
        campaign_group_id,
        Values::new()
            .set_opt("name", update.name.as_deref())
            .set_opt("campaign_group_status", update.campaign_group_status.as_deref())
            .set_opt("objective", update.objective.as_deref()),
    )
}

pub fn delete_adcampaign_group(campaign_group_id: &str) -> AdsResult<ApiRequest> {
    DELETE_BY_ID.bind(campaign_group_id, Values::new())
}

pub fn get_adcampaign(campaign_id: &str, fields: &[&str]) -> AdsResult<ApiRequest> {
    GET_BY_ID.bind(campaign_id, Values::new().set_opt("fields", non_empty(fields)))
}

pub fn get_adcampaigns_of_campaign_group(
    campaign_group_id: &str,
    fields: &[&str],
) -> AdsResult<ApiRequest> {
    GET_BY_ID.bind(
        format!("{}/adcampaigns", campaign_group_id),
        Values::new().set_opt("fields", non_empty(fields)),
    )
}

pub fn get_adcampaigns_of_account(account_id: &str, fields: &[&str]) -> AdsResult<ApiRequest> {
    GET_BY_ID.bind(
        format!("{}/adcampaigns", act(account_id)),
        Values::new().set_opt("fields", non_empty(fields)),
    )
}

/// Same request as [`get_adcampaigns_of_account`].
pub fn get_adcampaigns(account_id: &str, fields: &[&str]) -> AdsResult<ApiRequest> {
    get_adcampaigns_of_account(account_id, fields)
}

/// Create a campaign (ad set) inside a campaign group.
pub fn create_adset(
    account_id: &str,
    campaign_group_id: &str,
    campaign: &NewCampaign,
) -> AdsResult<ApiRequest> {
    campaign.validate()?;
    CREATE_ADSET.bind(
        format!("{}/adcampaigns", act(account_id)),
        campaign.values().set("campaign_group_id", campaign_group_id),
    )
}

/// Create a campaign without a campaign group.
///
/// Only accepted by accounts that predate campaign groups; use
/// [`create_adset`] otherwise.
pub fn create_adcampaign(account_id: &str, campaign: &NewCampaign) -> AdsResult<ApiRequest> {
    campaign.validate()?;
    CREATE_ADCAMPAIGN.bind(format!("{}/adcampaigns", act(account_id)), campaign.values())
}

pub fn update_adcampaign(campaign_id: &str, update: &CampaignUpdate) -> AdsResult<ApiRequest> {
    UPDATE_ADCAMPAIGN.bind(
        campaign_id,
        Values::new()
            .set_opt("name", update.name.as_deref().filter(|s| !s.is_empty()))
            .set_opt(
                "campaign_status",
                update.campaign_status.as_deref().filter(|s| !s.is_empty()),
            )
            .set_opt("daily_budget", update.daily_budget.filter(|b| *b > 0))
            .set_opt("lifetime_budget", update.lifetime_budget.filter(|b| *b > 0))
            .set_opt("end_time", update.end_time.as_deref().filter(|s| !s.is_empty())),
    )
}

pub fn delete_adcampaign(campaign_id: &str) -> AdsResult<ApiRequest> {
    DELETE_BY_ID.bind(campaign_id, Values::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbads_core::Method;
    use proptest::prelude::*;

    fn daily(budget: u64) -> NewCampaign {
        NewCampaign {
            name: "spring".to_string(),
            campaign_status: "PAUSED".to_string(),
            daily_budget: Some(budget),
            ..Default::default()
        }
    }

    #[test]
    fn test_get_adcampaign_groups_sets_limit() {
        let request = get_adcampaign_groups("42", &["id", "name"]).unwrap();
        assert_eq!(request.path, "act_42/adcampaign_groups");
        assert_eq!(request.args.get("fields"), Some("id,name"));
        assert_eq!(request.args.get("limit"), Some("100"));
    }

    #[test]
    fn test_create_adcampaign_group() {
        let group = NewCampaignGroup {
            name: "launch".to_string(),
            campaign_group_status: "ACTIVE".to_string(),
            objective: None,
        };
        let request = create_adcampaign_group("42", &group).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.args.get("campaign_group_status"), Some("ACTIVE"));
        assert!(!request.args.contains("objective"));
    }

    #[test]
    fn test_update_adcampaign_group_only_given_fields() {
        let update = CampaignGroupUpdate {
            objective: Some("WEBSITE_CLICKS".to_string()),
            ..Default::default()
        };
        let request = update_adcampaign_group("900", &update).unwrap();
        assert_eq!(request.path, "900");
        let args: Vec<_> = request.args.iter().collect();
        assert_eq!(args, vec![("objective", "WEBSITE_CLICKS")]);
    }

    #[test]
    fn test_delete_adcampaign_group() {
        let request = delete_adcampaign_group("900").unwrap();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.describe().unwrap().relative_url, "900");
    }

    #[test]
    fn test_create_without_budget_rejected() {
        let campaign = NewCampaign {
            name: "x".to_string(),
            campaign_status: "ACTIVE".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            create_adcampaign("42", &campaign),
            Err(AdsError::Precondition { .. })
        ));
        assert!(matches!(
            create_adset("42", "900", &campaign),
            Err(AdsError::Precondition { .. })
        ));
    }

    #[test]
    fn test_lifetime_budget_needs_end_time() {
        let mut campaign = NewCampaign {
            name: "x".to_string(),
            campaign_status: "ACTIVE".to_string(),
            lifetime_budget: Some(10_000),
            ..Default::default()
        };
        let err = create_adset("42", "900", &campaign).unwrap_err();
        assert!(matches!(err, AdsError::Precondition { ref reason } if reason.contains("end_time")));

        campaign.end_time = Some("2014-12-31T00:00:00+0000".to_string());
        let request = create_adset("42", "900", &campaign).unwrap();
        assert_eq!(request.args.get("lifetime_budget"), Some("10000"));
    }

    #[test]
    fn test_create_adset_carries_group() {
        let request = create_adset("42", "900", &daily(500)).unwrap();
        assert_eq!(request.path, "act_42/adcampaigns");
        assert_eq!(request.args.get("campaign_group_id"), Some("900"));
        assert_eq!(request.args.get("daily_budget"), Some("500"));
        assert!(!request.args.contains("end_time"));
    }

    #[test]
    fn test_legacy_create_has_no_group() {
        let request = create_adcampaign("42", &daily(500)).unwrap();
        assert!(!request.args.contains("campaign_group_id"));
    }

    #[test]
    fn test_update_adcampaign_skips_empty() {
        let update = CampaignUpdate {
            name: Some(String::new()),
            campaign_status: Some("PAUSED".to_string()),
            daily_budget: Some(0),
            ..Default::default()
        };
        let request = update_adcampaign("6001", &update).unwrap();
        let args: Vec<_> = request.args.iter().collect();
        assert_eq!(args, vec![("campaign_status", "PAUSED")]);
    }

    #[test]
    fn test_campaign_reads() {
        assert_eq!(get_adcampaign("6001", &[]).unwrap().path, "6001");
        assert_eq!(
            get_adcampaigns_of_campaign_group("900", &["id"]).unwrap().path,
            "900/adcampaigns"
        );
        assert_eq!(
            get_adcampaigns("42", &["id"]).unwrap(),
            get_adcampaigns_of_account("42", &["id"]).unwrap()
        );
        assert_eq!(delete_adcampaign("6001").unwrap().method, Method::Delete);
    }

    proptest! {
        #[test]
        fn prop_daily_budget_always_accepted(budget in 1u64..u64::MAX) {
            let request = create_adcampaign("42", &daily(budget)).unwrap();
            let expected = budget.to_string();
            prop_assert_eq!(request.args.get("daily_budget"), Some(expected.as_str()));
        }
    }
}
