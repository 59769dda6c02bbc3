//! Rate cards, reach estimates and targeting autocomplete.

use super::act;
use fbads_core::{AdsResult, ApiRequest, EndpointSpec, Param, Values};
use serde_json::Value;

const GET_RATECARD: EndpointSpec = EndpointSpec::get(&[]);
const GET_REACH_ESTIMATE: EndpointSpec = EndpointSpec::get(&[
    Param::plain("currency").required(),
    Param::json("targeting_spec").required(),
    Param::json("creative_action_spec"),
    Param::plain("bid_for"),
]);
const GET_AUTOCOMPLETE_DATA: EndpointSpec = EndpointSpec::get(&[
    Param::plain("type").required(),
    Param::plain("want_localized_name"),
    Param::plain("list"),
    Param::plain("limit"),
]);

#[derive(Debug, Clone, PartialEq)]
pub struct ReachEstimateQuery {
    pub currency: String,
    pub targeting_spec: Value,
    pub creative_action_spec: Option<Value>,
    /// Bid types to estimate for, e.g. `conversions`.
    pub bid_for: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutocompleteOptions {
    pub want_localized_name: bool,
    pub list: Option<String>,
    pub limit: Option<u32>,
}

pub fn get_ratecard(account_id: &str) -> AdsResult<ApiRequest> {
    GET_RATECARD.bind(format!("{}/ratecard", act(account_id)), Values::new())
}

pub fn get_reach_estimate(account_id: &str, query: &ReachEstimateQuery) -> AdsResult<ApiRequest> {
    let bid_for = (!query.bid_for.is_empty()).then_some(&query.bid_for);
    GET_REACH_ESTIMATE.bind(
        format!("{}/reachestimate", act(account_id)),
        Values::new()
            .set("currency", &query.currency)
            .set("targeting_spec", &query.targeting_spec)
            .set_opt("creative_action_spec", query.creative_action_spec.as_ref())
            .set_opt("bid_for", bid_for),
    )
}

/// Targeting search of `kind` (e.g. `adcountry`, `adinterest`) under `q`.
pub fn get_autocomplete_data(
    q: &str,
    kind: &str,
    options: &AutocompleteOptions,
) -> AdsResult<ApiRequest> {
    GET_AUTOCOMPLETE_DATA.bind(
        format!("{}/search", q),
        Values::new()
            .set("type", kind)
            .set_opt("want_localized_name", options.want_localized_name.then_some(true))
            .set_opt("list", options.list.as_deref().filter(|l| !l.is_empty()))
            .set_opt("limit", options.limit.filter(|l| *l > 0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reach_estimate() {
        let query = ReachEstimateQuery {
            currency: "USD".to_string(),
            targeting_spec: json!({"geo_locations": {"countries": ["US"]}}),
            creative_action_spec: None,
            bid_for: vec!["conversions".to_string(), "clicks".to_string()],
        };
        let request = get_reach_estimate("42", &query).unwrap();
        assert_eq!(request.path, "act_42/reachestimate");
        assert_eq!(request.args.get("currency"), Some("USD"));
        assert_eq!(
            request.args.get("targeting_spec"),
            Some(r#"{"geo_locations":{"countries":["US"]}}"#)
        );
        assert_eq!(request.args.get("bid_for"), Some("conversions,clicks"));
        assert!(!request.args.contains("creative_action_spec"));
    }

    #[test]
    fn test_autocomplete_defaults() {
        let request = get_autocomplete_data("act_42", "adcountry", &AutocompleteOptions::default())
            .unwrap();
        assert_eq!(request.path, "act_42/search");
        let args: Vec<_> = request.args.iter().collect();
        assert_eq!(args, vec![("type", "adcountry")]);
    }

    #[test]
    fn test_autocomplete_options() {
        let options = AutocompleteOptions {
            want_localized_name: true,
            list: Some("GLOBAL".to_string()),
            limit: Some(25),
        };
        let request = get_autocomplete_data("act_42", "adlocale", &options).unwrap();
        assert_eq!(request.args.get("want_localized_name"), Some("true"));
        assert_eq!(request.args.get("list"), Some("GLOBAL"));
        assert_eq!(request.args.get("limit"), Some("25"));
    }

    #[test]
    fn test_ratecard() {
        assert_eq!(get_ratecard("42").unwrap().path, "act_42/ratecard");
    }
}
