//! Ad creatives and ad images.

use super::{act, non_empty};
use fbads_core::{AdsResult, ApiRequest, EndpointSpec, Param, Values};

const GET_WITH_FIELDS: EndpointSpec = EndpointSpec::get(&[Param::plain("fields")]);
const GET_ADIMAGES: EndpointSpec = EndpointSpec::get(&[Param::json("hashes")]);
const CREATE_ADCREATIVE: EndpointSpec = EndpointSpec::post(&[
    Param::plain("object_story_id").required(),
    Param::plain("url_tags"),
    Param::plain("name"),
]);

/// A creative built from an existing page post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryCreative {
    pub object_story_id: String,
    pub url_tags: Option<String>,
    pub name: Option<String>,
}

pub fn get_adcreative(creative_id: &str, fields: &[&str]) -> AdsResult<ApiRequest> {
    GET_WITH_FIELDS.bind(creative_id, Values::new().set_opt("fields", non_empty(fields)))
}

pub fn get_adcreatives(account_id: &str, fields: &[&str]) -> AdsResult<ApiRequest> {
    GET_WITH_FIELDS.bind(
        format!("{}/adcreatives", act(account_id)),
        Values::new().set_opt("fields", non_empty(fields)),
    )
}

/// Ad images of an account, restricted to `hashes` when any are given.
pub fn get_adimages(account_id: &str, hashes: &[&str]) -> AdsResult<ApiRequest> {
    GET_ADIMAGES.bind(
        format!("{}/adimages", act(account_id)),
        Values::new().set_opt("hashes", non_empty(hashes)),
    )
}

/// Create a page post ad creative (creative type 27).
pub fn create_adcreative_type_27(account_id: &str, creative: &StoryCreative) -> AdsResult<ApiRequest> {
    CREATE_ADCREATIVE.bind(
        format!("{}/adcreatives", act(account_id)),
        Values::new()
            .set("object_story_id", &creative.object_story_id)
            .set_opt("url_tags", creative.url_tags.as_deref().filter(|s| !s.is_empty()))
            .set_opt("name", creative.name.as_deref().filter(|s| !s.is_empty())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbads_core::Method;

    #[test]
    fn test_create_adcreative_type_27() {
        let creative = StoryCreative {
            object_story_id: "55_123".to_string(),
            url_tags: Some("utm_source=fb".to_string()),
            name: Some(String::new()),
        };
        let request = create_adcreative_type_27("42", &creative).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "act_42/adcreatives");
        let args: Vec<_> = request.args.iter().collect();
        assert_eq!(args, vec![("object_story_id", "55_123"), ("url_tags", "utm_source=fb")]);
    }

    #[test]
    fn test_get_adimages_hashes_are_json() {
        let request = get_adimages("42", &["abc", "def"]).unwrap();
        assert_eq!(request.path, "act_42/adimages");
        assert_eq!(request.args.get("hashes"), Some(r#"["abc","def"]"#));
        assert!(get_adimages("42", &[]).unwrap().args.is_empty());
    }

    #[test]
    fn test_get_adcreatives() {
        let request = get_adcreatives("42", &["id", "title"]).unwrap();
        assert_eq!(request.path, "act_42/adcreatives");
        assert_eq!(request.args.get("fields"), Some("id,title"));
        assert_eq!(get_adcreative("777", &[]).unwrap().path, "777");
    }
}
