//! Tokens, users, ad accounts and pages.

use super::{act, non_empty};
use fbads_core::{AdsResult, ApiRequest, Credentials, EndpointSpec, Param, Values};

const DEBUG_TOKEN: EndpointSpec = EndpointSpec::get(&[
    Param::plain("input_token").required(),
    Param::plain("access_token").required(),
]);
const GET_ADUSERS: EndpointSpec = EndpointSpec::get(&[]);
const GET_ADACCOUNT: EndpointSpec = EndpointSpec::get(&[Param::plain("fields")]);
const GET_ADACCOUNTS: EndpointSpec = EndpointSpec::get(&[Param::plain("fields")]);
const GET_USER_PAGES: EndpointSpec = EndpointSpec::get(&[Param::json("fields")]);
const GET_PAGE_ACCESS_TOKEN: EndpointSpec =
    EndpointSpec::get(&[Param::plain("fields").required()]);

/// Debug information about `token`, queried with the app access token.
pub fn debug_token(credentials: &Credentials, token: &str) -> AdsResult<ApiRequest> {
    DEBUG_TOKEN.bind(
        "debug_token",
        Values::new()
            .set("input_token", token)
            .set("access_token", &credentials.app_access_token()),
    )
}

/// Users of an ad account.
pub fn get_adusers(account_id: &str) -> AdsResult<ApiRequest> {
    GET_ADUSERS.bind(format!("{}/users", act(account_id)), Values::new())
}

pub fn get_adaccount(account_id: &str, fields: &[&str]) -> AdsResult<ApiRequest> {
    GET_ADACCOUNT.bind(act(account_id), Values::new().set_opt("fields", non_empty(fields)))
}

/// Ad accounts a user can access.
pub fn get_adaccounts(user_id: &str, fields: &[&str]) -> AdsResult<ApiRequest> {
    GET_ADACCOUNTS.bind(
        format!("{}/adaccounts", user_id),
        Values::new().set_opt("fields", non_empty(fields)),
    )
}

/// Pages the user can manage, with their page tokens.
pub fn get_user_pages(user_id: &str, fields: &[&str]) -> AdsResult<ApiRequest> {
    GET_USER_PAGES.bind(
        format!("{}/accounts", user_id),
        Values::new().set_opt("fields", non_empty(fields)),
    )
}

pub fn get_page_access_token(page_id: &str) -> AdsResult<ApiRequest> {
    GET_PAGE_ACCESS_TOKEN.bind(page_id, Values::new().set("fields", "access_token"))
}
