//! Endpoint wrappers.
//!
//! Every function here is pure: it validates its inputs, binds them against
//! the endpoint's static parameter table and returns an [`ApiRequest`].
//! Pass the request to [`crate::AdsClient::execute`] to run it now, or call
//! [`ApiRequest::describe`] to add it to a batch.
//!
//! [`ApiRequest`]: fbads_core::ApiRequest
//! [`ApiRequest::describe`]: fbads_core::ApiRequest::describe

pub mod accounts;
pub mod adgroups;
pub mod audiences;
pub mod campaigns;
pub mod creatives;
pub mod pages;
pub mod pixels;
pub mod stats;
pub mod targeting;

/// Page size requested by list endpoints that page their results.
pub const DATA_LIMIT: u32 = 100;

/// Graph path of an ad account.
pub fn act(account_id: &str) -> String {
    format!("act_{}", account_id)
}

/// `None` for an empty field list, so the argument is left out entirely.
pub(crate) fn non_empty<'a>(fields: &'a [&'a str]) -> Option<&'a [&'a str]> {
    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_act_prefix() {
        assert_eq!(act("1234"), "act_1234");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(&[]), None);
        assert_eq!(non_empty(&["id"]), Some(&["id"][..]));
    }
}
