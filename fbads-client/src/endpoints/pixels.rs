//! Remarketing and offsite conversion pixels.

use super::act;
use fbads_core::{AdsResult, ApiRequest, EndpointSpec, Param, Values};

const NO_PARAMS: EndpointSpec = EndpointSpec::get(&[]);
const CREATE_OFFSITE_PIXEL: EndpointSpec = EndpointSpec::post(&[
    Param::plain("name").required(),
    Param::plain("tag").required(),
]);

pub fn get_remarketing_pixel(account_id: &str) -> AdsResult<ApiRequest> {
    NO_PARAMS.bind(format!("{}/remarketingpixelcode", act(account_id)), Values::new())
}

pub fn get_offsite_pixel(offsite_pixel_id: &str) -> AdsResult<ApiRequest> {
    NO_PARAMS.bind(offsite_pixel_id, Values::new())
}

pub fn get_offsite_pixels(account_id: &str) -> AdsResult<ApiRequest> {
    NO_PARAMS.bind(format!("{}/offsitepixels", act(account_id)), Values::new())
}

/// `tag` is the conversion category, e.g. `CHECKOUT` or `LEAD`.
pub fn create_offsite_pixel(account_id: &str, name: &str, tag: &str) -> AdsResult<ApiRequest> {
    CREATE_OFFSITE_PIXEL.bind(
        format!("{}/offsitepixels", act(account_id)),
        Values::new().set("name", name).set("tag", tag),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbads_core::Method;

    #[test]
    fn test_pixel_paths() {
        assert_eq!(get_remarketing_pixel("42").unwrap().path, "act_42/remarketingpixelcode");
        assert_eq!(get_offsite_pixel("800").unwrap().path, "800");
        assert_eq!(get_offsite_pixels("42").unwrap().path, "act_42/offsitepixels");
    }

    #[test]
    fn test_create_offsite_pixel() {
        let request = create_offsite_pixel("42", "checkout", "CHECKOUT").unwrap();
        assert_eq!(request.method, Method::Post);
        let args: Vec<_> = request.args.iter().collect();
        assert_eq!(args, vec![("name", "checkout"), ("tag", "CHECKOUT")]);
    }
}
