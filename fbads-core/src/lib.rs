//! fbads core - request descriptors, batch decoding and errors for the
//! Facebook Ads Graph API.
//!
//! Nothing in this crate performs network I/O. A request is described as an
//! [`ApiRequest`]; it is either handed to a [`Transport`]-backed client for
//! live execution, or collapsed with [`ApiRequest::describe`] into a
//! [`BatchDescriptor`] for inclusion in a batch envelope.

pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod file;
pub mod request;
pub mod response;
pub mod transport;

pub use credentials::{appsecret_proof, Credentials};
pub use endpoint::{Encoding, EndpointSpec, Param, Values};
pub use error::{AdsError, AdsResult, ApiError};
pub use file::{resolve, FileContent, FileRef, FileUpload, ImageKind};
pub use request::{
    ApiRequest, Args, BatchDescriptor, Method, RedactedArgs, RedactedDescriptor, ACCESS_TOKEN,
    APPSECRET_PROOF,
};
pub use response::{decode_batch, translate_response, BatchItem};
pub use transport::{HttpRequest, HttpResponse, Transport};

/// Root of the Graph API.
pub const FACEBOOK_API: &str = "https://graph.facebook.com";
