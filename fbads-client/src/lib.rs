//! FBADS CLIENT - Facebook Ads Graph API client
//!
//! Endpoint wrappers in [`endpoints`] build [`ApiRequest`] values without
//! touching the network. An [`AdsClient`] either executes one directly or
//! submits many described requests as a single batch call.
//!
//! # Example
//! ```ignore
//! use fbads_client::{endpoints::{accounts, campaigns}, AdsClient, ClientConfig};
//!
//! let client = AdsClient::from_config(&ClientConfig::load()?)?;
//!
//! // Live
//! let account = client.execute(&accounts::get_adaccount("42", &["currency"])?).await?;
//!
//! // Batched
//! let results = client
//!     .submit_batch(&[
//!         accounts::get_adaccount("42", &["currency"])?.describe()?,
//!         campaigns::get_adcampaigns("42", &["id", "name"])?.describe()?,
//!     ])
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
pub mod transport;

pub use client::{AdsClient, PageToken};
pub use config::{ClientConfig, ConfigError, CredentialsConfig, DEFAULT_TIMEOUT_MS};
pub use transport::ReqwestTransport;

pub use fbads_core::{
    AdsError, AdsResult, ApiError, ApiRequest, Args, BatchDescriptor, BatchItem, Credentials,
    FileContent, FileUpload, Method, Transport, FACEBOOK_API,
};
