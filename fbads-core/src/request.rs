//! Request descriptors: what a single Graph API call looks like before it
//! is either executed live or folded into a batch.

use crate::error::{AdsError, AdsResult};
use crate::file::FileUpload;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ACCESS_TOKEN: &str = "access_token";
pub const APPSECRET_PROOF: &str = "appsecret_proof";

const REDACTED: &str = "[REDACTED]";

fn is_secret(key: &str) -> bool {
    key == ACCESS_TOKEN || key == APPSECRET_PROOF
}

/// HTTP methods used by the Graph API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered request arguments.
///
/// Every mutation consumes `self` and returns a new value, so the arguments
/// a caller built are never amended behind their back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pairs: Vec<(String, String)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an existing value in place.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Set `key` only if it is not present yet.
    pub fn with_default(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if self.contains(&key) {
            self
        } else {
            self.with(key, value)
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }

    /// Percent-encoded `k=v&k=v` in insertion order.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// View suitable for logs, with the access token masked.
    pub fn redacted(&self) -> RedactedArgs<'_> {
        RedactedArgs(self)
    }
}

impl<K, V> FromIterator<(K, V)> for Args
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Args::new(), |args, (k, v)| args.with(k, v))
    }
}

pub struct RedactedArgs<'a>(&'a Args);

impl fmt::Debug for RedactedArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.0.iter() {
            if is_secret(k) {
                map.entry(&k, &REDACTED);
            } else {
                map.entry(&k, &v);
            }
        }
        map.finish()
    }
}

/// One logical Graph API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    pub method: Method,
    pub args: Args,
    pub files: Vec<(String, FileUpload)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            args: Args::new(),
            files: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args = self.args.with(key, value);
        self
    }

    pub fn with_file(mut self, field: impl Into<String>, upload: impl Into<FileUpload>) -> Self {
        self.files.push((field.into(), upload.into()));
        self
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Collapse into a batch item. No network I/O happens here.
    ///
    /// Batch items cannot carry multipart uploads, so a request with files
    /// is rejected instead of silently losing them.
    pub fn describe(&self) -> AdsResult<BatchDescriptor> {
        if self.has_files() {
            return Err(AdsError::FilesInBatch {
                path: self.path.clone(),
            });
        }
        Ok(BatchDescriptor::new(self.method, &self.path, &self.args))
    }
}

/// The `{method, relative_url}` shape of one item inside a batch envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDescriptor {
    pub method: Method,
    pub relative_url: String,
}

impl BatchDescriptor {
    pub fn new(method: Method, path: &str, args: &Args) -> Self {
        let relative_url = if args.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, args.to_query_string())
        };
        Self {
            method,
            relative_url,
        }
    }

    /// View suitable for logs, with credentials in the query masked.
    pub fn redacted(&self) -> RedactedDescriptor<'_> {
        RedactedDescriptor(self)
    }
}

pub struct RedactedDescriptor<'a>(&'a BatchDescriptor);

impl fmt::Debug for RedactedDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let relative_url = match self.0.relative_url.split_once('?') {
            Some((path, query)) => {
                let query = query
                    .split('&')
                    .map(|pair| {
                        let key = pair.split_once('=').map_or(pair, |(k, _)| k);
                        let decoded = urlencoding::decode(key).map(|k| k.into_owned());
                        match decoded {
                            Ok(name) if is_secret(&name) => format!("{}={}", key, REDACTED),
                            _ => pair.to_string(),
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("&");
                format!("{}?{}", path, query)
            }
            None => self.0.relative_url.clone(),
        };
        f.debug_struct("BatchDescriptor")
            .field("method", &self.0.method)
            .field("relative_url", &relative_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode_query(query: &str) -> Vec<(String, String)> {
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (
                    urlencoding::decode(k).unwrap().into_owned(),
                    urlencoding::decode(v).unwrap().into_owned(),
                )
            })
            .collect()
    }

    #[test]
    fn test_args_with_replaces_in_place() {
        let args = Args::new().with("a", "1").with("b", "2").with("a", "3");
        let pairs: Vec<_> = args.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_args_with_default_never_overwrites() {
        let args = Args::new().with(ACCESS_TOKEN, "caller");
        let args = args.with_default(ACCESS_TOKEN, "client");
        assert_eq!(args.get(ACCESS_TOKEN), Some("caller"));

        let fresh = Args::new().with_default(ACCESS_TOKEN, "client");
        assert_eq!(fresh.get(ACCESS_TOKEN), Some("client"));
    }

    #[test]
    fn test_args_builder_does_not_alias() {
        let original = Args::new().with("fields", "id");
        let extended = original.clone().with(ACCESS_TOKEN, "T");
        assert!(!original.contains(ACCESS_TOKEN));
        assert!(extended.contains(ACCESS_TOKEN));
    }

    #[test]
    fn test_query_string_is_percent_encoded() {
        let args = Args::new().with("fields", "id,name").with("q", "a b&c");
        assert_eq!(args.to_query_string(), "fields=id%2Cname&q=a%20b%26c");
    }

    #[test]
    fn test_redacted_masks_token() {
        let args = Args::new().with(ACCESS_TOKEN, "secret").with("fields", "id");
        let debug = format!("{:?}", args.redacted());
        assert!(!debug.contains("secret"));
        assert!(debug.contains("fields"));
    }

    #[test]
    fn test_redacted_descriptor_masks_query_credentials() {
        let args = Args::new()
            .with("input_token", "x")
            .with(ACCESS_TOKEN, "42|TOPSECRET")
            .with(APPSECRET_PROOF, "abc123");
        let descriptor = BatchDescriptor::new(Method::Get, "debug_token", &args);
        let debug = format!("{:?}", descriptor.redacted());
        assert!(!debug.contains("TOPSECRET"));
        assert!(!debug.contains("abc123"));
        assert!(debug.contains("debug_token?input_token=x&access_token=[REDACTED]"));
        assert!(debug.contains("Get"));
    }

    #[test]
    fn test_redacted_descriptor_keeps_bare_path() {
        let descriptor = ApiRequest::delete("6001").describe().unwrap();
        assert_eq!(
            format!("{:?}", descriptor.redacted()),
            r#"BatchDescriptor { method: Delete, relative_url: "6001" }"#
        );
    }

    #[test]
    fn test_describe_without_args_has_bare_path() {
        let descriptor = ApiRequest::delete("123").describe().unwrap();
        assert_eq!(descriptor.method, Method::Delete);
        assert_eq!(descriptor.relative_url, "123");
    }

    #[test]
    fn test_describe_rejects_files() {
        let request = ApiRequest::post("1/videos").with_file("source", b"data".to_vec());
        let err = request.describe().unwrap_err();
        assert!(matches!(err, AdsError::FilesInBatch { ref path } if path == "1/videos"));
    }

    #[test]
    fn test_descriptor_serializes_uppercase_method() {
        let descriptor = ApiRequest::get("act_1")
            .with_arg("fields", "currency")
            .describe()
            .unwrap();
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"method": "GET", "relative_url": "act_1?fields=currency"})
        );
    }

    proptest! {
        #[test]
        fn prop_describe_round_trips_path_and_args(
            path in "[a-z0-9_]{1,12}(/[a-z0-9_]{1,12}){0,2}",
            pairs in prop::collection::btree_map("[a-z_]{1,10}", ".{0,20}", 0..6),
        ) {
            let args: Args = pairs.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            let descriptor = ApiRequest::get(path.clone()).with_args(args).describe().unwrap();

            let (decoded_path, query) = descriptor
                .relative_url
                .split_once('?')
                .unwrap_or((descriptor.relative_url.as_str(), ""));
            prop_assert_eq!(decoded_path, path.as_str());

            let decoded: std::collections::BTreeMap<String, String> =
                decode_query(query).into_iter().collect();
            prop_assert_eq!(decoded, pairs);
        }
    }
}
