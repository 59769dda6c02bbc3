//! Declarative endpoint parameter tables.
//!
//! Each endpoint wrapper declares its parameters once in a static
//! [`EndpointSpec`]; [`EndpointSpec::bind`] is the one routine that checks
//! required parameters, JSON-encodes structured ones and renders the rest.
//!
//! # Example
//! ```ignore
//! const CREATE_OFFSITE_PIXEL: EndpointSpec = EndpointSpec::post(&[
//!     Param::plain("name").required(),
//!     Param::plain("tag").required(),
//! ]);
//!
//! let request = CREATE_OFFSITE_PIXEL.bind(
//!     "act_42/offsitepixels",
//!     Values::new().set("name", "checkout").set("tag", "CHECKOUT"),
//! )?;
//! ```

use crate::error::{AdsError, AdsResult};
use crate::request::{ApiRequest, Args, Method};
use serde::Serialize;
use serde_json::Value;

/// How a parameter value is rendered into a request argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Strings as-is, numbers and booleans via `to_string`, arrays of
    /// scalars comma-joined.
    Plain,
    /// The whole value serialized as a JSON document.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub required: bool,
    pub encoding: Encoding,
}

impl Param {
    pub const fn plain(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            encoding: Encoding::Plain,
        }
    }

    pub const fn json(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            encoding: Encoding::Json,
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }
}

/// Method plus parameter table of one endpoint.
#[derive(Debug, Clone, Copy)]
pub struct EndpointSpec {
    pub method: Method,
    pub params: &'static [Param],
}

impl EndpointSpec {
    pub const fn get(params: &'static [Param]) -> Self {
        Self {
            method: Method::Get,
            params,
        }
    }

    pub const fn post(params: &'static [Param]) -> Self {
        Self {
            method: Method::Post,
            params,
        }
    }

    pub const fn delete(params: &'static [Param]) -> Self {
        Self {
            method: Method::Delete,
            params,
        }
    }

    /// Build the request for `path` from the supplied values.
    ///
    /// Arguments come out in table order, independent of the order the
    /// wrapper supplied them in.
    pub fn bind(&self, path: impl Into<String>, values: Values) -> AdsResult<ApiRequest> {
        let path = path.into();
        let mut values = values.into_entries()?;

        if let Some((name, _)) = values
            .iter()
            .find(|(name, _)| !self.params.iter().any(|p| p.name == *name))
        {
            return Err(AdsError::precondition(format!(
                "{} is not a parameter of {} {}",
                name, self.method, path
            )));
        }

        let mut args = Args::new();
        for param in self.params {
            let value = values
                .iter()
                .position(|(name, _)| *name == param.name)
                .map(|idx| values.swap_remove(idx).1);

            match value {
                Some(value) => args = args.with(param.name, encode(param, &value)?),
                None if param.required => {
                    return Err(AdsError::precondition(format!(
                        "{} is required for {} {}",
                        param.name, self.method, path
                    )))
                }
                None => {}
            }
        }

        Ok(ApiRequest::new(self.method, path).with_args(args))
    }
}

fn encode(param: &Param, value: &Value) -> AdsResult<String> {
    match param.encoding {
        Encoding::Json => Ok(serde_json::to_string(value)?),
        Encoding::Plain => render_plain(value).ok_or_else(|| {
            AdsError::precondition(format!(
                "{} must be a scalar or a list of scalars",
                param.name
            ))
        }),
    }
}

fn render_plain(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(_) | Value::Object(_) | Value::Null => None,
                scalar => render_plain(scalar),
            })
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(",")),
        Value::Null | Value::Object(_) => None,
    }
}

/// Parameter values supplied by an endpoint wrapper.
///
/// Serialization failures are kept and reported by [`EndpointSpec::bind`],
/// so wrappers can chain `set` calls without intermediate `?`.
#[derive(Debug, Default)]
pub struct Values {
    entries: Vec<(&'static str, Value)>,
    error: Option<serde_json::Error>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Serialize + ?Sized>(mut self, name: &'static str, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.retain(|(n, _)| *n != name);
                self.entries.push((name, value));
            }
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
        self
    }

    pub fn set_opt<T: Serialize>(self, name: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(name, &value),
            None => self,
        }
    }

    fn into_entries(self) -> AdsResult<Vec<(&'static str, Value)>> {
        match self.error {
            Some(err) => Err(err.into()),
            None => Ok(self.entries),
        }
    }
}
