//! String-keyed navigation routes.
//!
//! Routes mirror the screen flow: `registration`, `list`, and
//! `detail/{payload}`. A detail route carries the viewed item itself as a
//! JSON payload, so the target screen never depends on the store state at
//! the time of viewing.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::Item;

const REGISTRATION: &str = "registration";
const LIST: &str = "list";
const DETAIL_PREFIX: &str = "detail/";

/// A navigation target within the screen flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// The registration form (initial screen).
    Registration,
    /// The inventory list.
    List,
    /// The detail view for a snapshot of one item.
    Detail(Item),
}

impl Route {
    /// Leading route segment, useful for logging.
    pub fn key(&self) -> &'static str {
        match self {
            Route::Registration => REGISTRATION,
            Route::List => LIST,
            Route::Detail(_) => "detail",
        }
    }
}

/// Failure to parse a route string.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The leading segment matched no known screen.
    #[error("unknown route '{0}'")]
    Unknown(String),
    /// A detail route carried a payload that is not a valid item.
    #[error("invalid detail payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Registration => f.write_str(REGISTRATION),
            Route::List => f.write_str(LIST),
            Route::Detail(item) => {
                let payload = serde_json::to_string(item).map_err(|_| fmt::Error)?;
                write!(f, "{DETAIL_PREFIX}{payload}")
            }
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            REGISTRATION => Ok(Route::Registration),
            LIST => Ok(Route::List),
            other => match other.strip_prefix(DETAIL_PREFIX) {
                Some(payload) => Ok(Route::Detail(serde_json::from_str(payload)?)),
                None => Err(RouteError::Unknown(other.to_string())),
            },
        }
    }
}
