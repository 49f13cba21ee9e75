//! Service Call Model
//!
//! A waiter/bill/other request raised against a session, or — for entrance
//! calls — against the restaurant directly with no session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service call type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum CallType {
    #[serde(rename = "WAITER")]
    #[cfg_attr(feature = "db", sqlx(rename = "WAITER"))]
    Waiter,
    #[serde(rename = "BILL")]
    #[cfg_attr(feature = "db", sqlx(rename = "BILL"))]
    Bill,
    #[serde(rename = "OTHER")]
    #[cfg_attr(feature = "db", sqlx(rename = "OTHER"))]
    Other,
}

impl CallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiter => "WAITER",
            Self::Bill => "BILL",
            Self::Other => "OTHER",
        }
    }

    pub fn lower(&self) -> &'static str {
        match self {
            Self::Waiter => "waiter",
            Self::Bill => "bill",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITER" => Ok(Self::Waiter),
            "BILL" => Ok(Self::Bill),
            "OTHER" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

/// Service call status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum CallStatus {
    #[serde(rename = "PENDING")]
    #[cfg_attr(feature = "db", sqlx(rename = "PENDING"))]
    Pending,
    #[serde(rename = "RESOLVED")]
    #[cfg_attr(feature = "db", sqlx(rename = "RESOLVED"))]
    Resolved,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Resolved => "RESOLVED",
        }
    }

    pub fn lower(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service call entity
///
/// Exactly one of `session_id` / `restaurant_id` is set: session calls carry
/// the session, entrance calls carry the restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ServiceCall {
    pub id: i64,
    pub session_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    #[serde(rename = "type")]
    pub call_type: CallType,
    pub status: CallStatus,
    pub created_at: i64,
    pub resolved_at: Option<i64>,
}

/// Create service call payload
///
/// The type is carried as a raw string so out-of-enumeration values map to a
/// structured InvalidState error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCallCreate {
    #[serde(rename = "type")]
    pub call_type: String,
}
