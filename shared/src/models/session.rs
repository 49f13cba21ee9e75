//! Session Model
//!
//! A session is one continuous visit by a group of consumers at one table,
//! from first join to close. Sessions are never deleted, only closed — a
//! closed session is the durable record of the visit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Session lifecycle status
///
/// `Active` → `PaymentPending` → `Closed`, or `Active` → `Closed` directly.
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum SessionStatus {
    #[serde(rename = "ACTIVE")]
    #[cfg_attr(feature = "db", sqlx(rename = "ACTIVE"))]
    Active,
    #[serde(rename = "PAYMENT_PENDING")]
    #[cfg_attr(feature = "db", sqlx(rename = "PAYMENT_PENDING"))]
    PaymentPending,
    #[serde(rename = "CLOSED")]
    #[cfg_attr(feature = "db", sqlx(rename = "CLOSED"))]
    Closed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::PaymentPending => "PAYMENT_PENDING",
            Self::Closed => "CLOSED",
        }
    }

    /// Lowercase form used by the client-facing views
    pub fn lower(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::PaymentPending => "payment_pending",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "PAYMENT_PENDING" => Ok(Self::PaymentPending),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(()),
        }
    }
}

/// Session entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Session {
    pub id: i64,
    pub table_id: i64,
    pub status: SessionStatus,
    pub started_at: i64,
    /// Stamped only when the session transitions to CLOSED
    pub ended_at: Option<i64>,
}

/// Consumer entity — a named participant in exactly one session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Consumer {
    pub id: i64,
    pub session_id: i64,
    pub name: String,
    /// Always true in this model: there are no persistent customer accounts
    pub is_guest: bool,
    pub joined_at: i64,
}

/// Start-or-join payload (table-level entry point)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSession {
    pub consumer_name: String,
}

/// Add-consumer payload (session-level)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerAdd {
    pub name: String,
}

/// Session status update payload
///
/// Carried as a raw string so the server can reject out-of-enumeration values
/// with a structured InvalidState error instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusUpdate {
    pub status: String,
}
