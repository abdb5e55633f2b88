use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const MAX_GUESTS: u32 = 20;
pub const MIN_PLEDGE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RsvpStatus {
    Accept,
    Decline,
    Maybe,
}

impl RsvpStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RsvpStatus::Accept => "ACCEPT",
            RsvpStatus::Decline => "DECLINE",
            RsvpStatus::Maybe => "MAYBE",
        }
    }
}

impl FromStr for RsvpStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACCEPT" => Ok(RsvpStatus::Accept),
            "DECLINE" => Ok(RsvpStatus::Decline),
            "MAYBE" => Ok(RsvpStatus::Maybe),
            _ => Err(AppError::validation(
                "status must be one of ACCEPT, DECLINE, MAYBE",
            )),
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored RSVP document. Empty optional fields are never written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: String,
    pub event_slug: String,
    pub full_name: String,
    pub status: RsvpStatus,
    #[serde(default)]
    pub guests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored pledge document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pledge {
    pub id: String,
    pub event_slug: String,
    pub full_name: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

impl Timestamped for Rsvp {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for Pledge {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// Listing views: optional text comes back as "" instead of being omitted.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpItem {
    pub id: String,
    pub event_slug: String,
    pub full_name: String,
    pub status: RsvpStatus,
    pub guests: u32,
    pub phone: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Rsvp> for RsvpItem {
    fn from(rsvp: Rsvp) -> Self {
        Self {
            id: rsvp.id,
            event_slug: rsvp.event_slug,
            full_name: rsvp.full_name,
            status: rsvp.status,
            guests: rsvp.guests,
            phone: rsvp.phone.unwrap_or_default(),
            message: rsvp.message.unwrap_or_default(),
            created_at: rsvp.created_at,
            updated_at: rsvp.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PledgeItem {
    pub id: String,
    pub event_slug: String,
    pub full_name: String,
    pub amount: f64,
    pub currency: String,
    pub phone: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Pledge> for PledgeItem {
    fn from(pledge: Pledge) -> Self {
        Self {
            id: pledge.id,
            event_slug: pledge.event_slug,
            full_name: pledge.full_name,
            amount: pledge.amount,
            currency: pledge.currency,
            phone: pledge.phone.unwrap_or_default(),
            note: pledge.note.unwrap_or_default(),
            created_at: pledge.created_at,
            updated_at: pledge.updated_at,
        }
    }
}
