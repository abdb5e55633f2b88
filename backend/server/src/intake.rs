//! # Intake
//!
//! Write paths for RSVPs and pledges.
//!
//! Every submission is validated in full before anything touches the store, so a rejected
//! request never leaves a partial document behind. Each accepted submission is exactly one
//! insert tagged with the event slug.
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::{
    database::{Collection, Store},
    error::AppError,
    models::{DEFAULT_CURRENCY, MAX_GUESTS, MIN_PLEDGE, Pledge, Rsvp, RsvpStatus},
    utils::{number_field, text_field},
};

#[derive(Debug, Clone, PartialEq)]
pub struct RsvpSubmission {
    pub full_name: String,
    pub status: RsvpStatus,
    pub guests: u32,
    pub phone: Option<String>,
    pub message: Option<String>,
}

impl RsvpSubmission {
    pub fn from_object(object: &Map<String, Value>) -> Result<Self, AppError> {
        let (Some(full_name), Some(status)) =
            (text_field(object, "fullName"), text_field(object, "status"))
        else {
            return Err(AppError::validation("fullName and status are required"));
        };

        Ok(Self {
            full_name,
            status: status.parse()?,
            guests: parse_guests(number_field(object, "guests")?)?,
            phone: text_field(object, "phone"),
            message: text_field(object, "message"),
        })
    }

    pub fn into_record(self, slug: &str) -> Rsvp {
        let now = Utc::now();

        Rsvp {
            id: Uuid::new_v4().to_string(),
            event_slug: slug.to_string(),
            full_name: self.full_name,
            status: self.status,
            guests: self.guests,
            phone: self.phone,
            message: self.message,
            created_at: now,
            updated_at: now,
        }
    }
}

fn parse_guests(guests: Option<f64>) -> Result<u32, AppError> {
    let Some(guests) = guests else {
        return Ok(0);
    };

    if guests.fract() != 0.0 || !(0.0..=MAX_GUESTS as f64).contains(&guests) {
        return Err(AppError::validation(format!(
            "guests must be a whole number between 0 and {MAX_GUESTS}"
        )));
    }

    Ok(guests as u32)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PledgeSubmission {
    pub full_name: String,
    pub amount: f64,
    pub currency: String,
    pub phone: Option<String>,
    pub note: Option<String>,
}

impl PledgeSubmission {
    pub fn from_object(object: &Map<String, Value>) -> Result<Self, AppError> {
        let full_name = text_field(object, "fullName");
        let amount = number_field(object, "amount")?;

        let (Some(full_name), Some(amount)) = (full_name, amount) else {
            return Err(AppError::validation("fullName and amount are required"));
        };

        if amount < MIN_PLEDGE {
            return Err(AppError::validation(format!(
                "amount must be at least {MIN_PLEDGE}"
            )));
        }

        Ok(Self {
            full_name,
            amount,
            currency: text_field(object, "currency")
                .map(|currency| currency.to_uppercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            phone: text_field(object, "phone"),
            note: text_field(object, "note"),
        })
    }

    pub fn into_record(self, slug: &str) -> Pledge {
        let now = Utc::now();

        Pledge {
            id: Uuid::new_v4().to_string(),
            event_slug: slug.to_string(),
            full_name: self.full_name,
            amount: self.amount,
            currency: self.currency,
            phone: self.phone,
            note: self.note,
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn check_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() {
        return Err(AppError::validation("event slug is required"));
    }

    Ok(())
}

/// Validates and stores one RSVP, returning its id.
pub async fn create_rsvp(
    store: &dyn Store,
    slug: &str,
    object: &Map<String, Value>,
) -> Result<String, AppError> {
    check_slug(slug)?;
    let rsvp = RsvpSubmission::from_object(object)?.into_record(slug);

    store
        .insert(Collection::Rsvps, slug, serde_json::to_string(&rsvp)?)
        .await?;

    info!("RSVP {} ({}) stored for {slug}", rsvp.id, rsvp.status);
    Ok(rsvp.id)
}

/// Validates and stores one pledge, returning its id.
pub async fn create_pledge(
    store: &dyn Store,
    slug: &str,
    object: &Map<String, Value>,
) -> Result<String, AppError> {
    check_slug(slug)?;
    let pledge = PledgeSubmission::from_object(object)?.into_record(slug);

    store
        .insert(Collection::Pledges, slug, serde_json::to_string(&pledge)?)
        .await?;

    info!("Pledge {} stored for {slug}", pledge.id);
    Ok(pledge.id)
}
