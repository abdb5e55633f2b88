//! # Invite Page Gate
//!
//! Rules the invite page follows before opening the RSVP or pledge dialog.
//!
//! ## Flow
//!
//! - Guest clicks RSVP or Pledge
//! - If the session holds `event_access:{slug}` = `ok`, open the dialog
//! - Otherwise prompt for the access code embedded in the page data
//! - Codes are compared trimmed and lowercased, no round trip to the server
//! - On a match, set the flag and open the dialog
//!
//! ## Notes
//!
//! - The flag lives in per-tab session storage and is never synced across tabs or devices
//! - It only hides the dialogs, intake endpoints accept writes without it
//! - `/verify` is stricter: exact match, so `wed2025` passes here but not there
use std::collections::HashMap;

pub const GRANTED: &str = "ok";
pub const MIN_CODE_LENGTH: usize = 3;

/// Session-scoped key/value storage, one per browser tab.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
    fn remove_item(&mut self, key: &str);
}

impl SessionStorage for HashMap<String, String> {
    fn get_item(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&mut self, key: &str) {
        self.remove(key);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Rsvp,
    Pledge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Open(Dialog),
    PromptForCode(Dialog),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeOutcome {
    Granted(Dialog),
    Incorrect,
}

pub fn access_key(slug: &str) -> String {
    format!("event_access:{slug}")
}

pub fn client_code_matches(supplied: &str, expected: &str) -> bool {
    supplied.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Continue stays disabled until this holds.
pub fn can_submit(supplied: &str) -> bool {
    supplied.trim().chars().count() >= MIN_CODE_LENGTH
}

pub struct AccessGate<S> {
    key: String,
    expected_code: String,
    storage: S,
}

impl<S: SessionStorage> AccessGate<S> {
    pub fn new(slug: &str, expected_code: &str, storage: S) -> Self {
        Self {
            key: access_key(slug),
            expected_code: expected_code.to_string(),
            storage,
        }
    }

    pub fn has_access(&self) -> bool {
        self.storage.get_item(&self.key).as_deref() == Some(GRANTED)
    }

    pub fn grant(&mut self) {
        self.storage.set_item(&self.key, GRANTED);
    }

    pub fn clear(&mut self) {
        self.storage.remove_item(&self.key);
    }

    pub fn request_open(&self, dialog: Dialog) -> GateDecision {
        if self.has_access() {
            GateDecision::Open(dialog)
        } else {
            GateDecision::PromptForCode(dialog)
        }
    }

    pub fn submit_code(&mut self, dialog: Dialog, supplied: &str) -> CodeOutcome {
        if !client_code_matches(supplied, &self.expected_code) {
            return CodeOutcome::Incorrect;
        }

        self.grant();
        CodeOutcome::Granted(dialog)
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
