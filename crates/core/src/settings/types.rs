//! Settings records, drafts and validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::SettingsError;

/// Longest device serial number the vendor accepts.
const MAX_DEVICE_SERIAL_LEN: usize = 100;

/// Vendor environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Environment {
    /// `sbx`
    #[default]
    Sandbox,
    /// `prod`
    Production,
}

impl Environment {
    /// Short key used in cache keys and audit URLs.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Sandbox => "sbx",
            Self::Production => "prod",
        }
    }

    /// Stored name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "Sandbox",
            Self::Production => "Production",
        }
    }

    /// OAuth token endpoint.
    #[must_use]
    pub const fn token_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://sbx.kra.go.ke/v1/token/generate",
            Self::Production => "https://kra.go.ke/v1/token/generate",
        }
    }

    /// API base URL.
    #[must_use]
    pub const fn api_base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://etims-api-sbx.kra.go.ke/etims-api",
            Self::Production => "https://etims-api.kra.go.ke/etims-api",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" | "sbx" => Ok(Self::Sandbox),
            "production" | "prod" => Ok(Self::Production),
            other => Err(SettingsError::Validation(format!(
                "unknown environment '{other}'"
            ))),
        }
    }
}

/// KRA PIN shape: a letter, nine digits, a letter.
#[must_use]
pub fn is_valid_kra_pin(pin: &str) -> bool {
    let bytes = pin.as_bytes();
    bytes.len() == 11
        && bytes[0].is_ascii_alphabetic()
        && bytes[10].is_ascii_alphabetic()
        && bytes[1..10].iter().all(u8::is_ascii_digit)
}

/// A stored settings record.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct EtimsSettings {
    pub id: Uuid,
    pub company: String,
    pub vendor: String,
    pub environment: Environment,
    /// Two-character branch id.
    pub bhfid: String,
    pub tin: String,
    pub dvc_srl_no: Option<String>,
    #[serde(skip_serializing)]
    pub consumer_key: String,
    #[serde(skip_serializing)]
    pub consumer_secret: String,
    /// `cmcKey` returned by OSCU initialization.
    #[serde(skip_serializing)]
    pub communication_key: Option<String>,
    /// `sdcId` returned by OSCU initialization.
    pub scu_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for EtimsSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EtimsSettings")
            .field("id", &self.id)
            .field("company", &self.company)
            .field("vendor", &self.vendor)
            .field("environment", &self.environment)
            .field("bhfid", &self.bhfid)
            .field("tin", &self.tin)
            .field("scu_id", &self.scu_id)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

fn default_vendor() -> String {
    "OSCU KRA".to_string()
}

/// Input for creating or updating a settings record.
#[derive(Clone, Deserialize)]
#[allow(missing_docs)]
pub struct SettingsDraft {
    pub company: String,
    #[serde(default = "default_vendor")]
    pub vendor: String,
    #[serde(default)]
    pub environment: Environment,
    pub bhfid: String,
    pub tin: String,
    #[serde(default)]
    pub dvc_srl_no: Option<String>,
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde(default)]
    pub is_active: bool,
    /// Skip OSCU initialization on insert (sandbox development only).
    #[serde(default)]
    pub skip_initialization: bool,
}

impl fmt::Debug for SettingsDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsDraft")
            .field("company", &self.company)
            .field("vendor", &self.vendor)
            .field("environment", &self.environment)
            .field("bhfid", &self.bhfid)
            .field("tin", &self.tin)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl SettingsDraft {
    /// Checks every field rule, reporting the first violation.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let fail = |msg: &str| Err(SettingsError::Validation(msg.to_string()));

        if self.bhfid.chars().count() != 2 {
            return fail("Branch ID must be exactly 2 characters (e.g. '00', '01')");
        }
        if self
            .dvc_srl_no
            .as_deref()
            .is_some_and(|serial| serial.chars().count() > MAX_DEVICE_SERIAL_LEN)
        {
            return fail("Device serial number cannot exceed 100 characters");
        }
        if self.consumer_key.trim().is_empty() {
            return fail("Consumer key is mandatory");
        }
        if self.consumer_secret.trim().is_empty() {
            return fail("Consumer secret is mandatory");
        }
        if self.company.trim().is_empty() {
            return fail("Company is mandatory");
        }
        if self.tin.trim().is_empty() {
            return fail("Taxpayer PIN is mandatory");
        }
        if !is_valid_kra_pin(&self.tin) {
            return fail("Taxpayer PIN is not a valid KRA PIN (a letter, 9 digits, a letter)");
        }
        if self.skip_initialization && self.environment == Environment::Production {
            return fail("OSCU initialization can only be skipped in the sandbox");
        }
        Ok(())
    }

    /// A new record from this draft.
    #[must_use]
    pub fn into_settings(self, now: DateTime<Utc>) -> EtimsSettings {
        EtimsSettings {
            id: Uuid::now_v7(),
            company: self.company,
            vendor: self.vendor,
            environment: self.environment,
            bhfid: self.bhfid,
            tin: self.tin,
            dvc_srl_no: self.dvc_srl_no,
            consumer_key: self.consumer_key,
            consumer_secret: self.consumer_secret,
            communication_key: None,
            scu_id: None,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies this draft over an existing record, keeping its identity and
    /// initialization results.
    pub fn apply_to(self, settings: &mut EtimsSettings, now: DateTime<Utc>) {
        settings.company = self.company;
        settings.vendor = self.vendor;
        settings.environment = self.environment;
        settings.bhfid = self.bhfid;
        settings.tin = self.tin;
        settings.dvc_srl_no = self.dvc_srl_no;
        settings.consumer_key = self.consumer_key;
        settings.consumer_secret = self.consumer_secret;
        settings.is_active = self.is_active;
        settings.updated_at = now;
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
