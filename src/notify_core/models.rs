// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Domain models for credentials and notifications.
//!
//! Pure data structures and their JSON shape. No I/O happens here; the
//! stores in [`crate::store`] own reading and writing the documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::time::timestamp;

/// Whole credential document: identifier -> outstanding credential.
pub type CredentialMap = BTreeMap<String, CredentialEntry>;

/// Whole notification document, in append order.
pub type NotificationLogDoc = Vec<NotificationRecord>;

/// The secret of a credential, tagged by the JSON key it is stored under.
///
/// OTPs persist as `"otp": "123456"`, reset tokens as `"token": "..."`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Secret {
    Otp(String),
    Token(String),
}

impl Secret {
    pub fn as_str(&self) -> &str {
        match self {
            Secret::Otp(s) | Secret::Token(s) => s,
        }
    }
}

/// One outstanding one-time code or reset token.
///
/// The identifier is the key this entry is stored under in a [`CredentialMap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialEntry {
    #[serde(flatten)]
    pub secret: Secret,
    pub purpose: String,
    #[serde(with = "timestamp")]
    pub expires_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl CredentialEntry {
    /// Strict comparison: an entry whose expiry equals `now` is still live.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.secret.as_str() == candidate
    }
}

/// Result of checking a supplied value against a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyOutcome {
    /// Value matched a live entry; the entry has been consumed.
    Verified,
    /// Value differed from a live entry; the entry is kept for retry.
    Mismatch,
    /// Entry was past its expiry; it has been purged.
    Expired,
    /// No entry exists for the identifier.
    NotFound,
}

impl VerifyOutcome {
    pub fn is_verified(self) -> bool {
        matches!(self, VerifyOutcome::Verified)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VerifyOutcome::Verified => "verified",
            VerifyOutcome::Mismatch => "mismatch",
            VerifyOutcome::Expired => "expired",
            VerifyOutcome::NotFound => "not_found",
        }
    }
}

/// Read-only view of an identifier's slot in the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialState {
    Absent,
    Pending,
    /// Present but past expiry, awaiting a lazy or explicit sweep.
    Expired,
}

impl CredentialState {
    pub fn as_str(self) -> &'static str {
        match self {
            CredentialState::Absent => "absent",
            CredentialState::Pending => "pending",
            CredentialState::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
        })
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(Channel::Email),
            "sms" => Ok(Channel::Sms),
            other => Err(format!("unknown channel '{}'", other)),
        }
    }
}

/// Simulated messages are never delivered, so they are never anything but sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    #[default]
    Sent,
}

/// One simulated outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    #[serde(rename = "type")]
    pub channel: Channel,
    pub recipient: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "message")]
    pub body: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: DeliveryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_otp_entry_json_shape() {
        let entry = CredentialEntry {
            secret: Secret::Otp("123456".to_string()),
            purpose: "registration".to_string(),
            expires_at: at(600),
            created_at: at(0),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["otp"], "123456");
        assert_eq!(value["purpose"], "registration");
        assert!(value.get("token").is_none());

        let back: CredentialEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_reset_entry_reads_token_key() {
        let raw = serde_json::json!({
            "token": "AbC123",
            "purpose": "password_reset",
            "expires_at": "2024-05-01T10:15:00",
            "created_at": "2024-05-01T10:00:00"
        });
        let entry: CredentialEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.secret, Secret::Token("AbC123".to_string()));
        assert!(entry.matches("AbC123"));
    }

    #[test]
    fn test_expiry_is_strict() {
        let entry = CredentialEntry {
            secret: Secret::Otp("1".to_string()),
            purpose: "p".to_string(),
            expires_at: at(60),
            created_at: at(0),
        };
        assert!(!entry.is_expired(at(59)));
        assert!(!entry.is_expired(at(60)));
        assert!(entry.is_expired(at(61)));
    }

    #[test]
    fn test_sms_record_omits_subject() {
        let record = NotificationRecord {
            channel: Channel::Sms,
            recipient: "+15550100".to_string(),
            subject: None,
            body: "Your code is 1234".to_string(),
            timestamp: at(0),
            status: DeliveryStatus::Sent,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "sms");
        assert_eq!(value["message"], "Your code is 1234");
        assert_eq!(value["status"], "sent");
        assert!(value.get("subject").is_none());
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("EMAIL".parse::<Channel>(), Ok(Channel::Email));
        assert_eq!("sms".parse::<Channel>(), Ok(Channel::Sms));
        assert!("fax".parse::<Channel>().is_err());
    }
}
