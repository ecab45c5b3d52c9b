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

//! Token Policy.
//!
//! Per identifier the lifecycle is `absent -> issued -> {verified, expired}`,
//! and both terminal states remove the entry. Re-issuing replaces the
//! outstanding entry and restarts its clock. Expiry is only checked when
//! someone looks: verification purges a stale entry for that identifier,
//! and [`TokenPolicy::sweep_expired`] purges all of them on request.

use chrono::Duration;
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::lifecycle::secrets;
use crate::notify_core::constants::credentials;
use crate::notify_core::errors::StoreError;
use crate::notify_core::models::{
    CredentialEntry, CredentialMap, CredentialState, Secret, VerifyOutcome,
};
use crate::notify_core::traits::CredentialStore;
use crate::utils::time::{Clock, SystemClock};

/// Store key for a reset token, kept apart from OTP identifiers.
pub fn reset_identifier(email: &str) -> String {
    format!("{}{}", credentials::RESET_PREFIX, email)
}

pub struct TokenPolicy<S, C = SystemClock> {
    store: S,
    clock: C,
    otp_ttl_minutes: u32,
    reset_ttl_minutes: u32,
    otp_length: usize,
    reset_token_length: usize,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl<S: CredentialStore> TokenPolicy<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: CredentialStore, C: Clock> TokenPolicy<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            otp_ttl_minutes: credentials::OTP_TTL_MINUTES,
            reset_ttl_minutes: credentials::RESET_TTL_MINUTES,
            otp_length: credentials::OTP_LENGTH,
            reset_token_length: credentials::RESET_TOKEN_LENGTH,
            write_lock: Mutex::new(()),
        }
    }

    /// Take lifetimes and lengths from `config`.
    pub fn configured(mut self, config: &Config) -> Self {
        self.otp_ttl_minutes = config.otp_ttl_minutes;
        self.reset_ttl_minutes = config.reset_ttl_minutes;
        self.otp_length = config.otp_length;
        self.reset_token_length = config.reset_token_length;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn otp_ttl_minutes(&self) -> u32 {
        self.otp_ttl_minutes
    }

    pub fn reset_ttl_minutes(&self) -> u32 {
        self.reset_ttl_minutes
    }

    pub fn generate_otp(&self) -> String {
        secrets::generate_otp(self.otp_length)
    }

    pub fn generate_otp_with_length(&self, length: usize) -> String {
        secrets::generate_otp(length)
    }

    pub fn generate_reset_token(&self) -> String {
        secrets::generate_reset_token(self.reset_token_length)
    }

    pub fn generate_reset_token_with_length(&self, length: usize) -> String {
        secrets::generate_reset_token(length)
    }

    pub fn store_otp(&self, identifier: &str, otp: &str, purpose: &str) -> Result<(), StoreError> {
        self.store_otp_with_ttl(identifier, otp, purpose, self.otp_ttl_minutes)
    }

    pub fn store_otp_with_ttl(
        &self,
        identifier: &str,
        otp: &str,
        purpose: &str,
        ttl_minutes: u32,
    ) -> Result<(), StoreError> {
        self.issue(
            identifier.to_string(),
            Secret::Otp(otp.to_string()),
            purpose,
            ttl_minutes,
        )
    }

    pub fn verify_otp(&self, identifier: &str, otp: &str) -> Result<VerifyOutcome, StoreError> {
        self.verify(identifier, otp)
    }

    /// True when no entry exists for `identifier`.
    ///
    /// Absence is all this can see: "verified", "never issued" and
    /// "expired and purged" all read as true. Use
    /// [`TokenPolicy::credential_state`] to tell a pending code apart.
    pub fn is_otp_verified(&self, identifier: &str) -> bool {
        !self.load_or_empty().contains_key(identifier)
    }

    /// Read-only; an expired entry is reported, not purged.
    pub fn credential_state(&self, identifier: &str) -> CredentialState {
        match self.load_or_empty().get(identifier) {
            None => CredentialState::Absent,
            Some(entry) if entry.is_expired(self.clock.now()) => CredentialState::Expired,
            Some(_) => CredentialState::Pending,
        }
    }

    /// The outstanding entry for `identifier`, expired or not.
    ///
    /// Unlike the other reads this does not mask store failures.
    pub fn entry(&self, identifier: &str) -> Result<CredentialEntry, StoreError> {
        self.store
            .load()?
            .remove(identifier)
            .ok_or_else(|| StoreError::NotFound(identifier.to_string()))
    }

    pub fn store_reset_token(&self, email: &str, token: &str) -> Result<(), StoreError> {
        self.store_reset_token_with_ttl(email, token, self.reset_ttl_minutes)
    }

    pub fn store_reset_token_with_ttl(
        &self,
        email: &str,
        token: &str,
        ttl_minutes: u32,
    ) -> Result<(), StoreError> {
        self.issue(
            reset_identifier(email),
            Secret::Token(token.to_string()),
            credentials::PURPOSE_PASSWORD_RESET,
            ttl_minutes,
        )
    }

    pub fn verify_reset_token(&self, email: &str, token: &str) -> Result<VerifyOutcome, StoreError> {
        self.verify(&reset_identifier(email), token)
    }

    /// Remove every expired entry. Returns how many were removed.
    ///
    /// Nothing calls this implicitly; lazy purging on verify stays the default.
    pub fn sweep_expired(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut credentials = self.load_or_empty();
        let now = self.clock.now();

        let before = credentials.len();
        credentials.retain(|_, entry| !entry.is_expired(now));
        let removed = before - credentials.len();

        if removed > 0 {
            self.store.save(&credentials)?;
        }
        info!(removed, remaining = credentials.len(), "Swept expired credentials");
        Ok(removed)
    }

    fn issue(
        &self,
        identifier: String,
        secret: Secret,
        purpose: &str,
        ttl_minutes: u32,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut credentials = self.load_or_empty();

        let now = self.clock.now();
        let entry = CredentialEntry {
            secret,
            purpose: purpose.to_string(),
            expires_at: now + Duration::minutes(i64::from(ttl_minutes)),
            created_at: now,
        };

        let replaced = credentials.insert(identifier.clone(), entry).is_some();
        self.store.save(&credentials)?;

        info!(
            identifier = %identifier,
            purpose = purpose,
            ttl_minutes = ttl_minutes,
            replaced = replaced,
            "Issued credential"
        );
        Ok(())
    }

    fn verify(&self, identifier: &str, candidate: &str) -> Result<VerifyOutcome, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut credentials = self.load_or_empty();

        let Some(entry) = credentials.get(identifier) else {
            debug!(identifier = identifier, "No credential outstanding");
            return Ok(VerifyOutcome::NotFound);
        };

        // Expiry wins over a matching value.
        let outcome = if entry.is_expired(self.clock.now()) {
            VerifyOutcome::Expired
        } else if entry.matches(candidate) {
            VerifyOutcome::Verified
        } else {
            debug!(identifier = identifier, "Credential mismatch, entry kept");
            return Ok(VerifyOutcome::Mismatch);
        };

        credentials.remove(identifier);
        self.store.save(&credentials)?;

        match outcome {
            VerifyOutcome::Expired => {
                warn!(identifier = identifier, "Credential expired, purged")
            }
            _ => info!(identifier = identifier, "Credential verified and consumed"),
        }
        Ok(outcome)
    }

    fn load_or_empty(&self) -> CredentialMap {
        self.store.load().unwrap_or_else(|e| {
            warn!(kind = e.kind(), error = %e, "Credential store unreadable, treating as empty");
            CredentialMap::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCredentialStore;
    use crate::utils::time::ManualClock;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn policy() -> (TokenPolicy<MemoryCredentialStore, Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        ));
        (
            TokenPolicy::with_clock(MemoryCredentialStore::new(), clock.clone()),
            clock,
        )
    }

    #[test]
    fn test_issue_records_expiry_and_purpose() {
        let (policy, clock) = policy();
        policy.store_otp("donor@example.org", "123456", "registration").unwrap();

        let map = policy.store().snapshot();
        let entry = &map["donor@example.org"];
        assert_eq!(entry.purpose, "registration");
        assert_eq!(entry.created_at, clock.now());
        assert_eq!(entry.expires_at, clock.now() + Duration::minutes(10));
    }

    #[test]
    fn test_reset_token_is_namespaced() {
        let (policy, _) = policy();
        policy.store_reset_token("donor@example.org", "tok").unwrap();

        let map = policy.store().snapshot();
        let entry = &map["reset_donor@example.org"];
        assert_eq!(entry.secret, Secret::Token("tok".to_string()));
        assert_eq!(entry.purpose, "password_reset");
        assert!(!map.contains_key("donor@example.org"));
    }

    #[test]
    fn test_expires_exactly_at_boundary_is_live() {
        let (policy, clock) = policy();
        policy.store_otp_with_ttl("id", "1111", "login", 1).unwrap();

        clock.advance(Duration::minutes(1));
        assert_eq!(policy.credential_state("id"), CredentialState::Pending);
        assert_eq!(policy.verify_otp("id", "1111").unwrap(), VerifyOutcome::Verified);
    }

    #[test]
    fn test_expired_match_is_purged() {
        let (policy, clock) = policy();
        policy.store_otp("id", "1111", "login").unwrap();
        clock.advance(Duration::minutes(10) + Duration::seconds(1));

        assert_eq!(policy.credential_state("id"), CredentialState::Expired);
        assert_eq!(policy.verify_otp("id", "1111").unwrap(), VerifyOutcome::Expired);
        assert!(policy.store().snapshot().is_empty());
        assert_eq!(policy.verify_otp("id", "1111").unwrap(), VerifyOutcome::NotFound);
    }

    #[test]
    fn test_is_otp_verified_conflates_absence() {
        let (policy, _) = policy();
        assert!(policy.is_otp_verified("never-issued"));

        policy.store_otp("id", "1111", "login").unwrap();
        assert!(!policy.is_otp_verified("id"));

        policy.verify_otp("id", "1111").unwrap();
        assert!(policy.is_otp_verified("id"));
    }

    #[test]
    fn test_entry_lookup_reports_not_found() {
        let (policy, clock) = policy();
        assert_eq!(policy.entry("id").unwrap_err().kind(), "not_found");

        policy.store_otp("id", "1111", "login").unwrap();
        let entry = policy.entry("id").unwrap();
        assert_eq!(entry.expires_at, clock.now() + Duration::minutes(10));
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let (policy, clock) = policy();
        policy.store_otp_with_ttl("short", "1", "login", 1).unwrap();
        policy.store_otp_with_ttl("long", "2", "login", 30).unwrap();
        clock.advance(Duration::minutes(5));

        assert_eq!(policy.sweep_expired().unwrap(), 1);
        let map = policy.store().snapshot();
        assert!(map.contains_key("long"));
        assert!(!map.contains_key("short"));
        assert_eq!(policy.sweep_expired().unwrap(), 0);
    }

    #[test]
    fn test_failed_consumption_surfaces_error_and_keeps_entry() {
        let (policy, _) = policy();
        policy.store_otp("id", "1111", "login").unwrap();
        policy.store().fail_saves(true);

        let err = policy.verify_otp("id", "1111").unwrap_err();
        assert_eq!(err.kind(), "io_error");
        assert!(policy.store().snapshot().contains_key("id"));
    }

    #[test]
    fn test_mismatch_never_writes() {
        let (policy, _) = policy();
        policy.store_otp("id", "1111", "login").unwrap();
        policy.store().fail_saves(true);

        assert_eq!(policy.verify_otp("id", "2222").unwrap(), VerifyOutcome::Mismatch);
        assert_eq!(policy.verify_otp("other", "2222").unwrap(), VerifyOutcome::NotFound);
    }

    #[test]
    fn test_configured_lengths() {
        let (policy, _) = policy();
        let config = Config {
            otp_length: 4,
            reset_token_length: 12,
            ..Config::default()
        };
        let policy = policy.configured(&config);
        assert_eq!(policy.generate_otp().len(), 4);
        assert_eq!(policy.generate_reset_token().len(), 12);
        assert_eq!(policy.generate_otp_with_length(9).len(), 9);
    }
}
