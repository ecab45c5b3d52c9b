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

//! Account flows.
//!
//! The registration and password-reset sequences the front end drives,
//! composed from the token policy and the notification log.

use tracing::info;

use crate::config::Config;
use crate::lifecycle::policy::TokenPolicy;
use crate::notifications::log::NotificationLog;
use crate::notifications::templates;
use crate::notify_core::errors::StoreError;
use crate::notify_core::models::{Channel, VerifyOutcome};
use crate::notify_core::traits::{CredentialStore, NotificationStore};
use crate::store::{JsonCredentialStore, JsonNotificationStore};
use crate::utils::time::{Clock, SystemClock};

pub struct AccountNotifier<CS, NS, C = SystemClock> {
    pub tokens: TokenPolicy<CS, C>,
    pub notifications: NotificationLog<NS, C>,
}

impl AccountNotifier<JsonCredentialStore, JsonNotificationStore, SystemClock> {
    /// JSON documents under `config.data_dir`, wall clock.
    pub fn open(config: &Config) -> Self {
        Self::new(
            TokenPolicy::new(JsonCredentialStore::in_dir(&config.data_dir)).configured(config),
            NotificationLog::new(JsonNotificationStore::in_dir(&config.data_dir))
                .configured(config),
        )
    }
}

impl<CS, NS, C> AccountNotifier<CS, NS, C>
where
    CS: CredentialStore,
    NS: NotificationStore,
    C: Clock,
{
    pub fn new(tokens: TokenPolicy<CS, C>, notifications: NotificationLog<NS, C>) -> Self {
        Self {
            tokens,
            notifications,
        }
    }

    pub fn register(&self, email: &str, username: &str) -> Result<(), StoreError> {
        self.notifications.send_registration_email(email, username)?;
        info!(email = email, "Registration email sent");
        Ok(())
    }

    /// Issue a reset token for `email` and mail it. Returns the token.
    ///
    /// The token is stored before the email is recorded, so a failed
    /// store never leaves an email pointing at a token that does not exist.
    pub fn initiate_password_reset(&self, email: &str, username: &str) -> Result<String, StoreError> {
        let token = self.tokens.generate_reset_token();
        self.tokens.store_reset_token(email, &token)?;
        self.notifications
            .send_password_reset_email(email, username, &token)?;
        info!(email = email, "Password reset initiated");
        Ok(token)
    }

    pub fn complete_password_reset(
        &self,
        email: &str,
        token: &str,
    ) -> Result<VerifyOutcome, StoreError> {
        let outcome = self.tokens.verify_reset_token(email, token)?;
        info!(email = email, outcome = outcome.as_str(), "Password reset checked");
        Ok(outcome)
    }

    /// Issue an OTP for `identifier` and deliver it over `channel`. Returns the code.
    pub fn send_otp(
        &self,
        identifier: &str,
        purpose: &str,
        channel: Channel,
    ) -> Result<String, StoreError> {
        let otp = self.tokens.generate_otp();
        self.tokens.store_otp(identifier, &otp, purpose)?;

        let body = templates::otp_body(&otp, purpose, self.tokens.otp_ttl_minutes());
        match channel {
            Channel::Email => {
                self.notifications
                    .send_email_notification(identifier, templates::OTP_SUBJECT, &body)?
            }
            Channel::Sms => self.notifications.send_sms_notification(identifier, &body)?,
        }
        Ok(otp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryCredentialStore, MemoryNotificationStore};
    use crate::utils::time::ManualClock;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    type TestNotifier =
        AccountNotifier<MemoryCredentialStore, MemoryNotificationStore, Arc<ManualClock>>;

    fn notifier() -> (TestNotifier, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        ));
        let notifier = AccountNotifier::new(
            TokenPolicy::with_clock(MemoryCredentialStore::new(), clock.clone()),
            NotificationLog::with_clock(MemoryNotificationStore::new(), clock.clone()),
        );
        (notifier, clock)
    }

    #[test]
    fn test_reset_flow_round_trip() {
        let (notifier, _) = notifier();
        let token = notifier
            .initiate_password_reset("donor@example.org", "asha")
            .unwrap();

        let inbox = notifier.notifications.get_user_notifications("donor@example.org");
        assert_eq!(inbox.len(), 1);
        assert!(inbox[0].body.contains(&token));

        assert_eq!(
            notifier
                .complete_password_reset("donor@example.org", &token)
                .unwrap(),
            VerifyOutcome::Verified
        );
        assert_eq!(
            notifier
                .complete_password_reset("donor@example.org", &token)
                .unwrap(),
            VerifyOutcome::NotFound
        );
    }

    #[test]
    fn test_reset_token_expires_after_fifteen_minutes() {
        let (notifier, clock) = notifier();
        let token = notifier
            .initiate_password_reset("donor@example.org", "asha")
            .unwrap();
        clock.advance(Duration::minutes(15) + Duration::seconds(1));

        assert_eq!(
            notifier
                .complete_password_reset("donor@example.org", &token)
                .unwrap(),
            VerifyOutcome::Expired
        );
    }

    #[test]
    fn test_failed_token_store_sends_nothing() {
        let (notifier, _) = notifier();
        notifier.tokens.store().fail_saves(true);

        assert!(notifier
            .initiate_password_reset("donor@example.org", "asha")
            .is_err());
        assert!(notifier
            .notifications
            .get_user_notifications("donor@example.org")
            .is_empty());
    }

    #[test]
    fn test_send_otp_over_sms() {
        let (notifier, _) = notifier();
        let otp = notifier
            .send_otp("+15550100", "login", Channel::Sms)
            .unwrap();

        let inbox = notifier.notifications.get_user_notifications("+15550100");
        assert_eq!(inbox[0].channel, Channel::Sms);
        assert!(inbox[0].body.contains(&otp));
        assert!(notifier.tokens.verify_otp("+15550100", &otp).unwrap().is_verified());
    }

    #[test]
    fn test_register_sends_welcome() {
        let (notifier, _) = notifier();
        notifier.register("donor@example.org", "asha").unwrap();
        let inbox = notifier.notifications.get_user_notifications("donor@example.org");
        assert_eq!(
            inbox[0].subject.as_deref(),
            Some(templates::REGISTRATION_SUBJECT)
        );
    }
}
