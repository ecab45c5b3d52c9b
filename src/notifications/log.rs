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

//! Notification Log.
//!
//! Records simulated email/SMS messages and answers per-recipient history
//! queries. Records are only ever appended; nothing here edits or deletes one.

use std::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::notifications::templates;
use crate::notify_core::constants::credentials;
use crate::notify_core::errors::StoreError;
use crate::notify_core::models::{Channel, DeliveryStatus, NotificationRecord};
use crate::notify_core::traits::NotificationStore;
use crate::utils::time::{Clock, SystemClock};

pub struct NotificationLog<S, C = SystemClock> {
    store: S,
    clock: C,
    reset_ttl_minutes: u32,
    write_lock: Mutex<()>,
}

impl<S: NotificationStore> NotificationLog<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: NotificationStore, C: Clock> NotificationLog<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            reset_ttl_minutes: credentials::RESET_TTL_MINUTES,
            write_lock: Mutex::new(()),
        }
    }

    /// Take the reset token lifetime quoted in reset emails from `config`.
    pub fn configured(mut self, config: &Config) -> Self {
        self.reset_ttl_minutes = config.reset_ttl_minutes;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn send_email_notification(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), StoreError> {
        self.append(Channel::Email, recipient, Some(subject), body)
    }

    pub fn send_sms_notification(&self, recipient: &str, body: &str) -> Result<(), StoreError> {
        self.append(Channel::Sms, recipient, None, body)
    }

    pub fn send_registration_email(&self, recipient: &str, username: &str) -> Result<(), StoreError> {
        self.send_email_notification(
            recipient,
            templates::REGISTRATION_SUBJECT,
            &templates::registration_body(username),
        )
    }

    pub fn send_password_reset_email(
        &self,
        recipient: &str,
        username: &str,
        token: &str,
    ) -> Result<(), StoreError> {
        self.send_email_notification(
            recipient,
            templates::PASSWORD_RESET_SUBJECT,
            &templates::password_reset_body(username, token, self.reset_ttl_minutes),
        )
    }

    /// Every record for `recipient`, most recent first.
    ///
    /// Records with equal timestamps keep their append order.
    pub fn get_user_notifications(&self, recipient: &str) -> Vec<NotificationRecord> {
        let records = self.store.load().unwrap_or_else(|e| {
            warn!(kind = e.kind(), error = %e, "Notification store unreadable, treating as empty");
            Vec::new()
        });

        let mut matching: Vec<NotificationRecord> = records
            .into_iter()
            .filter(|record| record.recipient == recipient)
            .collect();
        // sort_by is stable
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching
    }

    fn append(
        &self,
        channel: Channel,
        recipient: &str,
        subject: Option<&str>,
        body: &str,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        // An unreadable log is not replaced: that would drop every earlier record.
        let mut records = self.store.load()?;

        records.push(NotificationRecord {
            channel,
            recipient: recipient.to_string(),
            subject: subject.map(str::to_string),
            body: body.to_string(),
            timestamp: self.clock.now(),
            status: DeliveryStatus::Sent,
        });
        self.store.save(&records)?;

        info!(
            channel = %channel,
            recipient = recipient,
            total = records.len(),
            "Notification recorded"
        );
        Ok(())
    }
}
