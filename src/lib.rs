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

//! bloodbank-notify: credentials and notifications for the blood bank workflow.
//!
//! This library issues and verifies one-time codes and password-reset tokens,
//! and records simulated outbound email/SMS messages. All state lives in
//! flat JSON documents under a data directory, loaded whole and rewritten
//! whole on every mutation.

pub mod config;
pub mod flows;
pub mod lifecycle;
pub mod notifications;
pub mod notify_core;
pub mod store;
pub mod utils;

pub use config::Config;
pub use flows::AccountNotifier;
pub use lifecycle::policy::TokenPolicy;
pub use notifications::log::NotificationLog;
pub use notify_core::errors::StoreError;
pub use notify_core::models::{
    Channel, CredentialEntry, CredentialState, NotificationRecord, VerifyOutcome,
};
