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

//! Store Traits.
//!
//! Whole-document persistence seams. The token policy and the notification
//! log only ever see these traits, so a JSON file, an in-memory fake or a
//! future transactional backend can sit behind them unchanged.

use crate::notify_core::errors::StoreError;
use crate::notify_core::models::{CredentialMap, NotificationLogDoc};

/// Key-value persistence of outstanding credentials.
pub trait CredentialStore: Send + Sync {
    /// Load the full document. An absent document is an empty map, not an error.
    fn load(&self) -> Result<CredentialMap, StoreError>;

    /// Overwrite the full document.
    fn save(&self, credentials: &CredentialMap) -> Result<(), StoreError>;
}

/// Append-only record of simulated outbound messages.
pub trait NotificationStore: Send + Sync {
    /// Load every record in append order. An absent document is empty.
    fn load(&self) -> Result<NotificationLogDoc, StoreError>;

    /// Overwrite the full document.
    fn save(&self, records: &NotificationLogDoc) -> Result<(), StoreError>;
}
