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

//! In-memory stores.
//!
//! Drop-in fakes for the JSON backend. `fail_saves` turns every subsequent
//! `save` into an `io_error` so failure paths can be exercised without a
//! real filesystem.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::notify_core::errors::StoreError;
use crate::notify_core::models::{CredentialMap, NotificationLogDoc};
use crate::notify_core::traits::{CredentialStore, NotificationStore};

#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    doc: Mutex<T>,
    fail_saves: AtomicBool,
}

pub type MemoryCredentialStore = MemoryStore<CredentialMap>;
pub type MemoryNotificationStore = MemoryStore<NotificationLogDoc>;

impl<T: Clone + Default> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(doc: T) -> Self {
        Self {
            doc: Mutex::new(doc),
            fail_saves: AtomicBool::new(false),
        }
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Current contents, bypassing the trait.
    pub fn snapshot(&self) -> T {
        self.doc.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn read(&self) -> T {
        self.snapshot()
    }

    fn write(&self, doc: &T) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::io(
                PathBuf::from("<memory>"),
                io::Error::other("simulated write failure"),
            ));
        }
        *self.doc.lock().unwrap_or_else(|e| e.into_inner()) = doc.clone();
        Ok(())
    }
}

impl CredentialStore for MemoryStore<CredentialMap> {
    fn load(&self) -> Result<CredentialMap, StoreError> {
        Ok(self.read())
    }

    fn save(&self, credentials: &CredentialMap) -> Result<(), StoreError> {
        self.write(credentials)
    }
}

impl NotificationStore for MemoryStore<NotificationLogDoc> {
    fn load(&self) -> Result<NotificationLogDoc, StoreError> {
        Ok(self.read())
    }

    fn save(&self, records: &NotificationLogDoc) -> Result<(), StoreError> {
        self.write(records)
    }
}
