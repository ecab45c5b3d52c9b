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

// JSON file backend - one pretty-printed document per collection, rewritten whole

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::notify_core::constants::files;
use crate::notify_core::errors::StoreError;
use crate::notify_core::models::{CredentialEntry, CredentialMap, NotificationLogDoc};
use crate::notify_core::traits::{CredentialStore, NotificationStore};

/// A single JSON document on disk holding a whole collection.
///
/// No locking and no temp-file swap: the last writer wins.
#[derive(Debug, Clone)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _doc: PhantomData<fn() -> T>,
}

pub type JsonCredentialStore = JsonFileStore<CredentialMap>;
pub type JsonNotificationStore = JsonFileStore<NotificationLogDoc>;

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_as<D: DeserializeOwned + Default>(&self) -> Result<D, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Document absent, starting empty");
                return Ok(D::default());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        serde_json::from_str(&text).map_err(|e| StoreError::malformed(&self.path, e))
    }

    fn write(&self, doc: &T) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let text =
            serde_json::to_string_pretty(doc).map_err(|e| StoreError::malformed(&self.path, e))?;
        fs::write(&self.path, text).map_err(|e| StoreError::io(&self.path, e))
    }
}

impl JsonFileStore<CredentialMap> {
    /// Credential document inside `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(files::CREDENTIALS))
    }
}

impl JsonFileStore<NotificationLogDoc> {
    /// Notification document inside `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(files::NOTIFICATIONS))
    }
}

impl CredentialStore for JsonFileStore<CredentialMap> {
    /// The document must be a JSON object. Entries inside it are decoded one
    /// at a time and an undecodable one is skipped, so it cannot take the
    /// other identifiers' codes down with it.
    fn load(&self) -> Result<CredentialMap, StoreError> {
        let raw: BTreeMap<String, Value> = self.read_as()?;
        let total = raw.len();

        let credentials: CredentialMap = raw
            .into_iter()
            .filter_map(|(identifier, value)| {
                match serde_json::from_value::<CredentialEntry>(value) {
                    Ok(entry) => Some((identifier, entry)),
                    Err(e) => {
                        warn!(
                            path = %self.path.display(),
                            identifier = %identifier,
                            error = %e,
                            "Skipping undecodable credential entry"
                        );
                        None
                    }
                }
            })
            .collect();

        if credentials.len() < total {
            warn!(
                skipped = total - credentials.len(),
                kept = credentials.len(),
                "Credential document partially decoded"
            );
        }
        Ok(credentials)
    }

    fn save(&self, credentials: &CredentialMap) -> Result<(), StoreError> {
        self.write(credentials)
    }
}

impl NotificationStore for JsonFileStore<NotificationLogDoc> {
    fn load(&self) -> Result<NotificationLogDoc, StoreError> {
        self.read_as()
    }

    fn save(&self, records: &NotificationLogDoc) -> Result<(), StoreError> {
        self.write(records)
    }
}
