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

//! Credential and notification persistence backends.
//!
//! - [`json_file`] keeps each collection in one JSON document on disk.
//! - [`memory`] keeps it in process, for tests and embedding.

pub mod json_file;
pub mod memory;

pub use json_file::{JsonCredentialStore, JsonFileStore, JsonNotificationStore};
pub use memory::{MemoryCredentialStore, MemoryNotificationStore, MemoryStore};

use std::fs;
use std::path::Path;
use tracing::info;

use crate::notify_core::constants::files;
use crate::notify_core::errors::StoreError;

/// Create `data_dir` and seed any missing document with an empty collection.
///
/// Existing documents are left untouched. Returns how many files were seeded.
pub fn init_data_dir(data_dir: impl AsRef<Path>) -> Result<usize, StoreError> {
    let dir = data_dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let mut seeded = 0;
    for (name, empty) in [
        (files::CREDENTIALS, files::EMPTY_CREDENTIALS),
        (files::NOTIFICATIONS, files::EMPTY_NOTIFICATIONS),
    ] {
        let path = dir.join(name);
        if path.exists() {
            continue;
        }
        fs::write(&path, empty).map_err(|e| StoreError::io(&path, e))?;
        info!(path = %path.display(), "Seeded empty document");
        seeded += 1;
    }
    Ok(seeded)
}
