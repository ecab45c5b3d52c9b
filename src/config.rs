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

use crate::notify_core::constants::{config as env_names, credentials, files};
use crate::notify_core::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub otp_ttl_minutes: u32,
    pub reset_ttl_minutes: u32,
    pub otp_length: usize,
    pub reset_token_length: usize,
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            data_dir: lookup(env_names::ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            otp_ttl_minutes: parse_or(
                &lookup,
                env_names::ENV_OTP_TTL_MINUTES,
                defaults.otp_ttl_minutes,
            )?,
            reset_ttl_minutes: parse_or(
                &lookup,
                env_names::ENV_RESET_TTL_MINUTES,
                defaults.reset_ttl_minutes,
            )?,
            otp_length: parse_or(&lookup, env_names::ENV_OTP_LENGTH, defaults.otp_length)?,
            reset_token_length: parse_or(
                &lookup,
                env_names::ENV_RESET_TOKEN_LENGTH,
                defaults.reset_token_length,
            )?,
            log_level: lookup(env_names::ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_format: lookup(env_names::ENV_LOG_FORMAT).unwrap_or(defaults.log_format),
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir.join(files::CREDENTIALS)
    }

    pub fn notifications_path(&self) -> PathBuf {
        self.data_dir.join(files::NOTIFICATIONS)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw,
            }),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(files::DEFAULT_DATA_DIR),
            otp_ttl_minutes: credentials::OTP_TTL_MINUTES,
            reset_ttl_minutes: credentials::RESET_TTL_MINUTES,
            otp_length: credentials::OTP_LENGTH,
            reset_token_length: credentials::RESET_TOKEN_LENGTH,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}
