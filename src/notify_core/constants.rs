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

//! bloodbank-notify Constants - Single source of truth for defaults and names.
//!
//! File names, default lifetimes and lengths, and configuration
//! environment variables all live here.

/// Backing document names inside the data directory
pub mod files {
    /// Default data directory, relative to the working directory
    pub const DEFAULT_DATA_DIR: &str = "data";
    /// Credential document (JSON object keyed by identifier)
    pub const CREDENTIALS: &str = "otps.json";
    /// Notification document (JSON array, append-only)
    pub const NOTIFICATIONS: &str = "notifications.json";
    /// Seed content for an absent credential document
    pub const EMPTY_CREDENTIALS: &str = "{}";
    /// Seed content for an absent notification document
    pub const EMPTY_NOTIFICATIONS: &str = "[]";
}

/// Credential issuance defaults
pub mod credentials {
    /// OTP lifetime in minutes
    pub const OTP_TTL_MINUTES: u32 = 10;
    /// Password-reset token lifetime in minutes
    pub const RESET_TTL_MINUTES: u32 = 15;
    /// Number of decimal digits in an OTP
    pub const OTP_LENGTH: usize = 6;
    /// Number of alphanumeric characters in a reset token
    pub const RESET_TOKEN_LENGTH: usize = 32;
    /// Prefix that namespaces reset tokens away from OTP identifiers
    pub const RESET_PREFIX: &str = "reset_";
    /// Purpose tag recorded for reset tokens
    pub const PURPOSE_PASSWORD_RESET: &str = "password_reset";
}

/// Notification record values
pub mod notification {
    /// The only status a simulated message ever has
    pub const STATUS_SENT: &str = "sent";
}

/// Configuration Environment Variables
pub mod config {
    pub const ENV_DATA_DIR: &str = "BLOODBANK_DATA_DIR";
    pub const ENV_OTP_TTL_MINUTES: &str = "BLOODBANK_OTP_TTL_MINUTES";
    pub const ENV_RESET_TTL_MINUTES: &str = "BLOODBANK_RESET_TTL_MINUTES";
    pub const ENV_OTP_LENGTH: &str = "BLOODBANK_OTP_LENGTH";
    pub const ENV_RESET_TOKEN_LENGTH: &str = "BLOODBANK_RESET_TOKEN_LENGTH";
    pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
}
