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

// Fixed message templates

pub const REGISTRATION_SUBJECT: &str = "Welcome to Blood Bank Management System";
pub const PASSWORD_RESET_SUBJECT: &str = "Password Reset Link - Blood Bank Management System";
pub const OTP_SUBJECT: &str = "Your verification code - Blood Bank Management System";

pub fn registration_body(username: &str) -> String {
    format!(
        "\nDear {username},\n\n\
         Welcome to the Blood Bank Management System!\n\n\
         Your account has been successfully created. You can now:\n\
         - Donate blood and track your donations\n\
         - Request blood when needed\n\
         - Find nearby blood banks\n\
         - View real-time blood inventory\n\n\
         Thank you for joining our life-saving community!\n\n\
         Best regards,\n\
         Blood Bank Management Team\n"
    )
}

pub fn password_reset_body(username: &str, token: &str, ttl_minutes: u32) -> String {
    format!(
        "\nDear {username},\n\n\
         You have requested to reset your password for the Blood Bank Management System.\n\n\
         Reset Token: {token}\n\n\
         This token will expire in {ttl_minutes} minutes. \
         If you did not request this reset, please ignore this email.\n\n\
         Best regards,\n\
         Blood Bank Management Team\n"
    )
}

pub fn otp_body(otp: &str, purpose: &str, ttl_minutes: u32) -> String {
    format!("Your {purpose} code is {otp}. It expires in {ttl_minutes} minutes.")
}
