//! Staff domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Role of a staff member. Route groups grant access by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Owner,
    Admin,
    Recept,
    Worker,
    Finance,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Owner => "OWNER",
            StaffRole::Admin => "ADMIN",
            StaffRole::Recept => "RECEPT",
            StaffRole::Worker => "WORKER",
            StaffRole::Finance => "FINANCE",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OWNER" => Ok(StaffRole::Owner),
            "ADMIN" => Ok(StaffRole::Admin),
            "RECEPT" => Ok(StaffRole::Recept),
            "WORKER" => Ok(StaffRole::Worker),
            "FINANCE" => Ok(StaffRole::Finance),
            other => Err(Error::invalid(format!("Unknown staff role '{}'", other))),
        }
    }
}

/// Domain model representing a staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub is_active: bool,
    /// Argon2 PHC string. Never sent to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Input model for updating a staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUpdate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub is_active: bool,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_identity(name: &str, email: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid("Staff name cannot be empty"));
    }
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::invalid(format!("Invalid email address '{}'", email)));
    }
    Ok(())
}

impl NewStaff {
    pub fn validate(&self) -> Result<()> {
        validate_identity(&self.name, &self.email)
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
        self
    }
}

impl StaffUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_identity(&self.name, &self.email)
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
        self
    }
}
