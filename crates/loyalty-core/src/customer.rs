//! Customer records for the loyalty ledger.
//!
//! Field names serialize in camelCase (`joinDate`) so that records written by
//! earlier versions of the front-end keep loading.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{LoyaltyError, Result};
use crate::CustomerId;

/// A loyalty program member and their current points balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Stable customer identifier.
    pub id: CustomerId,

    /// Full name.
    pub name: String,

    /// Contact email. Not editable through profile updates.
    pub email: String,

    /// Postal address, if known.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub address: Option<String>,

    /// Date of birth, if known.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub dob: Option<NaiveDate>,

    /// The day the customer joined the program.
    pub join_date: NaiveDate,

    /// Current points balance. Never negative.
    pub points: u64,
}

impl Customer {
    /// Enroll a new customer with a fresh id and a zero balance.
    #[must_use]
    pub fn enroll(fields: NewCustomer, join_date: NaiveDate) -> Self {
        Self {
            id: CustomerId::generate(),
            name: fields.name.trim().to_string(),
            email: fields.email.trim().to_string(),
            address: fields.address.filter(|a| !a.trim().is_empty()),
            dob: fields.dob,
            join_date,
            points: 0,
        }
    }

    /// Check whether the name or email contains `needle`, ignoring case.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.email.to_lowercase().contains(&needle)
    }
}

/// Fields supplied when enrolling a customer.
///
/// Any `points` field in the input is ignored; new customers always start at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    /// Full name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Postal address.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,

    /// Date of birth.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub dob: Option<NaiveDate>,
}

impl NewCustomer {
    /// Create enrollment fields with just a name and email.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            address: None,
            dob: None,
        }
    }

    /// Check that the name and email are present.
    ///
    /// # Errors
    ///
    /// Returns [`LoyaltyError::InvalidCustomer`] if either is blank or the email has no `@`.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LoyaltyError::InvalidCustomer("name is required".into()));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(LoyaltyError::InvalidCustomer("email is required".into()));
        }
        if !email.contains('@') {
            return Err(LoyaltyError::InvalidCustomer(format!(
                "email {email} is not an address"
            )));
        }
        Ok(())
    }
}

/// Self-service profile edits. Email, balance, and join date are not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New full name.
    pub name: String,

    /// New address; `None` clears it.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,

    /// New date of birth; `None` clears it.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub dob: Option<NaiveDate>,
}

impl ProfileUpdate {
    /// Apply the update to a customer record.
    ///
    /// # Errors
    ///
    /// Returns [`LoyaltyError::InvalidCustomer`] if the new name is blank.
    pub fn apply_to(&self, customer: &mut Customer) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(LoyaltyError::InvalidCustomer("name is required".into()));
        }
        customer.name = name.to_string();
        customer.address = self.address.clone().filter(|a| !a.trim().is_empty());
        customer.dob = self.dob;
        Ok(())
    }
}

/// Treat a missing, null, or empty-string field as `None`.
///
/// HTML date inputs submit `""` when cleared, and older records contain those.
fn blank_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
