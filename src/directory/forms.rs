//! Input records for creating directory entries

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::utils::validation::validate_required;

/// Details captured when adding a member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub preferred_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub membership_status: MembershipStatus,
    pub join_date: Option<NaiveDate>,
}

impl NewMember {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ChurchResult<()> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ChurchError::Validation(
                "First Name and Last Name are required.".to_string(),
            ));
        }

        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !email.contains('@') {
                return Err(ChurchError::Validation(format!(
                    "Invalid email address: '{}'",
                    email
                )));
            }
        }

        Ok(())
    }
}

/// Details captured when adding a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub group_type: String,
    pub description: Option<String>,
    pub leader_names: Option<String>,
    pub meeting_day: Option<String>,
    pub meeting_time: Option<NaiveTime>,
    pub membership: GroupMembership,
    pub max_capacity: Option<u32>,
    pub is_active: bool,
}

impl NewGroup {
    pub fn new(name: impl Into<String>, group_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group_type: group_type.into(),
            description: None,
            leader_names: None,
            meeting_day: None,
            meeting_time: None,
            membership: GroupMembership::default(),
            max_capacity: None,
            is_active: true,
        }
    }

    pub fn validate(&self) -> ChurchResult<()> {
        validate_required(&self.name, "Group Name is required.")?;
        validate_required(&self.group_type, "Group Type is required.")?;

        if self.max_capacity == Some(0) {
            return Err(ChurchError::Validation(
                "Maximum capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Details captured when adding an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub is_all_day: bool,
    pub location: Option<String>,
    pub enable_registration: bool,
    pub registration_opens: Option<NaiveDate>,
    pub registration_closes: Option<NaiveDate>,
    pub capacity: Option<u32>,
    pub status: EventStatus,
}

impl NewEvent {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: None,
            start_date: None,
            start_time: None,
            end_date: None,
            end_time: None,
            is_all_day: false,
            location: None,
            enable_registration: false,
            registration_opens: None,
            registration_closes: None,
            capacity: None,
            status: EventStatus::default(),
        }
    }

    pub fn starts(mut self, date: NaiveDate, time: Option<NaiveTime>) -> Self {
        self.start_date = Some(date);
        self.start_time = time;
        self
    }

    pub fn all_day(mut self) -> Self {
        self.is_all_day = true;
        self.end_time = None;
        self
    }

    pub fn registration(mut self, opens: Option<NaiveDate>, closes: Option<NaiveDate>) -> Self {
        self.enable_registration = true;
        self.registration_opens = opens;
        self.registration_closes = closes;
        self
    }

    /// Validate the form and produce the registration window, if enabled
    pub fn validate(&self) -> ChurchResult<Option<RegistrationWindow>> {
        validate_required(&self.name, "Event Name is required.")?;
        validate_required(&self.category, "Event Category is required.")?;

        let start_date = self.start_date.ok_or_else(|| {
            ChurchError::Validation("Start Date and Start Time are required.".to_string())
        })?;
        // All-day events only need a start date
        if !self.is_all_day && self.start_time.is_none() {
            return Err(ChurchError::Validation(
                "Start Date and Start Time are required.".to_string(),
            ));
        }

        if let Some(end_date) = self.end_date {
            if end_date < start_date {
                return Err(ChurchError::Validation(
                    "End Date cannot be before Start Date.".to_string(),
                ));
            }
        }

        if !self.enable_registration {
            return Ok(None);
        }

        match (self.registration_opens, self.registration_closes) {
            (Some(opens), Some(closes)) if opens <= closes => Ok(Some(RegistrationWindow {
                opens,
                closes,
                capacity: self.capacity,
            })),
            (Some(_), Some(_)) => Err(ChurchError::Validation(
                "Registration Start Date cannot be after Registration End Date.".to_string(),
            )),
            _ => Err(ChurchError::Validation(
                "Registration Start and End Dates are required if registration is enabled."
                    .to_string(),
            )),
        }
    }
}

/// Details captured by the portal event sign-up form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub attendees: u32,
    pub notes: Option<String>,
    /// Day the sign-up is made; checked against the registration window
    pub registered_on: NaiveDate,
}

impl NewRegistration {
    /// A sign-up for one attendee, made today
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            attendees: 1,
            notes: None,
            registered_on: chrono::Utc::now().date_naive(),
        }
    }

    pub fn attendees(mut self, attendees: u32) -> Self {
        self.attendees = attendees;
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.registered_on = date;
        self
    }

    pub fn validate(&self) -> ChurchResult<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ChurchError::Validation(
                "Name and Email are required.".to_string(),
            ));
        }
        if self.attendees < 1 {
            return Err(ChurchError::Validation(
                "Number of attendees must be at least 1.".to_string(),
            ));
        }
        Ok(())
    }
}
