//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::types::*;

/// Storage abstraction for batches and contributions
///
/// The giving core depends only on this trait, so any backend (a REST API
/// client, PostgreSQL, SQLite, in-memory) can sit behind it.
#[async_trait]
pub trait GivingStorage: Send + Sync {
    /// Save a new batch
    async fn save_batch(&mut self, batch: &Batch) -> ChurchResult<()>;

    /// Get a batch by ID
    async fn get_batch(&self, batch_id: &str) -> ChurchResult<Option<Batch>>;

    /// List all batches
    async fn list_batches(&self) -> ChurchResult<Vec<Batch>>;

    /// Update an existing batch
    async fn update_batch(&mut self, batch: &Batch) -> ChurchResult<()>;

    /// Save a contribution line item
    async fn save_contribution(&mut self, contribution: &Contribution) -> ChurchResult<()>;

    /// Get a contribution by ID
    async fn get_contribution(&self, contribution_id: &str)
        -> ChurchResult<Option<Contribution>>;

    /// Delete a contribution line item
    async fn delete_contribution(&mut self, contribution_id: &str) -> ChurchResult<()>;

    /// List the contributions entered into a batch, most recent entry first
    async fn list_batch_contributions(&self, batch_id: &str) -> ChurchResult<Vec<Contribution>>;

    /// List contributions across all batches within a date range
    async fn list_contributions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ChurchResult<Vec<Contribution>>;

    /// List contributions given by a member
    async fn list_member_contributions(&self, member_id: &str) -> ChurchResult<Vec<Contribution>>;
}

/// Storage abstraction for members, groups and events
#[async_trait]
pub trait DirectoryStorage: Send + Sync {
    async fn save_member(&mut self, member: &Member) -> ChurchResult<()>;

    async fn get_member(&self, member_id: &str) -> ChurchResult<Option<Member>>;

    async fn list_members(&self) -> ChurchResult<Vec<Member>>;

    async fn save_group(&mut self, group: &Group) -> ChurchResult<()>;

    async fn get_group(&self, group_id: &str) -> ChurchResult<Option<Group>>;

    async fn list_groups(&self) -> ChurchResult<Vec<Group>>;

    async fn save_event(&mut self, event: &Event) -> ChurchResult<()>;

    async fn get_event(&self, event_id: &str) -> ChurchResult<Option<Event>>;

    async fn list_events(&self) -> ChurchResult<Vec<Event>>;

    async fn save_registration(&mut self, registration: &EventRegistration) -> ChurchResult<()>;

    /// Registrations for an event in sign-up order
    async fn list_event_registrations(&self, event_id: &str)
        -> ChurchResult<Vec<EventRegistration>>;

    async fn save_attendance(&mut self, record: &AttendanceRecord) -> ChurchResult<()>;

    /// Attendance records for a service or event, in any order
    async fn list_attendance(&self, service_id: &str) -> ChurchResult<Vec<AttendanceRecord>>;
}

/// Trait for implementing custom contribution validation rules
pub trait ContributionValidator: Send + Sync {
    /// Validate a contribution before it is entered into a batch
    fn validate_contribution(&self, contribution: &Contribution) -> ChurchResult<()>;
}

/// Default contribution validator with the rules the entry form enforces
pub struct DefaultContributionValidator;

impl ContributionValidator for DefaultContributionValidator {
    fn validate_contribution(&self, contribution: &Contribution) -> ChurchResult<()> {
        if contribution.amount <= BigDecimal::from(0) {
            return Err(ChurchError::Validation(
                "A valid Amount is required.".to_string(),
            ));
        }

        if contribution.fund.trim().is_empty() {
            return Err(ChurchError::Validation("Fund is required.".to_string()));
        }

        if let Donor::Named(name) = &contribution.donor {
            if name.trim().is_empty() {
                return Err(ChurchError::Validation(
                    "Donor Name is required unless contribution is anonymous.".to_string(),
                ));
            }
        }

        Ok(())
    }
}
