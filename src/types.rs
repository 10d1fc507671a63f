//! Core types and data structures for church management

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a contribution batch
///
/// A batch starts `Open` and may move to `Closed` exactly once. There is no
/// path back to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchStatus {
    /// Contributions can still be added or removed
    Open,
    /// Reconciled and finalized; contributions and counted total are frozen
    Closed,
}

impl BatchStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, BatchStatus::Open)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Open => write!(f, "Open"),
            BatchStatus::Closed => write!(f, "Closed"),
        }
    }
}

/// A group of contributions counted and reconciled together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Unique identifier for the batch
    pub id: String,
    /// Human-readable batch name (e.g. "Sunday Offering 2023-11-05")
    pub name: String,
    /// Date the batch was created for
    pub date_created: NaiveDate,
    /// ISO 4217 currency code the batch is counted in
    pub currency: String,
    /// Current lifecycle state
    pub status: BatchStatus,
    /// Physically counted cash/check total, recorded independently of line items
    pub counted_total: BigDecimal,
    /// Who opened the batch
    pub entered_by: Option<String>,
    /// Date the batch was closed, if it has been
    pub date_closed: Option<NaiveDate>,
    /// When the record was created
    pub created_at: NaiveDateTime,
    /// When the record was last updated
    pub updated_at: NaiveDateTime,
}

impl Batch {
    /// Create a new open batch with no contributions
    pub fn new(
        id: String,
        name: String,
        date_created: NaiveDate,
        currency: String,
        counted_total: BigDecimal,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            name,
            date_created,
            currency,
            status: BatchStatus::Open,
            counted_total,
            entered_by: None,
            date_closed: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Mark the batch closed. Callers are responsible for the reconciliation gate.
    pub(crate) fn mark_closed(&mut self, closed_on: NaiveDate) {
        self.status = BatchStatus::Closed;
        self.date_closed = Some(closed_on);
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}

/// Who gave a contribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Donor {
    /// A member on record
    Member { id: String, name: String },
    /// A named giver who is not (yet) in the directory
    Named(String),
    /// Loose offering or a giver who asked not to be recorded
    Anonymous,
}

impl Donor {
    /// Name shown on batch screens and reports
    pub fn display_name(&self) -> &str {
        match self {
            Donor::Member { name, .. } => name,
            Donor::Named(name) => name,
            Donor::Anonymous => "Anonymous Giver",
        }
    }

    pub fn member_id(&self) -> Option<&str> {
        match self {
            Donor::Member { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Donor::Anonymous)
    }
}

/// How a contribution was paid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Check,
    /// Credit or debit card through a point-of-sale terminal
    Card,
    Swipe,
    /// Mobile money transfer (Ecocash and similar)
    MobileMoney,
    Online,
    Other(String),
}

impl PaymentMethod {
    /// Parse a method label leniently; unknown labels become `Other`
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "cash" => PaymentMethod::Cash,
            "check" | "cheque" => PaymentMethod::Check,
            "card" | "pos" | "credit/debit (pos)" | "credit/debit" => PaymentMethod::Card,
            "swipe" => PaymentMethod::Swipe,
            "ecocash" | "mobile money" | "mobilemoney" => PaymentMethod::MobileMoney,
            "online" => PaymentMethod::Online,
            _ => PaymentMethod::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::Check => write!(f, "Check"),
            PaymentMethod::Card => write!(f, "Credit/Debit (POS)"),
            PaymentMethod::Swipe => write!(f, "Swipe"),
            PaymentMethod::MobileMoney => write!(f, "Mobile Money"),
            PaymentMethod::Online => write!(f, "Online"),
            PaymentMethod::Other(label) => write!(f, "{}", label),
        }
    }
}

/// A single monetary gift recorded against a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Unique identifier for the line item
    pub id: String,
    /// Batch the contribution was entered into
    pub batch_id: String,
    /// Who gave it
    pub donor: Donor,
    /// Fund designation (e.g. "General Tithes", "Missions Fund")
    pub fund: String,
    /// Payment method
    pub method: PaymentMethod,
    /// Check number, only kept for check payments
    pub check_number: Option<String>,
    /// Amount given; never negative
    pub amount: BigDecimal,
    /// Date the gift was received
    pub date: NaiveDate,
    /// Card terminal or online processor reference
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Membership standing of a person in the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MembershipStatus {
    #[default]
    Visitor,
    Regular,
    Member,
    Inactive,
}

/// A person in the church directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub preferred_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub membership_status: MembershipStatus,
    pub join_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl Member {
    /// Name used in lists, preferring the preferred first name when set
    pub fn full_name(&self) -> String {
        let first = self.preferred_name.as_deref().unwrap_or(&self.first_name);
        format!("{} {}", first, self.last_name)
    }
}

/// Whether anyone may join a group or joining requires approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GroupMembership {
    #[default]
    Open,
    ApprovalRequired,
    Closed,
}

/// A small group, ministry team, or class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub group_type: String,
    pub description: Option<String>,
    pub leader_names: Option<String>,
    pub meeting_day: Option<String>,
    pub meeting_time: Option<NaiveTime>,
    pub membership: GroupMembership,
    pub max_capacity: Option<u32>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    Cancelled,
}

/// Dates during which members may register for an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationWindow {
    pub opens: NaiveDate,
    pub closes: NaiveDate,
    pub capacity: Option<u32>,
}

impl RegistrationWindow {
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        self.opens <= date && date <= self.closes
    }
}

/// A scheduled church event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    /// `None` for all-day events
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub is_all_day: bool,
    pub location: Option<String>,
    /// `Some` when registration is enabled
    pub registration: Option<RegistrationWindow>,
    pub status: EventStatus,
    pub created_at: NaiveDateTime,
}

/// A portal sign-up for an event, possibly for several attendees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Number of seats taken by this registration
    pub attendees: u32,
    pub notes: Option<String>,
    pub registered_on: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Head count for one occurrence of a service or event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Recurring service (e.g. "srv001") or event ID
    pub service_id: String,
    pub service_name: String,
    pub date: NaiveDate,
    /// Everyone present, including people not in the directory
    pub total: u32,
    /// Directory members checked in
    pub attendee_ids: Vec<String>,
}

/// Errors that can occur in the church management core
#[derive(Debug, thiserror::Error)]
pub enum ChurchError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Batch not found: {0}")]
    BatchNotFound(String),
    #[error("Contribution not found: {0}")]
    ContributionNotFound(String),
    #[error("Member not found: {0}")]
    MemberNotFound(String),
    #[error("Group not found: {0}")]
    GroupNotFound(String),
    #[error("Event not found: {0}")]
    EventNotFound(String),
    #[error("Batch {0} is closed and can no longer be changed")]
    BatchClosed(String),
    #[error("Cannot close batch. The entered total must match the counted total. (batch {batch_id}, difference {difference})")]
    NotReconciled { batch_id: String, difference: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for church core operations
pub type ChurchResult<T> = Result<T, ChurchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_parse() {
        assert_eq!(PaymentMethod::parse("Cash"), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::parse(" cheque "), PaymentMethod::Check);
        assert_eq!(
            PaymentMethod::parse("Credit/Debit (POS)"),
            PaymentMethod::Card
        );
        assert_eq!(PaymentMethod::parse("Ecocash"), PaymentMethod::MobileMoney);
        assert_eq!(
            PaymentMethod::parse("Online PayPal"),
            PaymentMethod::Other("Online PayPal".to_string())
        );
        assert_eq!(PaymentMethod::Card.to_string(), "Credit/Debit (POS)");
    }

    #[test]
    fn test_donor_display() {
        let member = Donor::Member {
            id: "m002".to_string(),
            name: "Jane Doe".to_string(),
        };
        assert_eq!(member.display_name(), "Jane Doe");
        assert_eq!(member.member_id(), Some("m002"));
        assert_eq!(Donor::Anonymous.display_name(), "Anonymous Giver");
        assert!(Donor::Anonymous.member_id().is_none());
    }

    #[test]
    fn test_new_batch_is_open() {
        let mut batch = Batch::new(
            "B100".to_string(),
            "Midweek Service".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
            "USD".to_string(),
            BigDecimal::from(0),
        );
        assert!(batch.is_open());
        assert!(batch.date_closed.is_none());

        batch.mark_closed(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(batch.status, BatchStatus::Closed);
        assert_eq!(batch.status.to_string(), "Closed");
        assert_eq!(
            batch.date_closed,
            Some(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap())
        );
    }

    #[test]
    fn test_member_full_name_prefers_preferred_name() {
        let mut member = Member {
            id: "m010".to_string(),
            first_name: "Robert".to_string(),
            last_name: "Moyo".to_string(),
            preferred_name: None,
            email: None,
            phone: None,
            membership_status: MembershipStatus::default(),
            join_date: None,
            created_at: chrono::Utc::now().naive_utc(),
        };
        assert_eq!(member.full_name(), "Robert Moyo");
        member.preferred_name = Some("Bob".to_string());
        assert_eq!(member.full_name(), "Bob Moyo");
    }
}
