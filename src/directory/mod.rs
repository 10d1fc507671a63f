//! Member, group and event directory

pub mod attendance;
pub mod forms;

pub use attendance::*;
pub use forms::*;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

fn new_id(prefix: char) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}

/// Directory manager for members, groups and events
pub struct Directory<S: DirectoryStorage> {
    storage: S,
}

impl<S: DirectoryStorage> Directory<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    // Member operations
    /// Add a member to the directory
    pub async fn create_member(&mut self, new_member: NewMember) -> ChurchResult<Member> {
        new_member.validate()?;

        let member = Member {
            id: new_id('m'),
            first_name: new_member.first_name.trim().to_string(),
            last_name: new_member.last_name.trim().to_string(),
            preferred_name: new_member.preferred_name.filter(|n| !n.trim().is_empty()),
            email: new_member.email.filter(|e| !e.trim().is_empty()),
            phone: new_member.phone.filter(|p| !p.trim().is_empty()),
            membership_status: new_member.membership_status,
            join_date: new_member.join_date,
            created_at: chrono::Utc::now().naive_utc(),
        };

        self.storage.save_member(&member).await?;
        info!(member_id = %member.id, "added member");

        Ok(member)
    }

    pub async fn get_member(&self, member_id: &str) -> ChurchResult<Option<Member>> {
        self.storage.get_member(member_id).await
    }

    /// Get a member by ID, returning an error if not found
    pub async fn get_member_required(&self, member_id: &str) -> ChurchResult<Member> {
        self.storage
            .get_member(member_id)
            .await?
            .ok_or_else(|| ChurchError::MemberNotFound(member_id.to_string()))
    }

    /// List members sorted by last name, then first name
    pub async fn list_members(&self) -> ChurchResult<Vec<Member>> {
        let mut members = self.storage.list_members().await?;
        members.sort_by(|a, b| {
            a.last_name
                .to_lowercase()
                .cmp(&b.last_name.to_lowercase())
                .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
        });
        Ok(members)
    }

    /// Case-insensitive search on name and email; an empty term lists everyone
    pub async fn search_members(&self, term: &str) -> ChurchResult<Vec<Member>> {
        let term = term.trim().to_lowercase();
        let members = self.list_members().await?;
        if term.is_empty() {
            return Ok(members);
        }

        Ok(members
            .into_iter()
            .filter(|m| {
                m.full_name().to_lowercase().contains(&term)
                    || format!("{} {}", m.first_name, m.last_name)
                        .to_lowercase()
                        .contains(&term)
                    || m
                        .email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&term))
            })
            .collect())
    }

    // Group operations
    pub async fn create_group(&mut self, new_group: NewGroup) -> ChurchResult<Group> {
        new_group.validate()?;

        let group = Group {
            id: new_id('g'),
            name: new_group.name.trim().to_string(),
            group_type: new_group.group_type.trim().to_string(),
            description: new_group.description,
            leader_names: new_group.leader_names,
            meeting_day: new_group.meeting_day,
            meeting_time: new_group.meeting_time,
            membership: new_group.membership,
            max_capacity: new_group.max_capacity,
            is_active: new_group.is_active,
            created_at: chrono::Utc::now().naive_utc(),
        };

        self.storage.save_group(&group).await?;
        info!(group_id = %group.id, name = %group.name, "added group");

        Ok(group)
    }

    pub async fn get_group_required(&self, group_id: &str) -> ChurchResult<Group> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| ChurchError::GroupNotFound(group_id.to_string()))
    }

    pub async fn list_groups(&self) -> ChurchResult<Vec<Group>> {
        let mut groups = self.storage.list_groups().await?;
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    // Event operations
    pub async fn create_event(&mut self, new_event: NewEvent) -> ChurchResult<Event> {
        let registration = new_event.validate()?;
        let start_date = new_event.start_date.ok_or_else(|| {
            ChurchError::Validation("Start Date and Start Time are required.".to_string())
        })?;

        let event = Event {
            id: new_id('e'),
            name: new_event.name.trim().to_string(),
            category: new_event.category.trim().to_string(),
            description: new_event.description,
            start_date,
            start_time: if new_event.is_all_day {
                None
            } else {
                new_event.start_time
            },
            end_date: new_event.end_date,
            end_time: if new_event.is_all_day {
                None
            } else {
                new_event.end_time
            },
            is_all_day: new_event.is_all_day,
            location: new_event.location,
            registration,
            status: new_event.status,
            created_at: chrono::Utc::now().naive_utc(),
        };

        self.storage.save_event(&event).await?;
        info!(event_id = %event.id, name = %event.name, "added event");

        Ok(event)
    }

    pub async fn get_event_required(&self, event_id: &str) -> ChurchResult<Event> {
        self.storage
            .get_event(event_id)
            .await?
            .ok_or_else(|| ChurchError::EventNotFound(event_id.to_string()))
    }

    /// List events in start order
    pub async fn list_events(&self) -> ChurchResult<Vec<Event>> {
        let mut events = self.storage.list_events().await?;
        events.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.start_time.cmp(&b.start_time))
        });
        Ok(events)
    }

    /// Seats still available, or `None` when the event has no capacity limit
    pub async fn remaining_capacity(&self, event_id: &str) -> ChurchResult<Option<u32>> {
        let event = self.get_event_required(event_id).await?;
        let Some(capacity) = event.registration.as_ref().and_then(|w| w.capacity) else {
            return Ok(None);
        };
        let taken = self.registered_attendees(event_id).await?;
        Ok(Some(capacity.saturating_sub(taken)))
    }

    /// Total attendees across an event's registrations
    pub async fn registered_attendees(&self, event_id: &str) -> ChurchResult<u32> {
        Ok(self
            .storage
            .list_event_registrations(event_id)
            .await?
            .iter()
            .map(|r| r.attendees)
            .sum())
    }

    /// Sign up for an event from the member portal
    pub async fn register_for_event(
        &mut self,
        event_id: &str,
        registration: NewRegistration,
    ) -> ChurchResult<EventRegistration> {
        let event = self.get_event_required(event_id).await?;
        registration.validate()?;

        let window = match (&event.registration, event.status) {
            (_, EventStatus::Cancelled) => {
                return Err(ChurchError::Validation(format!(
                    "Event '{}' has been cancelled.",
                    event.name
                )))
            }
            (Some(window), _) => window,
            (None, _) => {
                return Err(ChurchError::Validation(format!(
                    "Registration is not enabled for '{}'.",
                    event.name
                )))
            }
        };
        if !window.is_open_on(registration.registered_on) {
            return Err(ChurchError::Validation(format!(
                "Registration for '{}' is open from {} to {}.",
                event.name, window.opens, window.closes
            )));
        }

        if let Some(remaining) = self.remaining_capacity(event_id).await? {
            if registration.attendees > remaining {
                return Err(ChurchError::Validation(format!(
                    "Cannot register {} attendees. Only {} spot(s) remaining.",
                    registration.attendees, remaining
                )));
            }
        }

        let record = EventRegistration {
            id: new_id('r'),
            event_id: event.id.clone(),
            name: registration.name.trim().to_string(),
            email: registration.email.trim().to_string(),
            phone: registration.phone.filter(|p| !p.trim().is_empty()),
            attendees: registration.attendees,
            notes: registration.notes.filter(|n| !n.trim().is_empty()),
            registered_on: registration.registered_on,
            created_at: chrono::Utc::now().naive_utc(),
        };

        self.storage.save_registration(&record).await?;
        info!(
            event_id = %record.event_id,
            attendees = record.attendees,
            "registered for event"
        );

        Ok(record)
    }

    pub async fn event_registrations(&self, event_id: &str) -> ChurchResult<Vec<EventRegistration>> {
        self.get_event_required(event_id).await?;
        self.storage.list_event_registrations(event_id).await
    }

    /// Record the head count for a service or event occurrence
    pub async fn record_attendance(&mut self, record: AttendanceRecord) -> ChurchResult<()> {
        if record.service_id.trim().is_empty() {
            return Err(ChurchError::Validation(
                "Please select a service or event.".to_string(),
            ));
        }
        if (record.attendee_ids.len() as u64) > u64::from(record.total) {
            return Err(ChurchError::Validation(format!(
                "Total attendance ({}) is less than the {} members checked in",
                record.total,
                record.attendee_ids.len()
            )));
        }

        self.storage.save_attendance(&record).await?;
        debug!(service_id = %record.service_id, date = %record.date, total = record.total, "recorded attendance");
        Ok(())
    }

    /// Attendance report for one service over an inclusive, optionally open range
    pub async fn attendance_report(
        &self,
        service_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ChurchResult<AttendanceReport> {
        let records = if service_id.trim().is_empty() {
            Vec::new()
        } else {
            self.storage.list_attendance(service_id).await?
        };
        AttendanceReport::build(service_id, &records, start_date, end_date)
    }
}
