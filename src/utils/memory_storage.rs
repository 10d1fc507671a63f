//! In-memory storage implementation for testing

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
///
/// Clones share the same underlying data, so one instance can back both a
/// `BatchManager` and a `Directory`.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    batches: Arc<RwLock<BTreeMap<String, Batch>>>,
    // Kept in entry order; the newest entry is last
    contributions: Arc<RwLock<Vec<Contribution>>>,
    members: Arc<RwLock<BTreeMap<String, Member>>>,
    groups: Arc<RwLock<BTreeMap<String, Group>>>,
    events: Arc<RwLock<BTreeMap<String, Event>>>,
    registrations: Arc<RwLock<Vec<EventRegistration>>>,
    attendance: Arc<RwLock<Vec<AttendanceRecord>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            batches: Arc::new(RwLock::new(BTreeMap::new())),
            contributions: Arc::new(RwLock::new(Vec::new())),
            members: Arc::new(RwLock::new(BTreeMap::new())),
            groups: Arc::new(RwLock::new(BTreeMap::new())),
            events: Arc::new(RwLock::new(BTreeMap::new())),
            registrations: Arc::new(RwLock::new(Vec::new())),
            attendance: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.batches.write().unwrap().clear();
        self.contributions.write().unwrap().clear();
        self.members.write().unwrap().clear();
        self.groups.write().unwrap().clear();
        self.events.write().unwrap().clear();
        self.registrations.write().unwrap().clear();
        self.attendance.write().unwrap().clear();
    }

    /// Newest-first copy of the contributions matching `keep`
    fn collect_contributions<F>(&self, keep: F) -> Vec<Contribution>
    where
        F: Fn(&Contribution) -> bool,
    {
        self.contributions
            .read()
            .unwrap()
            .iter()
            .rev()
            .filter(|c| keep(*c))
            .cloned()
            .collect()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GivingStorage for MemoryStorage {
    async fn save_batch(&mut self, batch: &Batch) -> ChurchResult<()> {
        let mut batches = self.batches.write().unwrap();
        if batches.contains_key(&batch.id) {
            return Err(ChurchError::Storage(format!(
                "Batch '{}' already exists",
                batch.id
            )));
        }
        batches.insert(batch.id.clone(), batch.clone());
        Ok(())
    }

    async fn get_batch(&self, batch_id: &str) -> ChurchResult<Option<Batch>> {
        Ok(self.batches.read().unwrap().get(batch_id).cloned())
    }

    async fn list_batches(&self) -> ChurchResult<Vec<Batch>> {
        Ok(self.batches.read().unwrap().values().cloned().collect())
    }

    async fn update_batch(&mut self, batch: &Batch) -> ChurchResult<()> {
        let mut batches = self.batches.write().unwrap();
        match batches.get_mut(&batch.id) {
            Some(existing) => {
                *existing = batch.clone();
                Ok(())
            }
            None => Err(ChurchError::BatchNotFound(batch.id.clone())),
        }
    }

    async fn save_contribution(&mut self, contribution: &Contribution) -> ChurchResult<()> {
        let mut contributions = self.contributions.write().unwrap();
        if contributions.iter().any(|c| c.id == contribution.id) {
            return Err(ChurchError::Storage(format!(
                "Contribution '{}' already exists",
                contribution.id
            )));
        }
        contributions.push(contribution.clone());
        Ok(())
    }

    async fn get_contribution(
        &self,
        contribution_id: &str,
    ) -> ChurchResult<Option<Contribution>> {
        Ok(self
            .contributions
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == contribution_id)
            .cloned())
    }

    async fn delete_contribution(&mut self, contribution_id: &str) -> ChurchResult<()> {
        let mut contributions = self.contributions.write().unwrap();
        let before = contributions.len();
        contributions.retain(|c| c.id != contribution_id);
        if contributions.len() < before {
            Ok(())
        } else {
            Err(ChurchError::ContributionNotFound(
                contribution_id.to_string(),
            ))
        }
    }

    async fn list_batch_contributions(&self, batch_id: &str) -> ChurchResult<Vec<Contribution>> {
        Ok(self.collect_contributions(|c| c.batch_id == batch_id))
    }

    async fn list_contributions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ChurchResult<Vec<Contribution>> {
        Ok(self.collect_contributions(|c| {
            if let Some(start) = start_date {
                if c.date < start {
                    return false;
                }
            }
            if let Some(end) = end_date {
                if c.date > end {
                    return false;
                }
            }
            true
        }))
    }

    async fn list_member_contributions(&self, member_id: &str) -> ChurchResult<Vec<Contribution>> {
        Ok(self.collect_contributions(|c| c.donor.member_id() == Some(member_id)))
    }
}

#[async_trait]
impl DirectoryStorage for MemoryStorage {
    async fn save_member(&mut self, member: &Member) -> ChurchResult<()> {
        self.members
            .write()
            .unwrap()
            .insert(member.id.clone(), member.clone());
        Ok(())
    }

    async fn get_member(&self, member_id: &str) -> ChurchResult<Option<Member>> {
        Ok(self.members.read().unwrap().get(member_id).cloned())
    }

    async fn list_members(&self) -> ChurchResult<Vec<Member>> {
        Ok(self.members.read().unwrap().values().cloned().collect())
    }

    async fn save_group(&mut self, group: &Group) -> ChurchResult<()> {
        self.groups
            .write()
            .unwrap()
            .insert(group.id.clone(), group.clone());
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> ChurchResult<Option<Group>> {
        Ok(self.groups.read().unwrap().get(group_id).cloned())
    }

    async fn list_groups(&self) -> ChurchResult<Vec<Group>> {
        Ok(self.groups.read().unwrap().values().cloned().collect())
    }

    async fn save_event(&mut self, event: &Event) -> ChurchResult<()> {
        self.events
            .write()
            .unwrap()
            .insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn get_event(&self, event_id: &str) -> ChurchResult<Option<Event>> {
        Ok(self.events.read().unwrap().get(event_id).cloned())
    }

    async fn list_events(&self) -> ChurchResult<Vec<Event>> {
        Ok(self.events.read().unwrap().values().cloned().collect())
    }

    async fn save_registration(&mut self, registration: &EventRegistration) -> ChurchResult<()> {
        self.registrations.write().unwrap().push(registration.clone());
        Ok(())
    }

    async fn list_event_registrations(
        &self,
        event_id: &str,
    ) -> ChurchResult<Vec<EventRegistration>> {
        Ok(self
            .registrations
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn save_attendance(&mut self, record: &AttendanceRecord) -> ChurchResult<()> {
        let mut attendance = self.attendance.write().unwrap();
        // One record per service and date; a re-count replaces the old one
        attendance.retain(|a| !(a.service_id == record.service_id && a.date == record.date));
        attendance.push(record.clone());
        Ok(())
    }

    async fn list_attendance(&self, service_id: &str) -> ChurchResult<Vec<AttendanceRecord>> {
        Ok(self
            .attendance
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.service_id == service_id)
            .cloned()
            .collect())
    }
}
