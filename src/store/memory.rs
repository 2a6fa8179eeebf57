//! In-memory store used by unit and router tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{FacilityStore, KeyfobStore, ScanLogStore, Store};
use crate::models::{
    facility::{Facility, FacilityUpdate},
    keyfob::Keyfob,
    scan::{NewScanLog, ScanLog},
};

#[derive(Debug, Clone)]
struct KeyfobRow {
    keyfob_key: i64,
    attached_user_id: Option<i64>,
    disabled: bool,
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub first_name: String,
    pub last_name: Option<String>,
    pub affix: Option<String>,
    pub role: String,
}

#[derive(Default)]
struct State {
    users: BTreeMap<i64, UserRow>,
    keyfobs: BTreeMap<i64, KeyfobRow>,
    facilities: BTreeMap<i64, Facility>,
    logs: Vec<ScanLog>,
    next_keyfob_id: i64,
    next_facility_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    fail_log_writes: AtomicBool,
}

fn write_failure() -> sqlx::Error {
    sqlx::Error::Protocol("simulated write failure".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent log insert fail as if the database were down.
    pub fn fail_log_writes(&self, fail: bool) {
        self.fail_log_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn insert_user(&self, id: i64, user: UserRow) {
        self.state.write().await.users.insert(id, user);
    }

    /// Look up a keyfob regardless of its disabled flag.
    pub async fn keyfob(&self, keyfob_id: i64) -> Option<Keyfob> {
        let state = self.state.read().await;
        state
            .keyfobs
            .get(&keyfob_id)
            .map(|row| Self::joined(&state, keyfob_id, row))
    }

    /// Insert a keyfob with a caller-chosen id.
    pub async fn insert_keyfob_with_id(&self, keyfob_id: i64, keyfob_key: i64) {
        let mut state = self.state.write().await;
        state.keyfobs.insert(
            keyfob_id,
            KeyfobRow {
                keyfob_key,
                attached_user_id: None,
                disabled: false,
            },
        );
        state.next_keyfob_id = state.next_keyfob_id.max(keyfob_id);
    }

    pub async fn log_count(&self) -> usize {
        self.state.read().await.logs.len()
    }

    fn joined(state: &State, keyfob_id: i64, row: &KeyfobRow) -> Keyfob {
        let user = row
            .attached_user_id
            .and_then(|user_id| state.users.get(&user_id));

        Keyfob {
            keyfob_id,
            keyfob_key: row.keyfob_key,
            attached_user_id: row.attached_user_id,
            disabled: row.disabled,
            first_name: user.map(|u| u.first_name.clone()),
            last_name: user.and_then(|u| u.last_name.clone()),
            affix: user.and_then(|u| u.affix.clone()),
            role: user.map(|u| u.role.clone()),
        }
    }

    fn push_log(state: &mut State, log: &NewScanLog) -> i64 {
        let id = state.logs.len() as i64 + 1;
        state.logs.push(ScanLog {
            id,
            keyfob_id: log.keyfob_id,
            facility_id: log.facility_id,
            timestamp: log.timestamp,
            in_out: log.in_out,
            allowed: log.allowed,
        });
        id
    }
}

#[async_trait]
impl KeyfobStore for MemoryStore {
    async fn insert_keyfob(&self, keyfob_key: i64) -> Result<i64, sqlx::Error> {
        let mut state = self.state.write().await;
        state.next_keyfob_id += 1;
        let keyfob_id = state.next_keyfob_id;
        state.keyfobs.insert(
            keyfob_id,
            KeyfobRow {
                keyfob_key,
                attached_user_id: None,
                disabled: false,
            },
        );
        Ok(keyfob_id)
    }

    async fn set_attached_user(
        &self,
        keyfob_id: i64,
        user_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let mut state = self.state.write().await;
        Ok(match state.keyfobs.get_mut(&keyfob_id) {
            Some(row) => {
                row.attached_user_id = user_id;
                true
            }
            None => false,
        })
    }

    async fn set_keyfob_key(&self, keyfob_id: i64, keyfob_key: i64) -> Result<bool, sqlx::Error> {
        let mut state = self.state.write().await;
        Ok(match state.keyfobs.get_mut(&keyfob_id) {
            Some(row) => {
                row.keyfob_key = keyfob_key;
                true
            }
            None => false,
        })
    }

    async fn disable_keyfob(&self, keyfob_id: i64) -> Result<bool, sqlx::Error> {
        let mut state = self.state.write().await;
        Ok(match state.keyfobs.get_mut(&keyfob_id) {
            Some(row) => {
                row.disabled = true;
                true
            }
            None => false,
        })
    }

    async fn list_active_keyfobs(&self) -> Result<Vec<Keyfob>, sqlx::Error> {
        let state = self.state.read().await;
        Ok(state
            .keyfobs
            .iter()
            .filter(|(_, row)| !row.disabled)
            .map(|(id, row)| Self::joined(&state, *id, row))
            .collect())
    }

    async fn is_access_allowed(&self, keyfob_id: i64) -> Result<bool, sqlx::Error> {
        let state = self.state.read().await;
        Ok(state
            .keyfobs
            .get(&keyfob_id)
            .is_some_and(|row| row.attached_user_id.is_some() && !row.disabled))
    }
}

#[async_trait]
impl FacilityStore for MemoryStore {
    async fn insert_facility(
        &self,
        facility_type: &str,
        capacity: i32,
    ) -> Result<i64, sqlx::Error> {
        let mut state = self.state.write().await;
        state.next_facility_id += 1;
        let facility_id = state.next_facility_id;
        state.facilities.insert(
            facility_id,
            Facility {
                facility_id,
                facility_type: facility_type.to_string(),
                capacity,
                active: true,
                broken: false,
            },
        );
        Ok(facility_id)
    }

    async fn list_facilities(&self, active_only: bool) -> Result<Vec<Facility>, sqlx::Error> {
        let state = self.state.read().await;
        Ok(state
            .facilities
            .values()
            .filter(|facility| !active_only || facility.active)
            .cloned()
            .collect())
    }

    async fn deactivate_facility(&self, facility_id: i64) -> Result<bool, sqlx::Error> {
        let mut state = self.state.write().await;
        Ok(match state.facilities.get_mut(&facility_id) {
            Some(facility) => {
                facility.active = false;
                true
            }
            None => false,
        })
    }

    async fn update_facility(
        &self,
        facility_id: i64,
        update: &FacilityUpdate,
    ) -> Result<bool, sqlx::Error> {
        let mut state = self.state.write().await;
        let Some(facility) = state.facilities.get_mut(&facility_id) else {
            return Ok(false);
        };

        if let Some(facility_type) = &update.facility_type {
            facility.facility_type = facility_type.clone();
        }
        if let Some(capacity) = update.capacity {
            facility.capacity = capacity;
        }
        if let Some(active) = update.active {
            facility.active = active;
        }
        if let Some(broken) = update.broken {
            facility.broken = broken;
        }
        Ok(true)
    }
}

#[async_trait]
impl ScanLogStore for MemoryStore {
    async fn append_log(&self, log: &NewScanLog) -> Result<i64, sqlx::Error> {
        if self.fail_log_writes.load(Ordering::SeqCst) {
            return Err(write_failure());
        }
        let mut state = self.state.write().await;
        Ok(Self::push_log(&mut state, log))
    }

    async fn append_logs(&self, logs: &[NewScanLog]) -> Result<u64, sqlx::Error> {
        if self.fail_log_writes.load(Ordering::SeqCst) {
            return Err(write_failure());
        }
        let mut state = self.state.write().await;
        for log in logs {
            Self::push_log(&mut state, log);
        }
        Ok(logs.len() as u64)
    }

    async fn list_logs(&self) -> Result<Vec<ScanLog>, sqlx::Error> {
        Ok(self.state.read().await.logs.clone())
    }

    async fn recent_logs(&self, limit: u32) -> Result<Vec<ScanLog>, sqlx::Error> {
        let state = self.state.read().await;
        let mut logs = state.logs.clone();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        logs.truncate(limit as usize);
        Ok(logs)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
