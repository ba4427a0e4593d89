use crate::error::{MissingPolicy, StoreError, StoreResult};
use crate::notify::{ChangeNotifier, Subscription};
use crate::schedule::{DAYS_OF_WEEK, ScheduleDay, WorkerSchedule, normalize_week};
use chrono::{Utc, Weekday};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Weekly availability records keyed by worker id.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    records: RwLock<HashMap<String, WorkerSchedule>>,
    notifier: ChangeNotifier,
    policy: MissingPolicy,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MissingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> MissingPolicy {
        self.policy
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }

    pub fn days_of_week() -> [Weekday; 7] {
        DAYS_OF_WEEK
    }

    /// Current record for `worker_id`. Reading never creates a record.
    pub fn worker_schedule(&self, worker_id: &str) -> Option<WorkerSchedule> {
        self.records.read().get(worker_id).cloned()
    }

    /// Every record, ordered by worker id.
    pub fn schedules(&self) -> Vec<WorkerSchedule> {
        let mut all: Vec<WorkerSchedule> = self.records.read().values().cloned().collect();
        all.sort_by(|a, b| a.worker_id().cmp(b.worker_id()));
        all
    }

    /// Create an all-days-off record for a newly registered worker.
    ///
    /// Returns `false` when the worker already had a record, which is left
    /// untouched.
    pub fn register_worker(&self, worker_id: &str) -> bool {
        let created = {
            let mut records = self.records.write();
            if records.contains_key(worker_id) {
                false
            } else {
                records.insert(
                    worker_id.to_string(),
                    WorkerSchedule::empty(worker_id, Utc::now()),
                );
                true
            }
        };
        if created {
            debug!(worker_id, "schedule record created");
            self.notifier.notify();
        }
        created
    }

    /// Replace the worker's whole week and recompute `hours_picked`.
    ///
    /// Days missing from `days` become days off. Reported completed hours
    /// carry over from the previous record, or start at zero.
    pub fn update_schedule(
        &self,
        worker_id: &str,
        days: Vec<ScheduleDay>,
    ) -> StoreResult<WorkerSchedule> {
        let week = normalize_week(days)?;
        let updated = {
            let mut records = self.records.write();
            let hours_completed = records
                .get(worker_id)
                .map(WorkerSchedule::hours_completed)
                .unwrap_or(0.0);
            let record = WorkerSchedule::from_parts(
                worker_id.to_string(),
                week,
                hours_completed,
                Utc::now(),
            );
            records.insert(worker_id.to_string(), record.clone());
            record
        };
        debug!(
            worker_id,
            hours_picked = updated.hours_picked(),
            "schedule replaced"
        );
        self.notifier.notify();
        Ok(updated)
    }

    /// Record the hours a worker actually worked.
    ///
    /// Only existing records are updated; an unknown worker is answered per
    /// the store's [`MissingPolicy`] without creating anything.
    pub fn update_hours_completed(
        &self,
        worker_id: &str,
        hours: f64,
    ) -> StoreResult<Option<WorkerSchedule>> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(StoreError::Validation(format!(
                "completed hours must be a non-negative number (got {hours})"
            )));
        }
        let updated = self.records.write().get_mut(worker_id).map(|record| {
            record.set_hours_completed(hours);
            record.clone()
        });
        let Some(updated) = updated else {
            warn!(worker_id, "completed hours reported for unknown worker");
            return self
                .policy
                .apply(StoreError::WorkerNotFound(worker_id.to_string()));
        };
        debug!(worker_id, hours, "completed hours recorded");
        self.notifier.notify();
        Ok(Some(updated))
    }

    /// Replace every record, e.g. after loading from disk.
    pub fn restore(&self, schedules: Vec<WorkerSchedule>) {
        let records = schedules
            .into_iter()
            .map(|s| (s.worker_id().to_string(), s))
            .collect();
        *self.records.write() = records;
        self.notifier.notify();
    }
}
