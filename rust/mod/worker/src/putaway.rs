//! Putaway screen: move received stock out of the receiving area.
//!
//! Putaway tasks carry no id, so selection is by list index. The
//! destination input is prefilled from the slotting suggestion but the
//! worker may put the goods anywhere; the gate only guards product and
//! source location.

use wlms_client::api::putaway::{self, PutawayConfirm, PutawayTask};
use wlms_client::ApiClient;
use wlms_scan::{LineGate, OverrideAttempts, OverridePolicy};

use crate::error::WorkerError;
use crate::{supervisor, FIELD_FROM_LOCATION, FIELD_PRODUCT};

pub struct PutawayScreen {
    tasks: Vec<PutawayTask>,
    selected: Option<usize>,
    gate: LineGate,
    attempts: OverrideAttempts,
    qty: i64,
    to_location_id: String,
    busy: bool,
    error: Option<String>,
}

impl PutawayScreen {
    pub fn new(policy: OverridePolicy) -> Self {
        Self {
            tasks: Vec::new(),
            selected: None,
            gate: LineGate::new(),
            attempts: OverrideAttempts::new(policy),
            qty: 1,
            to_location_id: String::new(),
            busy: false,
            error: None,
        }
    }

    pub fn tasks(&self) -> &[PutawayTask] {
        &self.tasks
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_task(&self) -> Option<&PutawayTask> {
        self.selected.and_then(|i| self.tasks.get(i))
    }

    pub fn gate(&self) -> &LineGate {
        &self.gate
    }

    pub fn qty(&self) -> i64 {
        self.qty
    }

    pub fn destination(&self) -> &str {
        &self.to_location_id
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn override_failures(&self) -> u32 {
        self.attempts.failures()
    }

    /// Fetches the pending tasks and reselects.
    ///
    /// The previous index is kept when still in range, otherwise the
    /// first task is selected. Reselecting reseeds the gate either way.
    pub async fn load(&mut self, api: &ApiClient) -> Result<(), WorkerError> {
        self.busy = true;
        self.error = None;
        let result = putaway::tasks(api).await;
        self.busy = false;
        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                let index = match self.selected {
                    Some(i) if i < self.tasks.len() => Some(i),
                    _ if !self.tasks.is_empty() => Some(0),
                    _ => None,
                };
                self.select(index);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Changes the current task. Resets the quantity, reseeds the gate
    /// (discarding any override grant) and prefills the destination
    /// from the task's suggestion.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.tasks.len());
        self.qty = 1;
        let seed = self.selected_task().map(|task| {
            (
                task.product_id.clone(),
                task.from_location_id.clone(),
                task.suggested_to_location_id.clone().unwrap_or_default(),
            )
        });
        match seed {
            Some((product, from, destination)) => {
                self.gate = LineGate::seed([
                    (FIELD_PRODUCT, Some(product)),
                    (FIELD_FROM_LOCATION, Some(from)),
                ]);
                self.to_location_id = destination;
            }
            None => {
                self.gate = LineGate::new();
                self.to_location_id = String::new();
            }
        }
    }

    /// Records a scanned value for one gate field.
    pub fn observe(&mut self, field: &str, value: impl Into<String>) {
        self.gate.observe(field, value);
    }

    pub fn set_qty(&mut self, qty: i64) {
        self.qty = qty;
    }

    pub fn set_destination(&mut self, location_id: impl Into<String>) {
        self.to_location_id = location_id.into();
    }

    /// Confirms the putaway movement.
    ///
    /// The gate is checked first; only then is the destination required
    /// to be non-blank. A mismatch therefore surfaces as a scan error
    /// even when the destination is also missing.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<(), WorkerError> {
        self.error = None;
        let movement = self.selected_task().map(|task| PutawayConfirm {
            product_id: task.product_id.clone(),
            batch_id: task.batch_id.clone(),
            qty: self.qty,
            from_location_id: task.from_location_id.clone(),
            to_location_id: self.to_location_id.clone(),
        });
        let Some(movement) = movement else {
            return Err(self.fail(WorkerError::NoTaskSelected));
        };
        if let Err(err) = self.gate.check_submit() {
            return Err(self.fail(err));
        }
        if self.to_location_id.trim().is_empty() {
            return Err(self.fail(WorkerError::DestinationRequired));
        }

        self.busy = true;
        let result = putaway::confirm(api, &movement).await;
        self.busy = false;
        match result {
            Ok(_) => self.load(api).await,
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Runs the supervisor override dialog's confirm action.
    pub async fn request_override(
        &mut self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<(), WorkerError> {
        self.error = None;
        self.busy = true;
        let result =
            supervisor::verify(api, &mut self.attempts, &mut self.gate, email, password).await;
        self.busy = false;
        result.map_err(|err| self.fail(err))
    }

    fn fail(&mut self, err: impl Into<WorkerError>) -> WorkerError {
        let err = err.into();
        self.error = Some(err.to_string());
        err
    }
}

impl Default for PutawayScreen {
    fn default() -> Self {
        Self::new(OverridePolicy::default())
    }
}
