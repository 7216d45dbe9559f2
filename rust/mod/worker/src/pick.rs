//! Pick screen: work through a picking task line by line.
//!
//! Selecting a line seeds the gate with the line's product and source
//! location; observed values start prefilled with the expected ones, so
//! an untouched form submits clean. Submitting re-checks the gate first
//! and only then talks to the backend.

use wlms_client::api::picking::{self, PickLine, PickScan, PickTask};
use wlms_client::ApiClient;
use wlms_scan::{LineGate, OverrideAttempts, OverridePolicy};

use crate::error::WorkerError;
use crate::{supervisor, FIELD_FROM_LOCATION, FIELD_PRODUCT};

pub struct PickScreen {
    tasks: Vec<PickTask>,
    task_id: Option<String>,
    lines: Vec<PickLine>,
    line_id: Option<i64>,
    gate: LineGate,
    attempts: OverrideAttempts,
    qty: i64,
    to_location_id: String,
    busy: bool,
    error: Option<String>,
}

impl PickScreen {
    pub fn new(policy: OverridePolicy) -> Self {
        Self {
            tasks: Vec::new(),
            task_id: None,
            lines: Vec::new(),
            line_id: None,
            gate: LineGate::new(),
            attempts: OverrideAttempts::new(policy),
            qty: 1,
            to_location_id: String::new(),
            busy: false,
            error: None,
        }
    }

    pub fn tasks(&self) -> &[PickTask] {
        &self.tasks
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn lines(&self) -> &[PickLine] {
        &self.lines
    }

    pub fn selected_line(&self) -> Option<&PickLine> {
        self.line_id
            .and_then(|id| self.lines.iter().find(|l| l.id == id))
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

    /// Fetches the task list.
    pub async fn load_tasks(&mut self, api: &ApiClient) -> Result<(), WorkerError> {
        self.busy = true;
        self.error = None;
        let result = picking::tasks(api).await;
        self.busy = false;
        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Marks a task as started and refreshes the list.
    pub async fn start_task(&mut self, api: &ApiClient, task_id: &str) -> Result<(), WorkerError> {
        self.busy = true;
        self.error = None;
        let result = picking::start_task(api, task_id).await;
        self.busy = false;
        if let Err(err) = result {
            return Err(self.fail(err));
        }
        self.load_tasks(api).await
    }

    /// Loads the task's lines and selects the first one.
    pub async fn select_task(&mut self, api: &ApiClient, task_id: &str) -> Result<(), WorkerError> {
        self.busy = true;
        self.error = None;
        let outcome = self.reload_lines(api, task_id).await;
        self.busy = false;
        if outcome.is_ok() {
            self.task_id = Some(task_id.to_string());
        }
        outcome
    }

    /// Changes the current line. Resets quantity to 1 and reseeds the
    /// gate, which discards any override grant.
    pub fn select_line(&mut self, line_id: Option<i64>) {
        self.line_id = line_id;
        self.qty = 1;
        self.reseed_gate();
    }

    /// Records a scanned value for one gate field.
    pub fn observe(&mut self, field: &str, value: impl Into<String>) {
        self.gate.observe(field, value);
    }

    pub fn set_qty(&mut self, qty: i64) {
        self.qty = qty;
    }

    /// Sets the packing staging location the goods go to. Free-form; the
    /// gate has no expectation for it.
    pub fn set_destination(&mut self, location_id: impl Into<String>) {
        self.to_location_id = location_id.into();
    }

    /// Submits the current line as picked.
    ///
    /// The gate is checked before anything goes on the wire; a mismatch
    /// without a grant blocks the screen and never reaches the backend.
    /// The movement carries the line's expected identifiers, not the
    /// scanned text.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<(), WorkerError> {
        self.error = None;
        let Some(task_id) = self.task_id.clone() else {
            return Err(self.fail(WorkerError::NoTaskSelected));
        };
        let movement = self.selected_line().map(|line| PickScan {
            product_id: line.product_id.clone(),
            batch_id: line.batch_id.clone(),
            qty: self.qty,
            from_location_id: line.from_location_id.clone(),
            to_location_id: self.to_location_id.clone(),
        });
        let Some(movement) = movement else {
            return Err(self.fail(WorkerError::NoLineSelected));
        };
        if let Err(err) = self.gate.check_submit() {
            return Err(self.fail(err));
        }

        self.busy = true;
        let result = picking::scan(api, &task_id, &movement).await;
        self.busy = false;
        match result {
            Ok(_) => self.reload_lines(api, &task_id).await,
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

    /// Completes the task and refreshes the task list.
    pub async fn complete_task(&mut self, api: &ApiClient) -> Result<(), WorkerError> {
        let Some(task_id) = self.task_id.clone() else {
            return Err(self.fail(WorkerError::NoTaskSelected));
        };
        self.busy = true;
        self.error = None;
        let result = picking::complete_task(api, &task_id).await;
        self.busy = false;
        match result {
            Ok(_) => self.load_tasks(api).await,
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn reload_lines(&mut self, api: &ApiClient, task_id: &str) -> Result<(), WorkerError> {
        match picking::task_lines(api, task_id).await {
            Ok(lines) => {
                self.lines = lines;
                let first = self.lines.first().map(|l| l.id);
                self.select_line(first);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn reseed_gate(&mut self) {
        let seed = self
            .selected_line()
            .map(|line| (line.product_id.clone(), line.from_location_id.clone()));
        self.gate = match seed {
            Some((product, from)) => LineGate::seed([
                (FIELD_PRODUCT, Some(product)),
                (FIELD_FROM_LOCATION, Some(from)),
            ]),
            None => LineGate::new(),
        };
    }

    fn fail(&mut self, err: impl Into<WorkerError>) -> WorkerError {
        let err = err.into();
        self.error = Some(err.to_string());
        err
    }
}

impl Default for PickScreen {
    fn default() -> Self {
        Self::new(OverridePolicy::default())
    }
}
