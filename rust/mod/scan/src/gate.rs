//! Per-line gate state machine.
//!
//! One `LineGate` guards one task-line edit. Selecting a different
//! line means building a fresh gate via [`LineGate::seed`], so the
//! override grant never survives a selection change.

use tracing::warn;

use crate::compare::{ScanOutcome, compare};
use crate::error::GateError;

/// Where the gate currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// Nothing observed yet.
    Idle,
    /// At least one observation recorded.
    Compared,
    /// A submit was rejected on mismatch; override flow is open.
    Blocked,
    /// Override granted; gate is bypassed for this line.
    Overridden,
}

#[derive(Debug, Clone)]
struct GateField {
    name: String,
    expected: Option<String>,
    observed: String,
}

/// Gate over the scanned fields of one line.
#[derive(Debug, Clone)]
pub struct LineGate {
    phase: GatePhase,
    granted: bool,
    fields: Vec<GateField>,
}

impl LineGate {
    /// Empty gate with no fields; everything passes.
    pub fn new() -> Self {
        Self {
            phase: GatePhase::Idle,
            granted: false,
            fields: Vec::new(),
        }
    }

    /// Fresh gate for a newly selected line.
    ///
    /// Observed values start out equal to the expected ones (the UI
    /// prefills scan inputs from the system record), the grant is off.
    pub fn seed<I, N, E>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, Option<E>)>,
        N: Into<String>,
        E: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(name, expected)| {
                let expected = expected.map(Into::into);
                let observed = expected.clone().unwrap_or_default();
                GateField {
                    name: name.into(),
                    expected,
                    observed,
                }
            })
            .collect();
        Self {
            phase: GatePhase::Idle,
            granted: false,
            fields,
        }
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn granted(&self) -> bool {
        self.granted
    }

    /// Record a scan/edit of one field. Unknown names are ignored.
    pub fn observe(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.observed = value.into();
            if self.phase == GatePhase::Idle {
                self.phase = GatePhase::Compared;
            }
        }
    }

    /// Current observed value of a field.
    pub fn observed(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.observed.as_str())
    }

    /// Expected value of a field, if the line carries one.
    pub fn expected(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.expected.as_deref())
    }

    /// Comparison outcome for one field.
    pub fn outcome(&self, name: &str) -> ScanOutcome {
        match self.fields.iter().find(|f| f.name == name) {
            Some(f) => compare(&f.observed, f.expected.as_deref()),
            None => ScanOutcome::NoExpectation,
        }
    }

    /// Decide whether a submit may proceed.
    ///
    /// A granted override bypasses the check for the rest of this
    /// line's lifetime. Otherwise the first mismatching field blocks
    /// the submit and moves the gate to `Blocked`; the caller must not
    /// issue the guarded network call.
    pub fn check_submit(&mut self) -> Result<(), GateError> {
        if self.granted {
            return Ok(());
        }
        for field in &self.fields {
            if compare(&field.observed, field.expected.as_deref()) == ScanOutcome::Mismatch {
                self.phase = GatePhase::Blocked;
                warn!(field = %field.name, "scan mismatch, submit blocked");
                return Err(GateError::ScanMismatch {
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Apply a successful supervisor override.
    ///
    /// Sets the grant and corrects every observed value back to its
    /// expected one, so the record commits with the system identifiers
    /// even though the physical scan differed.
    pub fn grant_override(&mut self) {
        self.granted = true;
        self.phase = GatePhase::Overridden;
        for field in &mut self.fields {
            if let Some(expected) = &field.expected {
                field.observed = expected.clone();
            }
        }
    }
}

impl Default for LineGate {
    fn default() -> Self {
        Self::new()
    }
}
