use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    Running,
    Executed,
    Failed,
    Compensated,
    CompensationFailed,
}

#[derive(Debug)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    pub started_at: Instant,
    /// Set when the step finished executing, and again when it was compensated.
    pub completed_at: Option<Instant>,
    pub compensation_description: Option<String>,
    /// Rendered error of a failed execution or a failed undo.
    pub error: Option<String>,
}

/// Chronological record of one saga run, kept for operators diagnosing a rollback.
#[derive(Debug, Default)]
pub struct SagaAuditLog {
    records: Vec<StepRecord>,
}

impl SagaAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_start(&mut self, name: &str) -> usize {
        self.records.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::Running,
            started_at: Instant::now(),
            completed_at: None,
            compensation_description: None,
            error: None,
        });
        self.records.len() - 1
    }

    pub(crate) fn record_success(&mut self, index: usize, compensation_description: String) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = StepStatus::Executed;
            record.completed_at = Some(Instant::now());
            record.compensation_description = Some(compensation_description);
        }
    }

    pub(crate) fn record_failure(&mut self, index: usize, error: String) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = StepStatus::Failed;
            record.completed_at = Some(Instant::now());
            record.error = Some(error);
        }
    }

    pub(crate) fn record_compensated(&mut self, index: usize) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = StepStatus::Compensated;
            record.completed_at = Some(Instant::now());
        }
    }

    pub(crate) fn record_compensation_failed(&mut self, index: usize, error: String) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = StepStatus::CompensationFailed;
            record.completed_at = Some(Instant::now());
            record.error = Some(error);
        }
    }

    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Records whose undo failed; each one is state left behind in the store.
    pub fn unresolved(&self) -> impl Iterator<Item = &StepRecord> {
        self.records
            .iter()
            .filter(|r| r.status == StepStatus::CompensationFailed)
    }

    /// One line per step, e.g. `compensated insert_option_group`.
    #[must_use]
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(|record| {
                let status = match record.status {
                    StepStatus::Running => "running",
                    StepStatus::Executed => "executed",
                    StepStatus::Failed => "failed",
                    StepStatus::Compensated => "compensated",
                    StepStatus::CompensationFailed => "compensation failed",
                };
                match &record.error {
                    Some(error) => format!("{status} {}: {error}", record.name),
                    None => format!("{status} {}", record.name),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
