use crate::domain::PipelineStage;

/// Records the stages one request passes through and logs every transition.
#[derive(Debug, Clone)]
pub struct StageTracker {
    current: PipelineStage,
    history: Vec<PipelineStage>,
}

impl StageTracker {
    pub fn new() -> Self {
        Self {
            current: PipelineStage::Idle,
            history: vec![PipelineStage::Idle],
        }
    }

    pub fn current(&self) -> PipelineStage {
        self.current
    }

    pub fn history(&self) -> &[PipelineStage] {
        &self.history
    }

    pub fn advance(&mut self, next: PipelineStage) {
        if !self.current.can_transition_to(next) {
            tracing::warn!(
                from = %self.current,
                to = %next,
                "Unexpected pipeline stage transition"
            );
        }
        tracing::debug!(from = %self.current, stage = %next, "Pipeline stage transition");
        self.current = next;
        self.history.push(next);
    }

    /// Moves to `Failed` unless the request already reached a terminal outcome.
    pub fn fail(&mut self) {
        if self.current.is_active() {
            self.advance(PipelineStage::Failed);
        }
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}
