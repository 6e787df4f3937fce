use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Idle,
    FileReceived,
    AudioDecoded,
    Transcribed,
    LanguageResolved,
    Aligned,
    Completed,
    Failed,
    Cleanup,
    Terminal,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "IDLE",
            PipelineStage::FileReceived => "FILE_RECEIVED",
            PipelineStage::AudioDecoded => "AUDIO_DECODED",
            PipelineStage::Transcribed => "TRANSCRIBED",
            PipelineStage::LanguageResolved => "LANGUAGE_RESOLVED",
            PipelineStage::Aligned => "ALIGNED",
            PipelineStage::Completed => "COMPLETED",
            PipelineStage::Failed => "FAILED",
            PipelineStage::Cleanup => "CLEANUP",
            PipelineStage::Terminal => "TERMINAL",
        }
    }

    /// Whether processing can still fail from this stage.
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            PipelineStage::Completed
                | PipelineStage::Failed
                | PipelineStage::Cleanup
                | PipelineStage::Terminal
        )
    }

    pub fn can_transition_to(&self, next: PipelineStage) -> bool {
        use PipelineStage::*;

        if next == Failed {
            return self.is_active();
        }

        matches!(
            (self, next),
            (Idle, FileReceived)
                | (FileReceived, AudioDecoded)
                | (AudioDecoded, Transcribed)
                | (Transcribed, LanguageResolved)
                | (LanguageResolved, Aligned)
                | (Aligned, Completed)
                | (Completed, Cleanup)
                | (Failed, Cleanup)
                | (Cleanup, Terminal)
        )
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
