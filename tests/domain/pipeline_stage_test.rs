use wordstamp::domain::PipelineStage;

#[test]
fn given_happy_path_when_checking_transitions_then_each_step_is_allowed() {
    let path = [
        PipelineStage::Idle,
        PipelineStage::FileReceived,
        PipelineStage::AudioDecoded,
        PipelineStage::Transcribed,
        PipelineStage::LanguageResolved,
        PipelineStage::Aligned,
        PipelineStage::Completed,
        PipelineStage::Cleanup,
        PipelineStage::Terminal,
    ];

    for pair in path.windows(2) {
        assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
    }
}

#[test]
fn given_active_stage_when_failing_then_transition_is_allowed() {
    assert!(PipelineStage::Transcribed.can_transition_to(PipelineStage::Failed));
    assert!(PipelineStage::Failed.can_transition_to(PipelineStage::Cleanup));
}

#[test]
fn given_finished_stage_when_failing_then_transition_is_rejected() {
    assert!(!PipelineStage::Completed.can_transition_to(PipelineStage::Failed));
    assert!(!PipelineStage::Terminal.can_transition_to(PipelineStage::Failed));
}

#[test]
fn given_skipped_stage_when_checking_then_transition_is_rejected() {
    assert!(!PipelineStage::FileReceived.can_transition_to(PipelineStage::Aligned));
    assert!(!PipelineStage::Cleanup.can_transition_to(PipelineStage::Idle));
}

#[test]
fn given_stage_when_displayed_then_uses_screaming_case() {
    assert_eq!(PipelineStage::LanguageResolved.to_string(), "LANGUAGE_RESOLVED");
}
