mod aligned_transcript;
mod ctc;
mod language_code;
mod pipeline_stage;
mod sample_buffer;
mod scratch_file;
mod segment;
mod uploaded_audio;

pub use aligned_transcript::{AlignedSegment, AlignedTranscript, TranscriptInvariantError, Word};
pub use ctc::{CtcVocabulary, Emissions};
pub use language_code::LanguageCode;
pub use pipeline_stage::PipelineStage;
pub use sample_buffer::{SampleBuffer, TARGET_SAMPLE_RATE};
pub use scratch_file::ScratchFile;
pub use segment::{AsrResult, Segment};
pub use uploaded_audio::UploadedAudio;
