mod alignment_engine;
mod audio_decoder;
mod scratch_store;
mod transcription_engine;

pub use alignment_engine::{AlignmentEngine, AlignmentError, AlignmentModel};
pub use audio_decoder::{AudioDecoder, AudioDecoderError};
pub use scratch_store::{ScratchStore, ScratchStoreError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
