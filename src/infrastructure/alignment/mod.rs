mod ctc_alignment_engine;
pub mod forced_aligner;
mod wav2vec2_onnx_model;

pub use ctc_alignment_engine::CtcAlignmentEngine;
pub use wav2vec2_onnx_model::Wav2Vec2OnnxModel;
