use candle_core::{D, DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as m, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::{AsrResult, LanguageCode, SampleBuffer, Segment, TARGET_SAMPLE_RATE};
use crate::infrastructure::ModelLock;

use super::whisper_languages::WHISPER_LANGUAGES;

const MEL_FILTERS_REPO: &str = "FL33TW00D-HF/whisper-base";
const MAX_DECODE_TOKENS: usize = 224;
/// Seconds per timestamp token step.
const TIME_PRECISION: f64 = 0.02;

/// Local Whisper inference with candle. Inference on the single model instance is serialized.
pub struct CandleWhisperEngine {
    model: ModelLock<m::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    dtype: DType,
    mel_filters: Vec<f32>,
    english_only: bool,
}

struct SpecialTokens {
    sot: u32,
    transcribe: u32,
    eot: u32,
    timestamp_begin: u32,
}

impl CandleWhisperEngine {
    /// Half precision only pays off on accelerators.
    pub fn select_dtype(device: &Device) -> DType {
        if device.is_cpu() {
            DType::F32
        } else {
            DType::F16
        }
    }

    pub fn new(model_id: &str) -> Result<Self, TranscriptionError> {
        let device = Device::Cpu;
        let dtype = Self::select_dtype(&device);

        tracing::info!(
            device = ?device,
            model = model_id,
            "Initializing Candle Whisper transcription engine"
        );

        let api = Api::new().map_err(|e| TranscriptionError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer.json: {}", e)))?;
        let weights_path = repo.get("model.safetensors").map_err(|e| {
            TranscriptionError::ModelLoadFailed(format!("model.safetensors: {}", e))
        })?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let mel_file = match config.num_mel_bins {
            128 => "melfilters128.bytes",
            _ => "melfilters.bytes",
        };
        let mel_repo = api.repo(Repo::new(MEL_FILTERS_REPO.to_string(), RepoType::Model));
        let mel_bytes_path = mel_repo
            .get(mel_file)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("{}: {}", mel_file, e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer: {}", e)))?;

        let mel_bytes = std::fs::read(&mel_bytes_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("mel filters: {}", e)))?;
        let mel_filters = read_mel_filters(&mel_bytes, &config)?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], dtype, &device)
                .map_err(|e| TranscriptionError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let model = m::model::Whisper::load(&vb, config.clone())
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("model: {}", e)))?;

        let english_only = model_id.ends_with(".en");

        tracing::info!(english_only, "Candle Whisper engine loaded successfully");

        Ok(Self {
            model: ModelLock::new(model),
            tokenizer,
            config,
            device,
            dtype,
            mel_filters,
            english_only,
        })
    }

    fn special_tokens(&self) -> Result<SpecialTokens, TranscriptionError> {
        let no_timestamps = token_id(&self.tokenizer, m::NO_TIMESTAMPS_TOKEN)?;
        Ok(SpecialTokens {
            sot: token_id(&self.tokenizer, m::SOT_TOKEN)?,
            transcribe: token_id(&self.tokenizer, m::TRANSCRIBE_TOKEN)?,
            eot: token_id(&self.tokenizer, m::EOT_TOKEN)?,
            timestamp_begin: no_timestamps + 1,
        })
    }

    fn mel_for_window(&self, window: &[f32]) -> Result<Tensor, TranscriptionError> {
        let samples = if window.len() < m::N_SAMPLES {
            let mut padded = window.to_vec();
            padded.resize(m::N_SAMPLES, 0.0);
            padded
        } else {
            window.to_vec()
        };

        let mel_data = m::audio::pcm_to_mel(&self.config, &samples, &self.mel_filters);
        let n_mel = self.config.num_mel_bins;
        let n_frames = mel_data.len() / n_mel;

        let mel = Tensor::from_vec(mel_data, (1, n_mel, n_frames), &self.device)
            .and_then(|t| t.to_dtype(self.dtype))
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("mel tensor: {}", e)))?;

        if n_frames > m::N_FRAMES {
            mel.narrow(2, 0, m::N_FRAMES).map_err(engine_err)
        } else {
            Ok(mel)
        }
    }
}

impl TranscriptionEngine for CandleWhisperEngine {
    fn transcribe(&self, samples: &SampleBuffer) -> Result<AsrResult, TranscriptionError> {
        if samples.sample_rate != TARGET_SAMPLE_RATE {
            return Err(TranscriptionError::UnsupportedFormat(format!(
                "expected {} Hz samples, got {} Hz",
                TARGET_SAMPLE_RATE, samples.sample_rate
            )));
        }

        let special = self.special_tokens()?;
        self.model
            .with(|model| self.transcribe_windows(model, samples, &special))
    }
}

impl CandleWhisperEngine {
    fn transcribe_windows(
        &self,
        model: &mut m::model::Whisper,
        samples: &SampleBuffer,
        special: &SpecialTokens,
    ) -> Result<AsrResult, TranscriptionError> {
        // A previous call may have unwound mid-window.
        model.reset_kv_cache();

        let mut language: Option<LanguageCode> = None;
        let mut language_token: Option<u32> = None;
        let mut segments: Vec<Segment> = Vec::new();

        for (i, window) in samples.samples.chunks(m::N_SAMPLES).enumerate() {
            let offset_secs = (i * m::N_SAMPLES) as f64 / TARGET_SAMPLE_RATE as f64;
            let window_secs = window.len() as f64 / TARGET_SAMPLE_RATE as f64;

            let mel = self.mel_for_window(window)?;
            let audio_features = model
                .encoder
                .forward(&mel, true)
                .map_err(|e| TranscriptionError::TranscriptionFailed(format!("encoder: {}", e)))?;

            if i == 0 {
                if self.english_only {
                    language = LanguageCode::parse("en");
                } else if let Some((code, token)) =
                    detect_language(model, &self.tokenizer, &self.device, &audio_features)?
                {
                    tracing::debug!(language = code, "Detected spoken language");
                    language = LanguageCode::parse(code);
                    language_token = Some(token);
                }
            }

            let mut prompt = vec![special.sot];
            if let Some(token) = language_token {
                prompt.push(token);
            }
            prompt.push(special.transcribe);

            tracing::debug!(window = i, offset_secs, "Transcribing audio window");
            let generated = decode_window(model, &self.device, &audio_features, &prompt, special)?;
            let window_segments = tokens_to_segments(
                &self.tokenizer,
                &generated,
                special,
                offset_secs,
                window_secs,
            )?;
            segments.extend(window_segments);

            model.reset_kv_cache();
        }

        tracing::info!(
            segments = segments.len(),
            language = ?language.as_ref().map(|l| l.as_str()),
            "Audio transcription completed"
        );

        Ok(AsrResult::new(language, segments))
    }
}

fn detect_language(
    model: &mut m::model::Whisper,
    tokenizer: &Tokenizer,
    device: &Device,
    audio_features: &Tensor,
) -> Result<Option<(&'static str, u32)>, TranscriptionError> {
    let candidates: Vec<(&'static str, u32)> = WHISPER_LANGUAGES
        .iter()
        .filter_map(|(code, _)| {
            tokenizer
                .token_to_id(&format!("<|{}|>", code))
                .map(|id| (*code, id))
        })
        .collect();

    if candidates.is_empty() {
        return Ok(None);
    }

    let sot = token_id(tokenizer, m::SOT_TOKEN)?;
    let tokens = Tensor::new(&[[sot]], device).map_err(engine_err)?;
    let ys = model
        .decoder
        .forward(&tokens, audio_features, true)
        .map_err(|e| TranscriptionError::TranscriptionFailed(format!("decoder: {}", e)))?;
    let logits = model
        .decoder
        .final_linear(&ys.i(..1).map_err(engine_err)?)
        .and_then(|t| t.i(0))
        .and_then(|t| t.i(0))
        .map_err(engine_err)?;

    let ids: Vec<u32> = candidates.iter().map(|(_, id)| *id).collect();
    let ids = Tensor::new(ids.as_slice(), device).map_err(engine_err)?;
    let probs = logits
        .index_select(&ids, 0)
        .and_then(|l| l.to_dtype(DType::F32))
        .and_then(|l| candle_nn::ops::softmax(&l, D::Minus1))
        .and_then(|p| p.to_vec1::<f32>())
        .map_err(engine_err)?;

    let best = probs
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| candidates[idx]);

    Ok(best)
}

fn decode_window(
    model: &mut m::model::Whisper,
    device: &Device,
    audio_features: &Tensor,
    prompt: &[u32],
    special: &SpecialTokens,
) -> Result<Vec<u32>, TranscriptionError> {
    let mut tokens = prompt.to_vec();

    for step in 0..MAX_DECODE_TOKENS {
        let token_tensor = Tensor::new(tokens.as_slice(), device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(engine_err)?;

        let decoder_output = model
            .decoder
            .forward(&token_tensor, audio_features, step == 0)
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("decoder: {}", e)))?;

        let logits = model
            .decoder
            .final_linear(&decoder_output.squeeze(0).map_err(engine_err)?)
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("linear: {}", e)))?;

        let seq_len = logits.dim(0).map_err(engine_err)?;
        let last_logits = logits.get(seq_len - 1).map_err(engine_err)?;

        // The first generated token must be a timestamp so segments have a start.
        let next_token = if step == 0 {
            let vocab = last_logits.dim(0).map_err(engine_err)?;
            let begin = special.timestamp_begin as usize;
            if begin >= vocab {
                return Err(TranscriptionError::TranscriptionFailed(
                    "tokenizer has no timestamp tokens".to_string(),
                ));
            }
            let offset = last_logits
                .narrow(0, begin, vocab - begin)
                .and_then(|t| t.argmax(0))
                .and_then(|t| t.to_scalar::<u32>())
                .map_err(engine_err)?;
            special.timestamp_begin + offset
        } else {
            last_logits
                .argmax(0)
                .and_then(|t| t.to_scalar::<u32>())
                .map_err(engine_err)?
        };

        if next_token == special.eot {
            break;
        }

        tokens.push(next_token);
    }

    Ok(tokens.split_off(prompt.len()))
}

fn tokens_to_segments(
    tokenizer: &Tokenizer,
    tokens: &[u32],
    special: &SpecialTokens,
    offset_secs: f64,
    window_secs: f64,
) -> Result<Vec<Segment>, TranscriptionError> {
    let window_end = offset_secs + window_secs;
    let mut segments = Vec::new();
    let mut start: Option<f64> = None;
    let mut text_tokens: Vec<u32> = Vec::new();

    for &token in tokens {
        if token >= special.timestamp_begin {
            let ts = (offset_secs + (token - special.timestamp_begin) as f64 * TIME_PRECISION)
                .min(window_end);
            match start {
                Some(s) if !text_tokens.is_empty() => {
                    push_segment(tokenizer, &mut segments, s, ts.max(s), &text_tokens)?;
                    text_tokens.clear();
                    start = None;
                }
                _ => start = Some(ts),
            }
        } else if token < special.eot {
            text_tokens.push(token);
        }
    }

    if !text_tokens.is_empty() {
        let s = start.unwrap_or(offset_secs);
        push_segment(tokenizer, &mut segments, s, window_end.max(s), &text_tokens)?;
    }

    Ok(segments)
}

fn push_segment(
    tokenizer: &Tokenizer,
    segments: &mut Vec<Segment>,
    start: f64,
    end: f64,
    text_tokens: &[u32],
) -> Result<(), TranscriptionError> {
    let text = tokenizer
        .decode(text_tokens, true)
        .map_err(|e| TranscriptionError::TranscriptionFailed(format!("detokenize: {}", e)))?;
    let text = text.trim();
    if !text.is_empty() {
        segments.push(Segment::new(start, end, text));
    }
    Ok(())
}

fn token_id(tokenizer: &Tokenizer, token: &str) -> Result<u32, TranscriptionError> {
    tokenizer.token_to_id(token).ok_or_else(|| {
        TranscriptionError::TranscriptionFailed(format!("token not found: {}", token))
    })
}

fn engine_err(e: candle_core::Error) -> TranscriptionError {
    TranscriptionError::TranscriptionFailed(e.to_string())
}

fn read_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, TranscriptionError> {
    let expected_len = config.num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected_len * 4 {
        return Err(TranscriptionError::ModelLoadFailed(format!(
            "mel filters file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected_len * 4
        )));
    }

    let filters: Vec<f32> = bytes
        .chunks_exact(4)
        .take(expected_len)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(filters)
}
