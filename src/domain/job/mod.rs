pub mod error;
pub mod input;
pub mod model;
pub mod service;
pub mod text;

pub use error::JobServiceError;
pub use input::{JobInput, SpeechTranslationInput, TextToSpeechInput, VoiceCloneInput};
pub use model::{Job, JobResult, JobStatus, JobStatusUpdate, JobType, PROCESSING_ERROR};
pub use service::{JobProcessor, JobProcessorApi};
pub use text::prepare_text;
