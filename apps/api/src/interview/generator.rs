//! Interview generation — orchestrates the two model calls and the store write.
//!
//! Flow: extraction call → parse parameters → generation call → sanitize and validate
//!       questions → build record → persist.
//!
//! Raw model text is captured as it arrives so a failure at any later stage can report
//! what the model actually said.

use std::fmt;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::interview::covers::CoverImagePicker;
use crate::interview::extractor::{
    coerce_to_string, extract_parameters, split_techstack, ExtractedParameters,
};
use crate::interview::prompts::{EXTRACTION_PROMPT_TEMPLATE, QUESTIONS_PROMPT_TEMPLATE};
use crate::interview::sanitize::{parse_json_lenient, strip_code_fence, LenientParse};
use crate::interview::store::DocumentStore;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::interview::InterviewRecord;

/// Collection new interviews are written to unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "interviews";

/// A validated generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Conversation messages, passed to the extraction prompt untouched.
    pub messages: Vec<Value>,
    pub user_id: String,
}

/// Pipeline position, used for logging and failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Extracting,
    Extracted,
    Generating,
    Generated,
    Validating,
    Persisting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Extracting => "extracting",
            Stage::Extracted => "extracted",
            Stage::Generating => "generating",
            Stage::Generated => "generated",
            Stage::Validating => "validating",
            Stage::Persisting => "persisting",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Failed to parse extraction response as a JSON object")]
    ExtractionParse,

    #[error("Model returned an invalid questions array")]
    InvalidQuestions,

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Failed to serialize request data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to persist interview: {0}")]
    Persistence(anyhow::Error),
}

/// Whatever the pipeline had seen when it stopped.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub extracted_text: Option<String>,
    pub questions_text: Option<String>,
    pub cleaned_questions: Option<String>,
    pub parsed_questions: Option<LenientParse>,
}

/// A failed run: the error, where it happened, and the captured diagnostics.
#[derive(Debug)]
pub struct GenerationFailure {
    pub stage: Stage,
    pub error: GenerateError,
    pub diagnostics: Diagnostics,
}

/// A successfully stored interview.
#[derive(Debug, Clone)]
pub struct StoredInterview {
    pub id: String,
    pub record: InterviewRecord,
}

/// Runs the generation pipeline against injected collaborators.
#[derive(Clone)]
pub struct InterviewGenerator {
    llm: Arc<dyn TextGenerator>,
    store: Arc<dyn DocumentStore>,
    covers: Arc<dyn CoverImagePicker>,
    collection: String,
}

impl InterviewGenerator {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        store: Arc<dyn DocumentStore>,
        covers: Arc<dyn CoverImagePicker>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            store,
            covers,
            collection: collection.into(),
        }
    }

    /// Runs every stage in order. Nothing is retried.
    pub async fn run(&self, request: GenerateRequest) -> Result<StoredInterview, GenerationFailure> {
        let mut run = Run {
            stage: Stage::Init,
            diagnostics: Diagnostics::default(),
        };

        match self.run_stages(&request, &mut run).await {
            Ok(stored) => {
                run.advance(Stage::Done);
                info!(
                    "Stored interview {} with {} questions for user {}",
                    stored.id,
                    stored.record.questions.len(),
                    request.user_id
                );
                Ok(stored)
            }
            Err(e) => {
                error!(
                    "Interview generation failed while {} for user {}: {e}",
                    run.stage, request.user_id
                );
                Err(GenerationFailure {
                    stage: run.stage,
                    error: e,
                    diagnostics: run.diagnostics,
                })
            }
        }
    }

    async fn run_stages(
        &self,
        request: &GenerateRequest,
        run: &mut Run,
    ) -> Result<StoredInterview, GenerateError> {
        // Extraction call
        run.advance(Stage::Extracting);
        let conversation_json = serde_json::to_string_pretty(&request.messages)?;
        let prompt = EXTRACTION_PROMPT_TEMPLATE.replace("{conversation_json}", &conversation_json);
        let extracted_text = self.llm.generate(&prompt).await?;
        run.diagnostics.extracted_text = Some(extracted_text.clone());

        let params = extract_parameters(&extracted_text).ok_or(GenerateError::ExtractionParse)?;
        run.advance(Stage::Extracted);
        info!(
            "Extracted parameters: role={:?}, level={:?}, type={:?}, amount={}",
            params.role, params.level, params.interview_type, params.amount
        );

        // Generation call
        run.advance(Stage::Generating);
        let questions_text = self.llm.generate(&build_questions_prompt(&params)).await?;
        run.diagnostics.questions_text = Some(questions_text.clone());
        run.advance(Stage::Generated);

        // Validation
        run.advance(Stage::Validating);
        let cleaned = strip_code_fence(Some(&questions_text));
        let parsed = parse_json_lenient(Some(&cleaned));
        run.diagnostics.cleaned_questions = Some(cleaned);
        run.diagnostics.parsed_questions = Some(parsed.clone());

        let questions = normalize_questions(parsed).ok_or(GenerateError::InvalidQuestions)?;
        if questions.len() != params.amount as usize {
            warn!(
                "Requested {} questions but the model returned {}",
                params.amount,
                questions.len()
            );
        }

        // Persistence
        run.advance(Stage::Persisting);
        let record = InterviewRecord {
            role: params.role,
            interview_type: params.interview_type,
            level: params.level,
            techstack: split_techstack(&params.techstack),
            questions,
            user_id: request.user_id.clone(),
            finalized: true,
            cover_image: self.covers.pick(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let document = serde_json::to_value(&record)?;
        let id = self
            .store
            .add(&self.collection, document)
            .await
            .map_err(GenerateError::Persistence)?;

        Ok(StoredInterview { id, record })
    }
}

struct Run {
    stage: Stage,
    diagnostics: Diagnostics,
}

impl Run {
    fn advance(&mut self, next: Stage) {
        debug!("Interview pipeline: {} -> {}", self.stage, next);
        self.stage = next;
    }
}

fn build_questions_prompt(params: &ExtractedParameters) -> String {
    QUESTIONS_PROMPT_TEMPLATE
        .replace("{role}", &params.role)
        .replace("{level}", &params.level)
        .replace("{techstack}", &params.techstack)
        .replace("{type}", &params.interview_type)
        .replace("{amount}", &params.amount.to_string())
}

/// Accepts only a non-empty array; every item becomes a trimmed string.
fn normalize_questions(parsed: LenientParse) -> Option<Vec<String>> {
    match parsed.into_value()? {
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .map(|q| coerce_to_string(q).trim().to_string())
                .collect(),
        ),
        _ => None,
    }
}
