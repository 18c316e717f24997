//! Orchestration: evidence in, summary and quiz out.
//!
//! Two flows are exposed, one per endpoint:
//!
//! * [`study_pack`] collects evidence once, writes the summary, then asks for
//!   a quiz generated **from the summary text** with the same evidence. The
//!   two model calls run back to back.
//! * [`quiz_for_note`] generates a quiz directly from the note text.

use crate::error::NoteError;
use crate::model::{GenerationResult, ImagePayload, NoteRequest, QuizItem};
use crate::pipeline::evidence::{collect_evidence, EvidenceReport};
use crate::pipeline::fetch::AssetFetcher;
use crate::pipeline::llm::Generator;
use crate::pipeline::parse::{clean_summary, parse_quiz_array};
use crate::prompts;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Which artifact a single generation call should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Summary,
    Quiz,
}

/// Summary plus quiz for one note, and the evidence that went into both.
#[derive(Debug, Clone)]
pub struct StudyPack {
    pub summary: String,
    pub quiz: Vec<QuizItem>,
    pub evidence: EvidenceReport,
}

/// Generate a Markdown summary. A blank response is an error.
pub async fn summarize(
    note_text: &str,
    evidence: &[ImagePayload],
    generator: &dyn Generator,
) -> Result<String, NoteError> {
    let raw = generator
        .generate(&prompts::summary_prompt(note_text), evidence)
        .await?;
    let summary = clean_summary(&raw);
    if summary.is_empty() {
        return Err(NoteError::GenerationFailed {
            message: "model returned an empty summary".into(),
        });
    }
    Ok(summary)
}

/// Generate a quiz. Unusable model output yields an empty list, not an error.
pub async fn generate_quiz(
    note_text: &str,
    evidence: &[ImagePayload],
    generator: &dyn Generator,
) -> Result<Vec<QuizItem>, NoteError> {
    let raw = generator
        .generate(&prompts::quiz_prompt(note_text), evidence)
        .await?;
    let quiz = parse_quiz_array(&raw);
    debug!("Quiz: {} items from {} chars", quiz.len(), raw.len());
    Ok(quiz)
}

/// Generate one artifact of the requested kind.
pub async fn generate_artifact(
    kind: ArtifactKind,
    note_text: &str,
    evidence: &[ImagePayload],
    generator: &dyn Generator,
) -> Result<GenerationResult, NoteError> {
    match kind {
        ArtifactKind::Summary => summarize(note_text, evidence, generator)
            .await
            .map(GenerationResult::Summary),
        ArtifactKind::Quiz => generate_quiz(note_text, evidence, generator)
            .await
            .map(GenerationResult::QuizList),
    }
}

/// Full flow behind `POST /generate`.
///
/// # Errors
/// - [`NoteError::MissingEvidence`] when neither images nor a PDF were given
/// - any PDF download or rasterisation error
/// - any generation error, including an empty summary
pub async fn study_pack(
    request: &NoteRequest,
    fetcher: &AssetFetcher,
    generator: &dyn Generator,
    pdfium_lib_path: Option<PathBuf>,
) -> Result<StudyPack, NoteError> {
    let start = Instant::now();
    let evidence = collect_evidence(request, fetcher, pdfium_lib_path).await?;

    let summary = summarize(&request.note_text, &evidence.payloads, generator).await?;
    let quiz = generate_quiz(&summary, &evidence.payloads, generator).await?;

    info!(
        "Study pack ready: {} evidence images, {} skipped, summary {} chars, {} quiz items, {:?}",
        evidence.payloads.len(),
        evidence.skipped.len(),
        summary.len(),
        quiz.len(),
        start.elapsed()
    );

    Ok(StudyPack {
        summary,
        quiz,
        evidence,
    })
}

/// Flow behind `POST /api/ai/quiz/generate`.
///
/// A request with no evidence at all yields an empty quiz without calling
/// the model. PDF and generation failures are still errors.
pub async fn quiz_for_note(
    request: &NoteRequest,
    fetcher: &AssetFetcher,
    generator: &dyn Generator,
    pdfium_lib_path: Option<PathBuf>,
) -> Result<Vec<QuizItem>, NoteError> {
    if !request.has_evidence() {
        info!("Quiz requested without evidence; returning an empty quiz");
        return Ok(Vec::new());
    }

    let evidence = collect_evidence(request, fetcher, pdfium_lib_path).await?;
    let quiz = generate_quiz(&request.note_text, &evidence.payloads, generator).await?;
    info!(
        "Quiz ready: {} items from {} evidence images",
        quiz.len(),
        evidence.payloads.len()
    );
    Ok(quiz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned responses in order and records every prompt.
    struct Scripted {
        responses: Mutex<Vec<Result<String, NoteError>>>,
        prompts: Mutex<Vec<(String, usize)>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<String, NoteError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, usize)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Generator for Scripted {
        async fn generate(
            &self,
            prompt: &str,
            evidence: &[ImagePayload],
        ) -> Result<String, NoteError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), evidence.len()));
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(NoteError::Internal("script exhausted".into())))
        }
    }

    const QUIZ_JSON: &str = r#"[{"question": "Q", "options": ["a","b","c","d","e"], "answerIndex": 1, "explanation": "x"}]"#;

    fn evidence() -> Vec<ImagePayload> {
        vec![ImagePayload::png(vec![1]), ImagePayload::png(vec![2])]
    }

    #[tokio::test]
    async fn summary_is_trimmed_and_prompt_carries_note() {
        let gen = Scripted::new(vec![Ok("\n## TCP 핵심 요약\nbody\n".into())]);
        let summary = summarize("three-way handshake", &evidence(), &gen)
            .await
            .unwrap();
        assert_eq!(summary, "## TCP 핵심 요약\nbody");
        let calls = gen.calls();
        assert!(calls[0].0.contains("three-way handshake"));
        assert_eq!(calls[0].1, 2);
    }

    #[tokio::test]
    async fn blank_summary_is_a_failure() {
        let gen = Scripted::new(vec![Ok("  \n ".into())]);
        let err = summarize("note", &[], &gen).await.unwrap_err();
        assert!(matches!(err, NoteError::GenerationFailed { .. }));
    }

    #[tokio::test]
    async fn unusable_quiz_output_is_empty_not_error() {
        let gen = Scripted::new(vec![Ok("Sorry, no quiz today.".into())]);
        let quiz = generate_quiz("note", &[], &gen).await.unwrap();
        assert!(quiz.is_empty());
    }

    #[tokio::test]
    async fn generation_error_propagates() {
        let gen = Scripted::new(vec![Err(NoteError::GenerationFailed {
            message: "quota".into(),
        })]);
        let err = generate_quiz("note", &[], &gen).await.unwrap_err();
        assert!(matches!(err, NoteError::GenerationFailed { .. }));
    }

    #[tokio::test]
    async fn artifact_kind_selects_template() {
        let gen = Scripted::new(vec![Ok("## A 핵심 요약".into()), Ok(QUIZ_JSON.into())]);
        let summary = generate_artifact(ArtifactKind::Summary, "n", &[], &gen)
            .await
            .unwrap();
        assert_eq!(summary, GenerationResult::Summary("## A 핵심 요약".into()));
        let quiz = generate_artifact(ArtifactKind::Quiz, "n", &[], &gen)
            .await
            .unwrap();
        match quiz {
            GenerationResult::QuizList(items) => assert_eq!(items.len(), 1),
            other => panic!("unexpected result: {other:?}"),
        }
        let calls = gen.calls();
        assert_eq!(calls[0].0, prompts::summary_prompt("n"));
        assert_eq!(calls[1].0, prompts::quiz_prompt("n"));
    }

    #[tokio::test]
    async fn quiz_without_evidence_skips_the_model() {
        let config = crate::config::ServiceConfig::default();
        let fetcher = AssetFetcher::new(&config).unwrap();
        let gen = Scripted::new(vec![]);
        let quiz = quiz_for_note(&NoteRequest::new("note"), &fetcher, &gen, None)
            .await
            .unwrap();
        assert!(quiz.is_empty());
        assert!(gen.calls().is_empty());
    }

    #[tokio::test]
    async fn study_pack_without_evidence_fails_before_the_model() {
        let config = crate::config::ServiceConfig::default();
        let fetcher = AssetFetcher::new(&config).unwrap();
        let gen = Scripted::new(vec![]);
        let err = study_pack(&NoteRequest::new("note"), &fetcher, &gen, None)
            .await
            .unwrap_err();
        assert!(matches!(err, NoteError::MissingEvidence));
        assert!(gen.calls().is_empty());
    }
}
