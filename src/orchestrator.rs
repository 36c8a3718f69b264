//! Pipeline orchestrator for Glean.
//!
//! Sequences the collaborators for one request: video id -> transcript ->
//! LLM for insights, and Markdown -> HTML -> PDF for export. Holds no
//! per-request state.

use crate::config::{Prompts, Settings};
use crate::error::{GleanError, Result};
use crate::llm::{create_generator, Generator};
use crate::render::{compose_document, markdown_to_html, PdfDocument, PdfRenderer, WkhtmltopdfRenderer};
use crate::transcript::{join_segments, TranscriptSource, YoutubeTranscriptSource};
use crate::video_source::{
    extract_video_id, or_placeholder, OEmbedTitleSource, TitleSource, VideoId, PLACEHOLDER_TITLE,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Summary of one video.
#[derive(Debug, Clone, Serialize)]
pub struct InsightsResult {
    pub title: String,
    pub insights: String,
    pub video_id: VideoId,
}

/// A previously generated summary sent back for PDF export.
#[derive(Debug, Clone, Deserialize)]
pub struct PdfRequest {
    pub title: String,
    pub markdown_content: String,
}

/// The main orchestrator for the Glean pipeline.
pub struct Orchestrator {
    prompts: Prompts,
    titles: Arc<dyn TitleSource>,
    transcripts: Arc<dyn TranscriptSource>,
    generator: Arc<dyn Generator>,
    renderer: Arc<dyn PdfRenderer>,
}

impl Orchestrator {
    /// Create an orchestrator with the production collaborators described by `settings`.
    pub fn new(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let titles = Arc::new(OEmbedTitleSource::new(settings.youtube.timeout())?);
        let transcripts = Arc::new(YoutubeTranscriptSource::new(
            settings.youtube.languages.clone(),
            settings.youtube.timeout(),
        )?);
        let generator = create_generator(&settings.llm)?;
        let renderer = Arc::new(WkhtmltopdfRenderer::new(&settings.pdf));

        Ok(Self::with_collaborators(
            prompts,
            titles,
            transcripts,
            generator,
            renderer,
        ))
    }

    /// Create an orchestrator from explicit collaborators.
    pub fn with_collaborators(
        prompts: Prompts,
        titles: Arc<dyn TitleSource>,
        transcripts: Arc<dyn TranscriptSource>,
        generator: Arc<dyn Generator>,
        renderer: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self {
            prompts,
            titles,
            transcripts,
            generator,
            renderer,
        }
    }

    /// Generate insights for a YouTube URL.
    ///
    /// The title lookup runs alongside the transcript and LLM calls and never fails the request.
    #[instrument(skip(self))]
    pub async fn generate_insights(&self, video_url: &str) -> Result<InsightsResult> {
        let video_id = extract_video_id(video_url).ok_or(GleanError::InvalidUrl)?;
        info!("Generating insights for {}", video_id);

        let (title, insights) = tokio::join!(
            or_placeholder(self.titles.fetch_title(video_url), PLACEHOLDER_TITLE),
            self.summarize(&video_id),
        );

        Ok(InsightsResult {
            title,
            insights: insights?,
            video_id,
        })
    }

    /// Fetch the transcript for `video_id` and run it through the LLM.
    async fn summarize(&self, video_id: &VideoId) -> Result<String> {
        let transcript = self.fetch_transcript_text(video_id).await?;
        debug!("Transcript has {} characters", transcript.len());

        let prompt = self.prompts.insights_prompt(&transcript);
        debug!("Sending prompt to {}", self.generator.provider_name());
        let insights = self.generator.generate(&prompt).await?;
        Ok(insights)
    }

    /// Fetch and join the transcript. An empty transcript counts as missing.
    pub async fn fetch_transcript_text(&self, video_id: &VideoId) -> Result<String> {
        let segments = self.transcripts.fetch_transcript(video_id).await?;
        let transcript = join_segments(&segments);

        if transcript.trim().is_empty() {
            return Err(GleanError::TranscriptEmpty);
        }

        Ok(transcript)
    }

    /// Render a Markdown summary to PDF.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn export_pdf(&self, request: &PdfRequest) -> Result<PdfDocument> {
        let body = markdown_to_html(&request.markdown_content);
        let html = compose_document(&request.title, &body);

        let bytes = self.renderer.render(&html).await?;
        info!("Rendered PDF ({} bytes)", bytes.len());

        Ok(PdfDocument {
            title: request.title.clone(),
            bytes,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory collaborators for orchestrator and router tests.

    use super::*;
    use crate::llm::GenerationError;
    use crate::render::RenderError;
    use crate::transcript::{TranscriptError, TranscriptSegment};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub struct FakeTitles {
        pub result: std::result::Result<String, String>,
        pub calls: AtomicUsize,
    }

    impl FakeTitles {
        pub fn new(result: std::result::Result<String, String>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TitleSource for FakeTitles {
        async fn fetch_title(&self, _video_url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().map_err(GleanError::Metadata)
        }
    }

    pub struct FakeTranscripts {
        pub result: std::result::Result<Vec<TranscriptSegment>, TranscriptError>,
        pub calls: AtomicUsize,
    }

    impl FakeTranscripts {
        pub fn new(result: std::result::Result<Vec<TranscriptSegment>, TranscriptError>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn texts(texts: &[&str]) -> Self {
            Self::new(Ok(texts
                .iter()
                .enumerate()
                .map(|(i, t)| TranscriptSegment::new(*t, i as f64, 1.0))
                .collect()))
        }
    }

    #[async_trait]
    impl TranscriptSource for FakeTranscripts {
        async fn fetch_transcript(
            &self,
            _video_id: &VideoId,
        ) -> std::result::Result<Vec<TranscriptSegment>, TranscriptError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    pub struct FakeGenerator {
        pub result: std::result::Result<String, GenerationError>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        pub fn new(result: std::result::Result<String, GenerationError>) -> Self {
            Self {
                result,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Generator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.result.clone()
        }

        fn provider_name(&self) -> &str {
            "fake"
        }
    }

    pub struct FakeRenderer {
        pub result: std::result::Result<Vec<u8>, RenderError>,
        pub html: Mutex<Option<String>>,
    }

    impl FakeRenderer {
        pub fn new(result: std::result::Result<Vec<u8>, RenderError>) -> Self {
            Self {
                result,
                html: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl PdfRenderer for FakeRenderer {
        async fn render(&self, html: &str) -> std::result::Result<Vec<u8>, RenderError> {
            *self.html.lock().unwrap() = Some(html.to_string());
            self.result.clone()
        }
    }

    /// Collaborator handles kept by a test to inspect calls afterwards.
    pub struct Fakes {
        pub titles: Arc<FakeTitles>,
        pub transcripts: Arc<FakeTranscripts>,
        pub generator: Arc<FakeGenerator>,
        pub renderer: Arc<FakeRenderer>,
    }

    impl Fakes {
        pub fn happy() -> Self {
            Self {
                titles: Arc::new(FakeTitles::new(Ok("A Video".to_string()))),
                transcripts: Arc::new(FakeTranscripts::texts(&["hello", "world"])),
                generator: Arc::new(FakeGenerator::new(Ok("## Summary\nGreat.".to_string()))),
                renderer: Arc::new(FakeRenderer::new(Ok(b"%PDF-1.4 fake".to_vec()))),
            }
        }

        pub fn orchestrator(&self) -> Orchestrator {
            Orchestrator::with_collaborators(
                Prompts::default(),
                self.titles.clone(),
                self.transcripts.clone(),
                self.generator.clone(),
                self.renderer.clone(),
            )
        }
    }
}
