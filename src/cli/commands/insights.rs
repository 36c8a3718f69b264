//! Insights command - run the summary pipeline from the terminal.

use crate::cli::output::format_size;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{Orchestrator, PdfRequest};
use std::path::PathBuf;

/// Generate insights for `url`, printing them or writing them to `output`,
/// and optionally exporting a PDF.
pub async fn run_insights(
    url: &str,
    pdf: Option<PathBuf>,
    output: Option<PathBuf>,
    settings: Settings,
) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(&settings)?;

    let spinner = Output::spinner("Fetching transcript and generating insights...");
    let result = orchestrator.generate_insights(url).await;
    spinner.finish_and_clear();
    let result = result?;

    Output::header(&result.title);
    Output::kv("Video", &result.video_id.watch_url());

    match &output {
        Some(path) => {
            std::fs::write(path, &result.insights)?;
            Output::success(&format!("Insights written to {}", path.display()));
        }
        None => println!("\n{}", result.insights),
    }

    if let Some(path) = pdf {
        let spinner = Output::spinner("Rendering PDF...");
        let doc = orchestrator
            .export_pdf(&PdfRequest {
                title: result.title.clone(),
                markdown_content: result.insights.clone(),
            })
            .await;
        spinner.finish_and_clear();
        let doc = doc?;

        let path = if path.is_dir() {
            path.join(doc.filename())
        } else {
            path
        };
        std::fs::write(&path, &doc.bytes)?;
        Output::success(&format!(
            "PDF written to {} ({})",
            path.display(),
            format_size(doc.bytes.len() as u64)
        ));
    }

    Ok(())
}
