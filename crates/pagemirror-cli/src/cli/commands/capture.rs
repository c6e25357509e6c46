//! `pagemirror capture <url> --name <dir>` – save a page and its assets.

use anyhow::{Context, Result};
use pagemirror_core::capture::{self, CaptureOptions, ResolvedAsset};
use pagemirror_core::config::MirrorConfig;
use pagemirror_core::downloader::{CurlFetcher, DownloadOutcome, DownloadSummary};
use pagemirror_core::page_source::{FilePageSource, HttpPageSource, PageSource, RenderedPage};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct CaptureArgs {
    pub url: String,
    pub name: PathBuf,
    pub html: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub dry_run: bool,
    pub report: Option<PathBuf>,
}

pub async fn run_capture(cfg: &MirrorConfig, args: CaptureArgs) -> Result<()> {
    let mut options = CaptureOptions::from(cfg);
    if args.jobs.is_some() {
        options.max_concurrent = args.jobs;
    }

    let page = load_page(cfg, &args).await?;
    println!("Loaded {}", page.final_url);

    if args.dry_run {
        let prepared = capture::plan(&page, &options)?;
        print_plan(&prepared.assets);
        println!(
            "{} asset(s) would be queued, {} left untouched.",
            prepared.jobs(&args.name).len(),
            prepared.skipped()
        );
        return Ok(());
    }

    let fetcher = Arc::new(CurlFetcher::from_config(cfg));
    let result = capture::capture(&page, &args.name, fetcher, &options).await?;

    print_failures(&result.outcomes);
    print_summary(&result.summary);
    println!("Saved {}", result.index_path.display());

    if let Some(path) = &args.report {
        write_report(path, &result.assets, &result.outcomes, &result.summary)
            .with_context(|| format!("write report {}", path.display()))?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

async fn load_page(cfg: &MirrorConfig, args: &CaptureArgs) -> Result<RenderedPage> {
    let source: Box<dyn PageSource + Send> = match &args.html {
        Some(path) => Box::new(FilePageSource::new(path, args.url.clone())),
        None => Box::new(HttpPageSource::new(args.url.clone(), cfg)),
    };
    let page = tokio::task::spawn_blocking(move || source.load())
        .await
        .context("page load task")??;
    Ok(page)
}

fn print_plan(assets: &[ResolvedAsset]) {
    for asset in assets {
        match (&asset.local_path, &asset.skip) {
            (Some(local), _) => println!("  {:<10} {} -> {}", asset.reference.kind, asset.reference.raw, local),
            (None, Some(reason)) => {
                println!("  {:<10} {} (kept: {})", asset.reference.kind, asset.reference.raw, reason)
            }
            (None, None) => {}
        }
    }
}

fn print_failures(outcomes: &[DownloadOutcome]) {
    for o in outcomes.iter().filter(|o| !o.success) {
        println!(
            "  failed: {} -> {} ({})",
            o.url,
            o.local_path,
            o.error.as_deref().unwrap_or("unknown error")
        );
    }
}

fn print_summary(summary: &DownloadSummary) {
    println!(
        "Assets: {} queued, {} saved, {} failed",
        summary.queued, summary.succeeded, summary.failed
    );
    if summary.failed > 0 {
        tracing::warn!(failed = summary.failed, "capture completed with asset failures");
    }
}

fn write_report(
    path: &Path,
    assets: &[ResolvedAsset],
    outcomes: &[DownloadOutcome],
    summary: &DownloadSummary,
) -> Result<()> {
    let skipped: Vec<serde_json::Value> = assets
        .iter()
        .filter_map(|a| {
            a.skip.as_ref().map(|reason| {
                json!({
                    "kind": a.reference.kind,
                    "raw": a.reference.raw,
                    "reason": reason.to_string(),
                })
            })
        })
        .collect();
    let report = json!({
        "summary": summary,
        "outcomes": outcomes,
        "skipped": skipped,
    });
    std::fs::write(path, serde_json::to_vec_pretty(&report)?)?;
    Ok(())
}
