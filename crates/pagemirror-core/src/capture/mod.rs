//! Capture pipeline: page markup in, self-contained directory out.
//!
//! scan → resolve/filter/map → rewrite → serialize → download → write index.
//!
//! The DOM tree is only touched from the calling thread and is dropped before
//! the first await; downloads work from the finished job list.

mod error;
mod plan;

pub use error::CaptureError;
pub use plan::{resolve_assets, ResolvedAsset};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

use crate::config::MirrorConfig;
use crate::document::{self, Document};
use crate::downloader::{self, DownloadJob, DownloadOutcome, DownloadSummary, Fetcher};
use crate::page_source::{PageSource, RenderedPage};
use crate::path_map::{PathMapper, PrettyRoutes, RandomTokens, TokenSource};
use crate::storage::{self, INDEX_FILE};

/// Knobs for one capture run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureOptions {
    pub pretty_routes: PrettyRoutes,
    /// Bound on downloads in flight (None = all at once).
    pub max_concurrent: Option<usize>,
}

impl From<&MirrorConfig> for CaptureOptions {
    fn from(cfg: &MirrorConfig) -> Self {
        Self {
            pretty_routes: cfg.pretty_routes,
            max_concurrent: cfg.max_concurrent_downloads,
        }
    }
}

/// Document rewritten and every reference decided; nothing downloaded yet.
#[derive(Debug, Clone)]
pub struct PreparedCapture {
    pub base_url: Url,
    pub document: String,
    pub assets: Vec<ResolvedAsset>,
    pub rewritten: usize,
    pub markers_removed: usize,
}

impl PreparedCapture {
    /// One job per localized reference, in document order. Duplicates are kept.
    pub fn jobs(&self, root: &Path) -> Vec<DownloadJob> {
        self.assets
            .iter()
            .filter_map(|asset| {
                let url = asset.absolute_url.as_ref()?;
                let local = asset.local_path.as_ref()?;
                match storage::safe_join(root, local) {
                    Ok(target) => Some(DownloadJob {
                        url: url.to_string(),
                        local_path: local.clone(),
                        target,
                    }),
                    Err(e) => {
                        tracing::warn!(url = %url, "not queued: {}", e);
                        None
                    }
                }
            })
            .collect()
    }

    pub fn skipped(&self) -> usize {
        self.assets.iter().filter(|a| !a.is_localized()).count()
    }
}

/// Final output of a run. Used for reporting only.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub base_url: Url,
    pub document: String,
    pub index_path: PathBuf,
    pub assets: Vec<ResolvedAsset>,
    pub outcomes: Vec<DownloadOutcome>,
    pub summary: DownloadSummary,
}

fn parse_base(final_url: &str) -> Result<Url, CaptureError> {
    let trimmed = final_url.trim();
    if trimmed.is_empty() {
        return Err(CaptureError::MissingInput("page URL"));
    }
    let url = Url::parse(trimmed).map_err(|e| CaptureError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(CaptureError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: "URL has no host".to_string(),
        });
    }
    Ok(url)
}

/// Runs every decision and rewrite for `page` without touching the network.
pub fn prepare<T: TokenSource>(
    page: &RenderedPage,
    mapper: &mut PathMapper<T>,
) -> Result<PreparedCapture, CaptureError> {
    let base_url = parse_base(&page.final_url)?;

    let doc = Document::from(page.html.as_str());
    let markers_removed = document::strip_editor_markers(&doc);
    let references = document::scan_references(&doc);
    let assets = resolve_assets(references, &base_url, mapper);
    let rewritten = document::apply_rewrites(&doc, &assets);
    let html = doc.html().to_string();

    Ok(PreparedCapture {
        base_url,
        document: html,
        assets,
        rewritten,
        markers_removed,
    })
}

/// Same as [`prepare`] with a fresh random-token mapper.
pub fn plan(page: &RenderedPage, options: &CaptureOptions) -> Result<PreparedCapture, CaptureError> {
    let mut mapper = PathMapper::new(options.pretty_routes);
    prepare(page, &mut mapper)
}

/// Captures `page` into `output_dir` using random fallback tokens.
pub async fn capture<F: Fetcher>(
    page: &RenderedPage,
    output_dir: &Path,
    fetcher: Arc<F>,
    options: &CaptureOptions,
) -> Result<CaptureResult, CaptureError> {
    capture_with_tokens(page, output_dir, fetcher, options, RandomTokens).await
}

/// Captures `page` into `output_dir` with an explicit token source.
///
/// Fails only on fatal setup problems; individual asset failures are in
/// `outcomes` and `summary`.
pub async fn capture_with_tokens<F: Fetcher, T: TokenSource>(
    page: &RenderedPage,
    output_dir: &Path,
    fetcher: Arc<F>,
    options: &CaptureOptions,
    tokens: T,
) -> Result<CaptureResult, CaptureError> {
    if output_dir.as_os_str().is_empty() {
        return Err(CaptureError::MissingInput("output directory"));
    }

    let prepared = {
        let mut mapper = PathMapper::with_tokens(options.pretty_routes, tokens);
        prepare(page, &mut mapper)?
    };
    tracing::info!(
        page = %prepared.base_url,
        references = prepared.assets.len(),
        rewritten = prepared.rewritten,
        skipped = prepared.skipped(),
        "document prepared"
    );

    storage::ensure_dir(output_dir)?;
    let jobs = prepared.jobs(output_dir);
    let (outcomes, summary) = downloader::download_all(jobs, fetcher, options.max_concurrent).await;

    let index_path = output_dir.join(INDEX_FILE);
    storage::write_file(&index_path, prepared.document.as_bytes())?;
    tracing::info!(path = %index_path.display(), "document saved");

    Ok(CaptureResult {
        base_url: prepared.base_url,
        document: prepared.document,
        index_path,
        assets: prepared.assets,
        outcomes,
        summary,
    })
}

/// Loads the page from `source`, then captures it.
pub async fn capture_from_source<S: PageSource + ?Sized, F: Fetcher>(
    source: &S,
    output_dir: &Path,
    fetcher: Arc<F>,
    options: &CaptureOptions,
) -> Result<CaptureResult, CaptureError> {
    let page = source.load()?;
    capture(&page, output_dir, fetcher, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::FetchError;
    use crate::path_map::SequentialTokens;
    use std::collections::HashMap;

    struct StaticSite(HashMap<String, Vec<u8>>);

    impl Fetcher for StaticSite {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.0.get(url).cloned().ok_or(FetchError::Http(404))
        }
    }

    fn site(entries: &[(&str, &str)]) -> Arc<StaticSite> {
        Arc::new(StaticSite(
            entries
                .iter()
                .map(|(u, b)| (u.to_string(), b.as_bytes().to_vec()))
                .collect(),
        ))
    }

    fn page(html: &str, url: &str) -> RenderedPage {
        RenderedPage {
            html: html.to_string(),
            final_url: url.to_string(),
        }
    }

    #[test]
    fn prepare_rewrites_in_scope_only() {
        let p = page(
            r#"<html><head><link rel="stylesheet" href="/static/site.css"><script src="https://cdn.other.com/lib.js"></script></head>
<body><img src="img.png"><a href="mailto:a@b.com">m</a><div id="pagemirror-editor">x</div></body></html>"#,
            "https://ex.com/blog/post",
        );
        let mut mapper = PathMapper::with_tokens(PrettyRoutes::Parent, SequentialTokens::new("t"));
        let prepared = prepare(&p, &mut mapper).unwrap();
        assert_eq!(prepared.rewritten, 2);
        assert_eq!(prepared.markers_removed, 1);
        assert_eq!(prepared.skipped(), 1);
        assert!(prepared.document.contains(r#"href="static/site.css""#));
        assert!(prepared.document.contains(r#"src="img.png""#));
        assert!(prepared.document.contains(r#"src="https://cdn.other.com/lib.js""#));
        assert!(prepared.document.contains(r#"href="mailto:a@b.com""#));
        assert!(!prepared.document.contains("pagemirror-editor"));

        let jobs = prepared.jobs(Path::new("/out"));
        let urls: Vec<&str> = jobs.iter().map(|j| j.url.as_str()).collect();
        assert_eq!(urls, vec!["https://ex.com/static/site.css", "https://ex.com/blog/img.png"]);
        assert_eq!(jobs[0].target, PathBuf::from("/out/static/site.css"));
    }

    #[test]
    fn prepare_rejects_bad_base() {
        let mut mapper = PathMapper::new(PrettyRoutes::Parent);
        assert!(matches!(
            prepare(&page("<p></p>", ""), &mut mapper),
            Err(CaptureError::MissingInput(_))
        ));
        assert!(matches!(
            prepare(&page("<p></p>", "not a url"), &mut mapper),
            Err(CaptureError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            prepare(&page("<p></p>", "mailto:a@b.com"), &mut mapper),
            Err(CaptureError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn partial_failure_still_saves_document() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("site");
        let p = page(
            r#"<img src="a.png"><img src="b.png"><script src="/js/app.js"></script><img src="https://cdn.other.com/x.png">"#,
            "https://ex.com/index.html",
        );
        let fetcher = site(&[("https://ex.com/a.png", "A"), ("https://ex.com/js/app.js", "JS")]);
        let result = capture_with_tokens(
            &p,
            &out,
            fetcher,
            &CaptureOptions::default(),
            SequentialTokens::new("t"),
        )
        .await
        .unwrap();

        assert_eq!(result.summary, DownloadSummary { queued: 3, succeeded: 2, failed: 1 });
        assert_eq!(result.outcomes.len(), 3);
        assert_eq!(result.outcomes[1].url, "https://ex.com/b.png");
        assert!(!result.outcomes[1].success);

        let index = std::fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains(r#"src="a.png""#));
        assert!(index.contains(r#"src="b.png""#));
        assert!(index.contains(r#"src="js/app.js""#));
        assert!(index.contains(r#"src="https://cdn.other.com/x.png""#));
        assert_eq!(std::fs::read(out.join("js/app.js")).unwrap(), b"JS");
        assert!(!out.join("b.png").exists());
    }

    #[tokio::test]
    async fn root_asset_uses_injected_token() {
        let dir = tempfile::tempdir().unwrap();
        let p = page(
            r#"<img src="/"><img src="https://ex.com/">"#,
            "https://ex.com/blog/post",
        );
        let fetcher = site(&[("https://ex.com/", "ROOT")]);
        let result = capture_with_tokens(
            &p,
            dir.path(),
            fetcher,
            &CaptureOptions::default(),
            SequentialTokens::new("seed"),
        )
        .await
        .unwrap();
        assert_eq!(result.summary.succeeded, 2);
        assert!(result
            .outcomes
            .iter()
            .all(|o| o.local_path == "assets/asset-seed0.png"));
        assert_eq!(
            std::fs::read(dir.path().join("assets/asset-seed0.png")).unwrap(),
            b"ROOT"
        );
    }

    #[tokio::test]
    async fn empty_output_dir_is_fatal() {
        let fetcher = site(&[]);
        let err = capture(
            &page("<p></p>", "https://ex.com/"),
            Path::new(""),
            fetcher,
            &CaptureOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CaptureError::MissingInput("output directory")));
    }
}
