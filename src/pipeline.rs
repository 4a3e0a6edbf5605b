use std::future::Future;
use std::time::Duration;

use eyre::{Report, bail, eyre};
use log::{debug, info, warn};
use serde::Serialize;

use crate::normalize::Normalizer;
use crate::select::TrackSelector;
use crate::service::{CaptionService, MetadataService};
use crate::youtube::YouTube;
use crate::{CaptionCue, CaptionTrack, VideoId, VideoMetadata, extract_video_id};

/// Why an extraction produced no text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    InvalidUrl,
    NoTracksAvailable,
    FetchFailed,
    EmptyResult,
    ServiceUnavailable,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::InvalidUrl => write!(f, "invalid URL"),
            FailureReason::NoTracksAvailable => write!(f, "no caption tracks available"),
            FailureReason::FetchFailed => write!(f, "caption fetch failed"),
            FailureReason::EmptyResult => write!(f, "captions contained no speech"),
            FailureReason::ServiceUnavailable => write!(f, "caption service unavailable"),
        }
    }
}

/// Terminal failure of one extraction, with the raw detail of the cause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub reason: FailureReason,
    pub detail: String,
}

impl Failure {
    pub fn new(reason: FailureReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.reason, self.detail)
    }
}

impl std::error::Error for Failure {}

/// Successful extraction. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub text: String,
    pub metadata: VideoMetadata,
    /// Cues fetched before any filtering
    pub cue_count: usize,
    pub track: CaptionTrack,
}

pub type ExtractionResult = std::result::Result<Extraction, Failure>;

/// How cues are obtained for the selected track, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchStrategy {
    Direct,
    Translated,
}

impl FetchStrategy {
    const ORDER: [FetchStrategy; 2] = [FetchStrategy::Direct, FetchStrategy::Translated];
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStrategy::Direct => write!(f, "direct"),
            FetchStrategy::Translated => write!(f, "translated"),
        }
    }
}

/// URL in, clean caption text out
pub struct Extractor {
    captions: Box<dyn CaptionService>,
    metadata: Box<dyn MetadataService>,
    selector: TrackSelector,
    normalizer: Normalizer,
    timeout: Option<Duration>,
}

impl Extractor {
    pub fn new(captions: impl CaptionService + 'static, metadata: impl MetadataService + 'static) -> Self {
        Self {
            captions: Box::new(captions),
            metadata: Box::new(metadata),
            selector: TrackSelector::default(),
            normalizer: Normalizer::default(),
            timeout: None,
        }
    }

    /// Extractor backed by YouTube for both captions and metadata
    pub fn youtube(youtube: YouTube) -> Self {
        Self::new(youtube.clone(), youtube)
    }

    pub fn with_selector(mut self, selector: TrackSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Bound every outbound call; an elapsed call fails as a service error
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run one extraction. Every failure comes back as a `Failure`.
    pub async fn extract(&self, url: &str) -> ExtractionResult {
        let Some(video_id) = extract_video_id(url) else {
            return Err(Failure::new(
                FailureReason::InvalidUrl,
                format!("no video ID found in {:?}", url.trim()),
            ));
        };
        info!("Extracting captions for video {video_id}");

        // Metadata never fails, so it cannot cut the caption branch short.
        let (metadata, captions) = tokio::join!(self.resolve_metadata(&video_id), self.fetch_captions(&video_id));
        let (track, cues) = captions?;

        let text = self.normalizer.normalize(&cues);
        if text.is_empty() {
            return Err(Failure::new(
                FailureReason::EmptyResult,
                format!("{} cues from track {track} contained no speech", cues.len()),
            ));
        }

        info!("Extracted {} characters from {} cues ({track})", text.len(), cues.len());
        Ok(Extraction {
            text,
            metadata,
            cue_count: cues.len(),
            track,
        })
    }

    async fn resolve_metadata(&self, video_id: &VideoId) -> VideoMetadata {
        match self.bounded(self.metadata.fetch_metadata(video_id)).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Metadata lookup for {video_id} failed, using placeholders: {e:#}");
                VideoMetadata::placeholder(video_id)
            }
        }
    }

    async fn fetch_captions(&self, video_id: &VideoId) -> Result<(CaptionTrack, Vec<CaptionCue>), Failure> {
        let tracks = self
            .bounded(self.captions.list_tracks(video_id))
            .await
            .map_err(|e| classify(FailureReason::NoTracksAvailable, &[e]))?;

        let Some(track) = self.selector.select(&tracks) else {
            return Err(Failure::new(
                FailureReason::NoTracksAvailable,
                format!("No transcripts found for video {video_id}"),
            ));
        };

        let mut errors = Vec::new();
        for strategy in FetchStrategy::ORDER {
            match self.attempt(strategy, video_id, track).await {
                Some(Ok(hit)) => return Ok(hit),
                Some(Err(e)) => {
                    warn!("{strategy} fetch for {video_id} failed: {e:#}");
                    errors.push(e);
                }
                None => debug!("Skipping {strategy} fetch for track {track}"),
            }
        }

        Err(classify(FailureReason::FetchFailed, &errors))
    }

    /// `None` when the strategy does not apply to this track
    async fn attempt(
        &self,
        strategy: FetchStrategy,
        video_id: &VideoId,
        track: &CaptionTrack,
    ) -> Option<eyre::Result<(CaptionTrack, Vec<CaptionCue>)>> {
        let candidate = match strategy {
            FetchStrategy::Direct => track.clone(),
            FetchStrategy::Translated => {
                let target = &self.selector.policy().translate_to;
                if !track.is_translatable || track.language_code == *target {
                    return None;
                }
                match self.bounded(self.captions.translate(track, target)).await {
                    Ok(translated) => translated,
                    Err(e) => return Some(Err(e.wrap_err(format!("translating {track} to {target}")))),
                }
            }
        };

        let result = self.fetch_cues(video_id, &candidate).await;
        Some(result.map(|cues| (candidate, cues)))
    }

    async fn fetch_cues(&self, video_id: &VideoId, track: &CaptionTrack) -> eyre::Result<Vec<CaptionCue>> {
        let cues = self.bounded(self.captions.fetch_cues(video_id, track)).await?;
        if cues.is_empty() {
            bail!("track {track} returned no cues");
        }
        debug!("Fetched {} cues from track {track}", cues.len());
        Ok(cues)
    }

    async fn bounded<T>(&self, call: impl Future<Output = eyre::Result<T>>) -> eyre::Result<T> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| eyre!("request timed out after {limit:?}"))?,
            None => call.await,
        }
    }
}

const TRANSPORT_MARKERS: [&str; 3] = ["Connection", "Network", "timed out"];

fn is_transport_error(err: &Report) -> bool {
    reqwest_transport(err) || mentions_transport(err)
}

/// A reqwest connect, timeout or request failure anywhere in the chain
fn reqwest_transport(err: &Report) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<reqwest::Error>())
        .any(|e| e.is_connect() || e.is_timeout() || e.is_request())
}

fn mentions_transport(err: &Report) -> bool {
    let detail = format!("{err:#}");
    TRANSPORT_MARKERS.iter().any(|m| detail.contains(m))
}

fn classify(fallback: FailureReason, errors: &[Report]) -> Failure {
    let reason = if errors.iter().any(is_transport_error) {
        FailureReason::ServiceUnavailable
    } else {
        fallback
    };
    let detail = errors.iter().map(|e| format!("{e:#}")).collect::<Vec<_>>().join("; ");
    Failure::new(reason, detail)
}
