use async_trait::async_trait;
use eyre::Result;

use crate::{CaptionCue, CaptionTrack, VideoId, VideoMetadata};

/// Caption side of the platform
#[async_trait]
pub trait CaptionService: Send + Sync {
    /// Tracks the video advertises, in platform enumeration order
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>>;

    /// Cues of one track, in chronological order
    async fn fetch_cues(&self, video_id: &VideoId, track: &CaptionTrack) -> Result<Vec<CaptionCue>>;

    /// Descriptor for `track` machine translated into `target`
    async fn translate(&self, track: &CaptionTrack, target: &str) -> Result<CaptionTrack>;
}

/// Display metadata lookup
#[async_trait]
pub trait MetadataService: Send + Sync {
    async fn fetch_metadata(&self, video_id: &VideoId) -> Result<VideoMetadata>;
}
