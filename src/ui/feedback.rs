//! Reactive clip playback
//!
//! Clips are directories of pre-extracted frame files (decoding happened
//! upstream) presented to a surface at a fixed cadence. Playback is
//! cooperative: it yields between frames so host redraws stay timely
//! instead of blocking for the clip's full duration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::controller::FeedbackPlayer;
use crate::ui::FrameSurface;
use crate::{Error, Result};

/// A single visual frame: encoded image bytes, presented opaquely
#[derive(Debug, Clone)]
pub struct Frame {
    /// Position within the clip, starting at 0
    pub index: usize,
    /// Encoded image bytes
    pub data: Vec<u8>,
}

/// Plays a clip's frame sequence onto a surface at a fixed cadence
///
/// Each `play` starts from the first frame and runs the finite sequence to
/// exhaustion; frames are loaded lazily, one per tick.
pub struct ClipPlayer {
    surface: Arc<dyn FrameSurface>,
    interval: Duration,
}

impl ClipPlayer {
    /// Create a player presenting onto the given surface
    #[must_use]
    pub fn new(surface: Arc<dyn FrameSurface>, interval: Duration) -> Self {
        Self { surface, interval }
    }
}

#[async_trait]
impl FeedbackPlayer for ClipPlayer {
    async fn play(&self, clip: &Path) -> Result<()> {
        let frames = list_frames(clip)?;
        tracing::debug!(clip = %clip.display(), frames = frames.len(), "playing clip");

        let mut ticker = tokio::time::interval(self.interval);
        for (index, path) in frames.iter().enumerate() {
            ticker.tick().await;
            let data = std::fs::read(path)
                .map_err(|e| Error::Playback(format!("frame {}: {e}", path.display())))?;
            self.surface.present_frame(&Frame { index, data });
        }

        Ok(())
    }
}

/// Loop an animation onto a surface until the task is aborted
///
/// Used for the greeting overlay. Fails up front if the directory has no
/// frames; a frame turning unreadable mid-loop stops the animation with a
/// warning rather than killing the host.
pub fn spawn_overlay_loop(
    surface: Arc<dyn FrameSurface>,
    dir: PathBuf,
    interval: Duration,
) -> Result<tokio::task::JoinHandle<()>> {
    let frames = list_frames(&dir)?;
    tracing::debug!(dir = %dir.display(), frames = frames.len(), "overlay animation started");

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            for (index, path) in frames.iter().enumerate() {
                ticker.tick().await;
                match std::fs::read(path) {
                    Ok(data) => surface.present_frame(&Frame { index, data }),
                    Err(e) => {
                        tracing::warn!(error = %e, "overlay frame unreadable, stopping animation");
                        return;
                    }
                }
            }
        }
    });

    Ok(handle)
}

/// List frame files in name order
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::Playback(format!("clip {}: {e}", dir.display())))?;

    let mut frames: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    frames.sort();

    if frames.is_empty() {
        return Err(Error::Playback(format!("no frames in {}", dir.display())));
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingSurface {
        frames: Mutex<Vec<usize>>,
    }

    impl RecordingSurface {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                frames: Mutex::new(Vec::new()),
            })
        }
    }

    impl FrameSurface for RecordingSurface {
        fn present_frame(&self, frame: &Frame) {
            self.frames.lock().unwrap().push(frame.index);
        }
    }

    fn write_frames(dir: &Path, count: usize) {
        for i in 0..count {
            std::fs::write(dir.join(format!("frame_{i:03}.png")), [i as u8]).unwrap();
        }
    }

    #[test]
    fn test_list_frames_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("frame_002.png"), b"b").unwrap();
        std::fs::write(dir.path().join("frame_000.png"), b"a").unwrap();
        std::fs::write(dir.path().join("frame_001.png"), b"c").unwrap();

        let frames = list_frames(dir.path()).unwrap();
        let names: Vec<_> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["frame_000.png", "frame_001.png", "frame_002.png"]);
    }

    #[test]
    fn test_empty_clip_is_playback_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            list_frames(dir.path()),
            Err(crate::Error::Playback(_))
        ));
    }

    #[test]
    fn test_missing_clip_is_playback_error() {
        assert!(matches!(
            list_frames(Path::new("/nonexistent/clip")),
            Err(crate::Error::Playback(_))
        ));
    }

    #[tokio::test]
    async fn test_play_presents_all_frames_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 4);

        let surface = RecordingSurface::new();
        let player = ClipPlayer::new(surface.clone(), Duration::from_millis(1));

        player.play(dir.path()).await.unwrap();

        assert_eq!(*surface.frames.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_play_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 2);

        let surface = RecordingSurface::new();
        let player = ClipPlayer::new(surface.clone(), Duration::from_millis(1));

        player.play(dir.path()).await.unwrap();
        player.play(dir.path()).await.unwrap();

        // Second play starts over from the first frame
        assert_eq!(*surface.frames.lock().unwrap(), vec![0, 1, 0, 1]);
    }
}
