//! Background import of video files into the media library.
//!
//! Each file is probed and thumbnailed on the tokio runtime. Progress and
//! results come back over a channel that the UI drains once per frame.

use crate::error::{EditorError, Result};
use crate::media::{extract_thumbnail, probe_file, FfmpegTools, MediaInfo};
use crate::project::{MediaAsset, Thumbnail, FALLBACK_DURATION};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use uuid::Uuid;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "mov", "webm", "avi", "m4v"];

pub type ImportId = Uuid;

/// Progress checkpoints reported for every import
pub const PROGRESS_QUEUED: f32 = 0.0;
pub const PROGRESS_PROBED: f32 = 0.4;
pub const PROGRESS_THUMBNAIL: f32 = 0.8;
pub const PROGRESS_DONE: f32 = 1.0;

#[derive(Debug, Clone)]
pub enum ImportEvent {
    Started { id: ImportId, name: String },
    Progress { id: ImportId, fraction: f32 },
    Finished { id: ImportId, asset: MediaAsset },
    Failed { id: ImportId, name: String, error: String },
}

#[cfg(test)]
impl ImportEvent {
    pub fn id(&self) -> ImportId {
        match self {
            ImportEvent::Started { id, .. }
            | ImportEvent::Progress { id, .. }
            | ImportEvent::Finished { id, .. }
            | ImportEvent::Failed { id, .. } => *id,
        }
    }
}

pub fn is_supported_video(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

pub struct Importer {
    runtime: Runtime,
    tools: FfmpegTools,
    thumbnail_time: f64,
    tx: Sender<ImportEvent>,
    rx: Receiver<ImportEvent>,
}

impl Importer {
    pub fn new(tools: FfmpegTools, thumbnail_time: f64) -> Result<Self> {
        let runtime = Runtime::new()?;
        let (tx, rx) = unbounded();
        Ok(Self {
            runtime,
            tools,
            thumbnail_time,
            tx,
            rx,
        })
    }

    /// Queue one file. Unsupported extensions are rejected before any work starts.
    pub fn import(&self, path: PathBuf) -> Result<ImportId> {
        if !is_supported_video(&path) {
            return Err(EditorError::UnsupportedFile(path));
        }

        let id = Uuid::new_v4();
        let name = MediaAsset::filename(&path);
        log::info!("Importing {}", path.display());
        // Receiver lives as long as self, so sends cannot fail here
        let _ = self.tx.send(ImportEvent::Started { id, name: name.clone() });
        let _ = self.tx.send(ImportEvent::Progress {
            id,
            fraction: PROGRESS_QUEUED,
        });

        let tx = self.tx.clone();
        let tools = self.tools.clone();
        let thumbnail_time = self.thumbnail_time;
        self.runtime.spawn(async move {
            let event = match run_import(id, path, tools, thumbnail_time, &tx).await {
                Ok(asset) => {
                    log::info!("Imported {} ({:.2}s)", asset.name, asset.duration);
                    ImportEvent::Finished { id, asset }
                }
                Err(e) => {
                    log::error!("Import of {} failed: {}", name, e);
                    ImportEvent::Failed {
                        id,
                        name,
                        error: e.to_string(),
                    }
                }
            };
            let _ = tx.send(event);
        });

        Ok(id)
    }

    /// All events received since the last poll
    pub fn poll(&self) -> Vec<ImportEvent> {
        self.rx.try_iter().collect()
    }
}

async fn run_import(
    id: ImportId,
    path: PathBuf,
    tools: FfmpegTools,
    thumbnail_time: f64,
    tx: &Sender<ImportEvent>,
) -> Result<MediaAsset> {
    // A missing or unreadable file fails the whole import
    let metadata = tokio::fs::metadata(&path).await?;
    if !metadata.is_file() {
        return Err(EditorError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not a file", path.display()),
        )));
    }

    let probe_path = path.clone();
    let probe_tools = tools.clone();
    let probed = tokio::task::spawn_blocking(move || probe_file(&probe_tools, &probe_path))
        .await
        .map_err(|e| EditorError::Probe(e.to_string()))?;
    let _ = tx.send(ImportEvent::Progress {
        id,
        fraction: PROGRESS_PROBED,
    });

    let thumbnail = match &probed {
        Ok(info) if info.has_video() => {
            if !info.has_audio() {
                log::info!("{} has no audio track", path.display());
            }
            let info = info.clone();
            let thumb_path = path.clone();
            tokio::task::spawn_blocking(move || {
                extract_thumbnail(&tools, &thumb_path, &info, thumbnail_time)
            })
            .await
            .map_err(|e| EditorError::ThumbnailExtraction(e.to_string()))
            .and_then(|r| r)
        }
        Ok(_) => {
            log::warn!("{} has no video stream", path.display());
            Ok(Thumbnail::Placeholder)
        }
        Err(_) => Ok(Thumbnail::Placeholder),
    };
    let _ = tx.send(ImportEvent::Progress {
        id,
        fraction: PROGRESS_THUMBNAIL,
    });

    let asset = build_asset(&path, metadata.len(), probed, thumbnail);
    let _ = tx.send(ImportEvent::Progress {
        id,
        fraction: PROGRESS_DONE,
    });
    Ok(asset)
}

/// Assemble the asset, degrading gracefully when probing or thumbnailing failed
pub fn build_asset(
    path: &Path,
    byte_size: u64,
    probed: Result<MediaInfo>,
    thumbnail: Result<Thumbnail>,
) -> MediaAsset {
    let (info, decode_ok) = match probed {
        Ok(info) => (info, true),
        Err(e) => {
            log::warn!(
                "Could not probe {}: {}; assuming {}s",
                path.display(),
                e,
                FALLBACK_DURATION
            );
            (
                MediaInfo {
                    duration: FALLBACK_DURATION,
                    ..MediaInfo::default()
                },
                false,
            )
        }
    };
    let thumbnail = thumbnail.unwrap_or_else(|e| {
        log::warn!("{}: {}", path.display(), e);
        Thumbnail::Placeholder
    });

    MediaAsset {
        id: Uuid::new_v4(),
        name: MediaAsset::filename(path),
        path: path.to_path_buf(),
        duration: info.duration,
        byte_size,
        width: info.width,
        height: info.height,
        thumbnail,
        decode_ok,
    }
}
