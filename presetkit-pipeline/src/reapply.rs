use crate::{
    DefaultPresetResolver, ImporterHost, PresetFileSource, PresetId, PresetProjectConfiguration,
    PresetResult,
};
use crossbeam_channel::Sender;
use presetkit_base::AssetPath;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

#[derive(Debug, Copy, Clone)]
pub enum LogEventLevel {
    Warning,
    Error,
}

#[derive(Debug)]
pub struct ReapplyLogEvent {
    pub path: AssetPath,
    pub level: LogEventLevel,
    pub message: String,
}

pub struct ReapplyLogData {
    pub(crate) id: Uuid,
    pub(crate) start_instant: std::time::Instant,
    pub(crate) end_instant: Option<std::time::Instant>,
    pub log_events: Vec<ReapplyLogEvent>,
}

impl ReapplyLogData {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn log_events(&self) -> &[ReapplyLogEvent] {
        &self.log_events
    }

    pub fn duration(&self) -> Option<std::time::Duration> {
        self.end_instant
            .map(|end_instant| end_instant - self.start_instant)
    }
}

impl Default for ReapplyLogData {
    fn default() -> Self {
        ReapplyLogData {
            id: Uuid::new_v4(),
            start_instant: std::time::Instant::now(),
            end_instant: None,
            log_events: vec![],
        }
    }
}

/// Sent once per enumerated file so an embedding UI can show sweep progress.
#[derive(Debug, Clone)]
pub struct ReapplyProgress {
    pub current_file: AssetPath,
    pub files_processed: usize,
    pub total_files: usize,
}

pub struct ReapplyOutcome {
    /// Assets the preset was applied to, in sweep order
    pub applied: Vec<AssetPath>,
    pub scanned_file_count: usize,
    pub cancelled: bool,
    pub log_data: ReapplyLogData,
}

/// Walks every file under the preset's own folder and reapplies the preset to
/// each asset for which it is the resolved default. The subtree root comes
/// from the preset's location; the resolution policy comes from the project
/// configuration.
///
/// The sweep is a single synchronous pass on the calling thread. It does not
/// stop on per-asset failures (there is no rollback for already-reimported
/// assets anyway); failures are recorded as log events. Cancellation is
/// checked between files, so at most the in-flight asset completes after
/// `cancel_requested` is set.
pub fn reapply_to_folder(
    preset_id: PresetId,
    file_source: &dyn PresetFileSource,
    host: &dyn ImporterHost,
    project: &PresetProjectConfiguration,
    cancel_requested: &AtomicBool,
    progress_tx: Option<&Sender<ReapplyProgress>>,
) -> PresetResult<ReapplyOutcome> {
    profiling::scope!("Reapply default preset to folder");

    let preset_path = host
        .preset_path(preset_id)
        .ok_or_else(|| format!("Preset {:?} has no asset path", preset_id))?;
    let subtree_root = preset_path
        .parent()
        .ok_or_else(|| format!("Preset {} has no containing folder", preset_path))?;

    let files = file_source.list_all_files(&subtree_root);
    let total_files = files.len();
    log::info!(
        "Reapplying default preset {} to {} files under {}",
        preset_path,
        total_files,
        subtree_root
    );

    let resolver = DefaultPresetResolver::new(file_source, host, project);
    let mut log_data = ReapplyLogData::default();
    let mut applied = Vec::default();
    let mut scanned_file_count = 0;
    let mut cancelled = false;

    for file in files {
        if cancel_requested.load(Ordering::Relaxed) {
            log::info!("Reapply cancelled after {} files", scanned_file_count);
            cancelled = true;
            break;
        }

        scanned_file_count += 1;

        if let Some(importer) = host.importer_for_asset(&file) {
            let directory = match file.parent() {
                Some(directory) => directory,
                None => continue,
            };

            let resolved = resolver.resolve_default(&directory, importer, project.reapply_policy);
            if let Some(resolved) = resolved {
                if resolved.id == preset_id {
                    let result = host
                        .apply_preset(&resolved, importer)
                        .and_then(|_| host.save_and_reimport(importer));
                    match result {
                        Ok(()) => applied.push(file.clone()),
                        Err(e) => {
                            log::warn!("Failed to reapply preset to {}: {}", file, e);
                            log_data.log_events.push(ReapplyLogEvent {
                                path: file.clone(),
                                level: LogEventLevel::Error,
                                message: format!("Failed to reapply preset: {}", e),
                            });
                        }
                    }
                }
            }
        }

        if let Some(progress_tx) = progress_tx {
            // The receiver may be gone if the embedder stopped listening
            let _ = progress_tx.send(ReapplyProgress {
                current_file: file,
                files_processed: scanned_file_count,
                total_files,
            });
        }
    }

    log_data.end_instant = Some(std::time::Instant::now());
    log::info!(
        "Reapplied default preset {} to {} of {} files",
        preset_path,
        applied.len(),
        total_files
    );

    Ok(ReapplyOutcome {
        applied,
        scanned_file_count,
        cancelled,
        log_data,
    })
}
