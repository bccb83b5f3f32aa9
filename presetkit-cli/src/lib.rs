use presetkit_pipeline::{
    reapply_to_folder, AssetPath, DefaultPresetResolver, FileSystemFileSource, ImporterHost,
    LogEventLevel, PresetError, PresetProjectConfiguration, PresetResult, ReapplyProgress,
    ResolvePolicy,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use structopt::StructOpt;

mod sidecar_host;
pub use sidecar_host::SidecarHost;

#[derive(StructOpt, Debug)]
pub struct PresetKitArgs {
    /// Path to preset_project.json; located by searching upward from the
    /// current directory when not given
    #[structopt(name = "project-file", long, parse(from_os_str))]
    pub project_file: Option<PathBuf>,

    #[structopt(subcommand)]
    pub command: PresetKitCommand,
}

#[derive(StructOpt, Debug)]
pub enum PresetKitCommand {
    /// Reapply a default preset to every asset under its folder for which it
    /// is the resolved default
    Reapply {
        #[structopt(name = "preset", long, parse(from_os_str))]
        preset: PathBuf,
    },
    /// Show which default preset an asset would receive, without applying it
    Resolve {
        #[structopt(name = "asset", long, parse(from_os_str))]
        asset: PathBuf,
        #[structopt(name = "policy", long)]
        policy: Option<ResolvePolicy>,
    },
}

pub fn run(args: &PresetKitArgs) -> PresetResult<()> {
    let project = match &args.project_file {
        Some(path) => PresetProjectConfiguration::read_from_path(path)?,
        None => PresetProjectConfiguration::locate_project_file(&std::env::current_dir()?)?,
    };

    match &args.command {
        PresetKitCommand::Reapply { preset } => reapply(&project, preset),
        PresetKitCommand::Resolve { asset, policy } => resolve(&project, asset, *policy),
    }
}

fn asset_path_for_argument(
    project: &PresetProjectConfiguration,
    path: &Path,
) -> PresetResult<AssetPath> {
    let absolute = dunce::canonicalize(path)?;
    project.asset_path_from_absolute(&absolute).ok_or_else(|| {
        PresetError::from(format!(
            "{:?} is not under the project root {:?}",
            path, project.project_root
        ))
    })
}

fn reapply(
    project: &PresetProjectConfiguration,
    preset: &Path,
) -> PresetResult<()> {
    let preset_path = asset_path_for_argument(project, preset)?;

    // Same gate as the editor menu entry: only presets carrying the marker
    // name offer the folder-wide reapply
    if !project.convention.matches(&preset_path) {
        Err(format!(
            "{} is not a default preset (expected a name like {})",
            preset_path,
            project.convention.glob_pattern()
        ))?;
    }

    let file_source = FileSystemFileSource::new(project.project_root.clone());
    let host = SidecarHost::new(project.clone());
    let preset_id = host.load_preset(&preset_path)?.id;

    let cancel_requested = Arc::new(AtomicBool::new(false));
    {
        let cancel_requested = cancel_requested.clone();
        ctrlc::set_handler(move || cancel_requested.store(true, Ordering::Relaxed))
            .map_err(|e| format!("Could not install the interrupt handler: {}", e))?;
    }

    let (progress_tx, progress_rx) = crossbeam_channel::unbounded::<ReapplyProgress>();
    let progress_thread = std::thread::spawn(move || {
        for progress in progress_rx {
            log::debug!(
                "[{}/{}] {}",
                progress.files_processed,
                progress.total_files,
                progress.current_file
            );
        }
    });

    let outcome = reapply_to_folder(
        preset_id,
        &file_source,
        &host,
        project,
        &cancel_requested,
        Some(&progress_tx),
    );
    drop(progress_tx);
    let _ = progress_thread.join();
    let outcome = outcome?;

    for event in outcome.log_data.log_events() {
        match event.level {
            LogEventLevel::Warning => log::warn!("{}: {}", event.path, event.message),
            LogEventLevel::Error => log::error!("{}: {}", event.path, event.message),
        }
    }

    if outcome.cancelled {
        println!("Cancelled after {} files", outcome.scanned_file_count);
    }

    println!("Applied {} to {} assets", preset_path, outcome.applied.len());
    for path in &outcome.applied {
        println!("  {}", path);
    }

    Ok(())
}

fn resolve(
    project: &PresetProjectConfiguration,
    asset: &Path,
    policy: Option<ResolvePolicy>,
) -> PresetResult<()> {
    let asset_path = asset_path_for_argument(project, asset)?;
    let file_source = FileSystemFileSource::new(project.project_root.clone());
    let host = SidecarHost::new(project.clone());

    let importer = host.importer_for_asset(&asset_path).ok_or_else(|| {
        PresetError::from(format!("No importer is associated with {}", asset_path))
    })?;
    let directory = asset_path.parent().ok_or_else(|| {
        PresetError::from(format!("{} has no containing folder", asset_path))
    })?;

    let resolver = DefaultPresetResolver::new(&file_source, &host, project);
    let policy = policy.unwrap_or(project.first_import_policy);
    match resolver.resolve_default(&directory, importer, policy) {
        Some(found) => println!("{} resolves to {}", asset_path, found.path),
        None => println!("{} has no default preset", asset_path),
    }

    Ok(())
}
