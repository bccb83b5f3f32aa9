use crate::{
    ImporterHandle, ImporterHost, PresetCandidate, PresetFileSource, PresetProjectConfiguration,
    PresetResult,
};
use presetkit_base::AssetPath;
use serde::{Deserialize, Serialize};

/// How the upward walk treats a directory whose candidates are all
/// incompatible with the importer: `SkipIncompatible` keeps walking past it,
/// while `NearestCandidates` stops there and hands back its first candidate
/// regardless of compatibility. The project file picks one per operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvePolicy {
    SkipIncompatible,
    NearestCandidates,
}

impl std::str::FromStr for ResolvePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip-incompatible" => Ok(ResolvePolicy::SkipIncompatible),
            "nearest-candidates" => Ok(ResolvePolicy::NearestCandidates),
            _ => Err(format!(
                "Unknown resolve policy {:?}, expected skip-incompatible or nearest-candidates",
                s
            )),
        }
    }
}

/// Finds the nearest applicable default preset for an asset by probing the
/// asset's directory and then each ancestor in turn, stopping at the project
/// root. Stateless: every call re-reads the tree, nothing is cached.
pub struct DefaultPresetResolver<'a> {
    file_source: &'a dyn PresetFileSource,
    host: &'a dyn ImporterHost,
    project: &'a PresetProjectConfiguration,
}

impl<'a> DefaultPresetResolver<'a> {
    pub fn new(
        file_source: &'a dyn PresetFileSource,
        host: &'a dyn ImporterHost,
        project: &'a PresetProjectConfiguration,
    ) -> Self {
        DefaultPresetResolver {
            file_source,
            host,
            project,
        }
    }

    /// Walks from `asset_directory` up to the root, returning the first
    /// candidate selected by `policy`. None means no directory on the walk
    /// produced a selection.
    pub fn resolve_default(
        &self,
        asset_directory: &AssetPath,
        importer: ImporterHandle,
        policy: ResolvePolicy,
    ) -> Option<PresetCandidate> {
        let mut current = asset_directory.clone();
        loop {
            if let Some(found) = self.resolve_in_directory(&current, importer, policy) {
                return Some(found);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    fn resolve_in_directory(
        &self,
        directory: &AssetPath,
        importer: ImporterHandle,
        policy: ResolvePolicy,
    ) -> Option<PresetCandidate> {
        let candidate_paths = self
            .file_source
            .list_matching_files(directory, &self.project.convention);

        for candidate_path in candidate_paths {
            let candidate = match self.host.load_preset(&candidate_path) {
                Ok(candidate) => candidate,
                Err(e) => {
                    // A candidate that matched the glob but won't load is
                    // treated as absent rather than aborting the walk
                    log::warn!("Skipping unloadable preset {}: {}", candidate_path, e);
                    continue;
                }
            };

            match policy {
                ResolvePolicy::SkipIncompatible => {
                    if self.host.can_apply_to(&candidate, importer) {
                        return Some(candidate);
                    }
                }
                ResolvePolicy::NearestCandidates => return Some(candidate),
            }
        }

        None
    }

    /// First-import entry point: does nothing unless the host reports the
    /// asset has never been imported, which makes reimports of an already
    /// configured asset no-ops. Returns whether a preset was applied.
    pub fn apply_if_missing(
        &self,
        importer: ImporterHandle,
        asset_path: &AssetPath,
    ) -> PresetResult<bool> {
        if !self.host.import_settings_missing(importer) {
            return Ok(false);
        }

        let directory = match asset_path.parent() {
            Some(directory) => directory,
            None => return Ok(false),
        };

        let policy = self.project.first_import_policy;
        if let Some(found) = self.resolve_default(&directory, importer, policy) {
            self.host.apply_preset(&found, importer)?;
            log::info!("Applied default preset {} to {}", found.path, asset_path);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
