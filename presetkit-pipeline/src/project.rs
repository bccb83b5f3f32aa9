use crate::{PresetResult, ResolvePolicy};
use presetkit_base::{AssetPath, PresetNameConvention};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize)]
pub struct ImporterTypeMappingJson {
    pub extension: String,
    pub importer_type: String,
}

#[derive(Serialize, Deserialize)]
pub struct PresetProjectConfigurationJson {
    pub preset_prefix: String,
    pub preset_extension: String,
    pub first_import_policy: ResolvePolicy,
    pub reapply_policy: ResolvePolicy,
    pub importer_types: Vec<ImporterTypeMappingJson>,
}

/// Maps a file extension to the importer type the host assigns to assets with
/// that extension. Consumed by reference hosts; engine-embedded hosts have
/// their own importer typing.
#[derive(Debug, Clone)]
pub struct ImporterTypeMapping {
    pub extension: String,
    pub importer_type: String,
}

#[derive(Debug, Clone)]
pub struct PresetProjectConfiguration {
    // Directory the asset tree is relative to. "Assets/Art/hero.png" lives at
    // <project_root>/Assets/Art/hero.png on disk.
    pub project_root: PathBuf,

    pub convention: PresetNameConvention,

    // Policy used by the automatic first-import apply
    pub first_import_policy: ResolvePolicy,

    // Policy used by the manual folder reapply sweep
    pub reapply_policy: ResolvePolicy,

    pub importer_types: Vec<ImporterTypeMapping>,
}

impl PresetProjectConfiguration {
    /// In-memory configuration with the stock convention and the policies
    /// each operation originally shipped with.
    pub fn new(project_root: PathBuf) -> Self {
        PresetProjectConfiguration {
            project_root,
            convention: PresetNameConvention::default(),
            first_import_policy: ResolvePolicy::SkipIncompatible,
            reapply_policy: ResolvePolicy::NearestCandidates,
            importer_types: Vec::default(),
        }
    }

    /// Maps an absolute filesystem path to a project-relative asset path.
    /// None if the path is not under the project root.
    pub fn asset_path_from_absolute(
        &self,
        path: &Path,
    ) -> Option<AssetPath> {
        path.strip_prefix(&self.project_root)
            .ok()
            .map(|relative| AssetPath::new(&relative.to_string_lossy()))
    }

    pub fn absolute_path(
        &self,
        asset_path: &AssetPath,
    ) -> PathBuf {
        let mut result = self.project_root.clone();
        for component in asset_path.split_components() {
            result.push(component);
        }
        result
    }

    pub fn importer_type_for_extension(
        &self,
        extension: &str,
    ) -> Option<&str> {
        for mapping in &self.importer_types {
            if mapping.extension == extension {
                return Some(&mapping.importer_type);
            }
        }

        None
    }

    pub fn read_from_path(path: &Path) -> PresetResult<Self> {
        let root_path = dunce::canonicalize(
            path.parent()
                .ok_or_else(|| "Parent of project file path could not be found".to_string())?,
        )?;
        let file_contents = std::fs::read_to_string(path)?;
        let project_file: PresetProjectConfigurationJson = serde_json::from_str(&file_contents)?;

        let mut importer_types = Vec::default();
        for mapping in project_file.importer_types {
            importer_types.push(ImporterTypeMapping {
                extension: mapping.extension,
                importer_type: mapping.importer_type,
            });
        }

        Ok(PresetProjectConfiguration {
            project_root: root_path,
            convention: PresetNameConvention::new(
                project_file.preset_prefix,
                project_file.preset_extension,
            ),
            first_import_policy: project_file.first_import_policy,
            reapply_policy: project_file.reapply_policy,
            importer_types,
        })
    }

    pub fn locate_project_file(search_location: &Path) -> PresetResult<Self> {
        let mut path = Some(search_location.to_path_buf());
        while let Some(p) = path {
            let joined_path = p.join("preset_project.json");
            if joined_path.exists() {
                log::info!("Using project configuration at {:?}", joined_path);
                return Self::read_from_path(&joined_path);
            }

            path = p.parent().map(|x| x.to_path_buf());
        }

        Err(format!(
            "preset_project.json could not be located at {:?} or in any of its parent directories",
            search_location
        ))?
    }
}
