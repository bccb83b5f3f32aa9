use presetkit_pipeline::hashing::HashMap;
use presetkit_pipeline::{
    AssetPath, FileSystemFileSource, ImporterHandle, ImporterHost, PresetCandidate,
    PresetFileSource, PresetId, PresetProjectConfiguration, PresetResult,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::PathBuf;
use uuid::Uuid;

const SIDECAR_SUFFIX: &str = ".import.json";

#[derive(Serialize, Deserialize)]
struct PresetFileJson {
    id: Uuid,
    target_type: String,
}

#[derive(Serialize, Deserialize)]
struct ImportSettingsJson {
    preset_id: Uuid,
    target_type: String,
    revision: u64,
}

/// Reference `ImporterHost` that keeps import settings in
/// `<asset>.import.json` sidecar files next to each asset. Preset files are
/// JSON bodies carrying their identity and the importer type they target; an
/// asset's importer type comes from the project's extension table. Engine
/// embeddings supply their own host instead of this one.
pub struct SidecarHost {
    project: PresetProjectConfiguration,
    known_importers: RefCell<HashMap<ImporterHandle, AssetPath>>,
}

impl SidecarHost {
    pub fn new(project: PresetProjectConfiguration) -> Self {
        SidecarHost {
            project,
            known_importers: RefCell::new(HashMap::default()),
        }
    }

    fn sidecar_path(
        &self,
        asset: &AssetPath,
    ) -> PathBuf {
        let mut absolute = self.project.absolute_path(asset);
        absolute.set_file_name(format!("{}{}", asset.file_name(), SIDECAR_SUFFIX));
        absolute
    }

    fn asset_for(
        &self,
        importer: ImporterHandle,
    ) -> PresetResult<AssetPath> {
        self.known_importers
            .borrow()
            .get(&importer)
            .cloned()
            .ok_or_else(|| format!("Unknown importer handle {:?}", importer).into())
    }

    fn importer_type_of(
        &self,
        asset: &AssetPath,
    ) -> Option<&str> {
        let file_name = asset.file_name();
        let extension = file_name.rfind('.').map(|index| &file_name[index + 1..])?;
        self.project.importer_type_for_extension(extension)
    }

    fn read_preset(
        &self,
        path: &AssetPath,
    ) -> PresetResult<PresetFileJson> {
        let contents = std::fs::read_to_string(self.project.absolute_path(path))?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl ImporterHost for SidecarHost {
    fn load_preset(
        &self,
        path: &AssetPath,
    ) -> PresetResult<PresetCandidate> {
        let preset = self.read_preset(path)?;
        Ok(PresetCandidate {
            id: PresetId::from_uuid(preset.id),
            path: path.clone(),
        })
    }

    fn can_apply_to(
        &self,
        preset: &PresetCandidate,
        importer: ImporterHandle,
    ) -> bool {
        let asset = match self.known_importers.borrow().get(&importer).cloned() {
            Some(asset) => asset,
            None => return false,
        };
        let importer_type = match self.importer_type_of(&asset) {
            Some(importer_type) => importer_type.to_string(),
            None => return false,
        };

        match self.read_preset(&preset.path) {
            Ok(json) => json.target_type == importer_type,
            Err(e) => {
                log::warn!("Could not read preset {}: {}", preset.path, e);
                false
            }
        }
    }

    fn apply_preset(
        &self,
        preset: &PresetCandidate,
        importer: ImporterHandle,
    ) -> PresetResult<()> {
        let asset = self.asset_for(importer)?;
        let preset_file = self.read_preset(&preset.path)?;

        // Keep the revision of any settings being overwritten; reimport is
        // what bumps it
        let sidecar = self.sidecar_path(&asset);
        let revision = match std::fs::read_to_string(&sidecar) {
            Ok(contents) => serde_json::from_str::<ImportSettingsJson>(&contents)
                .map(|settings| settings.revision)
                .unwrap_or(0),
            Err(_) => 0,
        };

        let settings = ImportSettingsJson {
            preset_id: preset.id.as_uuid(),
            target_type: preset_file.target_type,
            revision,
        };
        std::fs::write(&sidecar, serde_json::to_string_pretty(&settings)?)?;
        Ok(())
    }

    fn importer_for_asset(
        &self,
        path: &AssetPath,
    ) -> Option<ImporterHandle> {
        if path.file_name().ends_with(SIDECAR_SUFFIX) {
            return None;
        }

        self.importer_type_of(path)?;

        // Handles are stable per path so repeated lookups agree
        let handle = ImporterHandle::from_uuid(Uuid::new_v5(
            &Uuid::NAMESPACE_OID,
            path.as_str().as_bytes(),
        ));
        self.known_importers.borrow_mut().insert(handle, path.clone());
        Some(handle)
    }

    fn import_settings_missing(
        &self,
        importer: ImporterHandle,
    ) -> bool {
        match self.known_importers.borrow().get(&importer) {
            Some(asset) => !self.sidecar_path(asset).exists(),
            None => false,
        }
    }

    fn save_and_reimport(
        &self,
        importer: ImporterHandle,
    ) -> PresetResult<()> {
        let asset = self.asset_for(importer)?;
        let sidecar = self.sidecar_path(&asset);
        let contents = std::fs::read_to_string(&sidecar)
            .map_err(|_| format!("{} has no import settings to save", asset))?;
        let mut settings: ImportSettingsJson = serde_json::from_str(&contents)?;
        settings.revision += 1;
        std::fs::write(&sidecar, serde_json::to_string_pretty(&settings)?)?;
        log::info!("Reimported {}", asset);
        Ok(())
    }

    fn preset_path(
        &self,
        preset: PresetId,
    ) -> Option<AssetPath> {
        let file_source = FileSystemFileSource::new(self.project.project_root.clone());
        let suffix = format!(".{}", self.project.convention.extension());
        for path in file_source.list_all_files(&AssetPath::new("")) {
            if !path.file_name().ends_with(&suffix) {
                continue;
            }

            if let Ok(candidate) = self.load_preset(&path) {
                if candidate.id == preset {
                    return Some(path);
                }
            }
        }

        None
    }
}
