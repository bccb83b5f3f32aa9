use crate::PresetResult;
use presetkit_base::{AssetPath, PresetNameConvention};
use uuid::Uuid;

/// Identity of a preset asset, assigned by the host. Folder reapply compares
/// resolved defaults against the requested preset by this id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PresetId(Uuid);

impl PresetId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        PresetId(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

/// Opaque handle to a single asset's import configuration object. The core
/// only feeds it to the compatibility predicate and to the apply/reimport
/// side effects.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ImporterHandle(Uuid);

impl ImporterHandle {
    pub fn from_uuid(uuid: Uuid) -> Self {
        ImporterHandle(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

/// A preset file that matched the naming convention and loaded successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetCandidate {
    pub id: PresetId,
    pub path: AssetPath,
}

/// Directory listing collaborator. This is the only collaborator with a
/// meaningful standalone implementation; see `FileSystemFileSource`.
pub trait PresetFileSource {
    /// Files directly in `directory` whose names satisfy the convention.
    /// Non-recursive. The returned order is the source's enumeration order
    /// and is deliberately not sorted: the first match wins downstream, so
    /// multiple compatible defaults in one directory resolve by enumeration
    /// order. A missing or unreadable directory yields an empty list.
    fn list_matching_files(
        &self,
        directory: &AssetPath,
        convention: &PresetNameConvention,
    ) -> Vec<AssetPath>;

    /// Every file under `subtree_root`, recursively. Directories are not
    /// included.
    fn list_all_files(
        &self,
        subtree_root: &AssetPath,
    ) -> Vec<AssetPath>;
}

/// The host-owned collaborators: preset loading, compatibility, application,
/// and the import-settings lifecycle. Supplied by whatever editor or pipeline
/// embeds the convention; tests use an in-memory implementation.
pub trait ImporterHost {
    fn load_preset(
        &self,
        path: &AssetPath,
    ) -> PresetResult<PresetCandidate>;

    /// Whether the preset may legally be applied to the importer's type.
    fn can_apply_to(
        &self,
        preset: &PresetCandidate,
        importer: ImporterHandle,
    ) -> bool;

    fn apply_preset(
        &self,
        preset: &PresetCandidate,
        importer: ImporterHandle,
    ) -> PresetResult<()>;

    /// None means the file has no importer (non-asset files) and is skipped
    /// during folder reapply.
    fn importer_for_asset(
        &self,
        path: &AssetPath,
    ) -> Option<ImporterHandle>;

    /// True only before the asset's first import; the automatic apply is
    /// gated on this.
    fn import_settings_missing(
        &self,
        importer: ImporterHandle,
    ) -> bool;

    /// Persists the importer's settings and triggers a reimport of the asset.
    fn save_and_reimport(
        &self,
        importer: ImporterHandle,
    ) -> PresetResult<()>;

    /// The preset asset's own location. Folder reapply derives its subtree
    /// root from this rather than taking a root separately.
    fn preset_path(
        &self,
        preset: PresetId,
    ) -> Option<AssetPath>;
}
