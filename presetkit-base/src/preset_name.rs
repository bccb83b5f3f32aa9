use crate::AssetPath;

/// The naming rule that marks a preset file as a directory default, e.g.
/// "Default_TextureImporter.preset". The prefix is both the discovery
/// mechanism and the user-visible marker the manual commands are gated on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetNameConvention {
    prefix: String,
    extension: String,
}

impl Default for PresetNameConvention {
    fn default() -> Self {
        PresetNameConvention {
            prefix: "Default_".to_string(),
            extension: "preset".to_string(),
        }
    }
}

impl PresetNameConvention {
    pub fn new(
        prefix: String,
        extension: String,
    ) -> Self {
        PresetNameConvention { prefix, extension }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn matches_file_name(
        &self,
        file_name: &str,
    ) -> bool {
        let suffix = match file_name.rfind('.') {
            Some(index) => &file_name[index + 1..],
            None => return false,
        };

        file_name.starts_with(&self.prefix) && suffix == self.extension
    }

    pub fn matches(
        &self,
        path: &AssetPath,
    ) -> bool {
        self.matches_file_name(path.file_name())
    }

    /// Gate for the manual commands: the selected preset's name has to carry
    /// the marker prefix, extension aside.
    pub fn is_default_preset_name(
        &self,
        name: &str,
    ) -> bool {
        name.starts_with(&self.prefix)
    }

    /// Pattern suitable for a non-recursive directory probe, e.g.
    /// "Default_*.preset".
    pub fn glob_pattern(&self) -> String {
        format!("{}*.{}", self.prefix, self.extension)
    }
}
