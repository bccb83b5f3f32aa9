use crate::PresetFileSource;
use presetkit_base::{AssetPath, PresetNameConvention};
use std::path::{Path, PathBuf};

/// `PresetFileSource` over a real directory tree rooted at the project root.
/// Asset paths map to `<project_root>/<asset path>` on disk. Listing order is
/// whatever the filesystem enumerates, unsorted.
pub struct FileSystemFileSource {
    project_root: PathBuf,
}

impl FileSystemFileSource {
    pub fn new(project_root: PathBuf) -> Self {
        FileSystemFileSource { project_root }
    }

    fn absolute_path(
        &self,
        asset_path: &AssetPath,
    ) -> PathBuf {
        let mut result = self.project_root.clone();
        for component in asset_path.split_components() {
            result.push(component);
        }
        result
    }

    fn asset_path_for(
        &self,
        path: &Path,
    ) -> Option<AssetPath> {
        path.strip_prefix(&self.project_root)
            .ok()
            .map(|relative| AssetPath::new(&relative.to_string_lossy()))
    }

    fn walk(
        &self,
        directory: &AssetPath,
        pattern: &str,
        max_depth: Option<usize>,
    ) -> Vec<AssetPath> {
        let absolute = self.absolute_path(directory);
        if !absolute.is_dir() {
            // Missing or unreadable directories are "no candidates here"
            return Vec::default();
        }

        let mut builder = globwalk::GlobWalkerBuilder::from_patterns(&absolute, &[pattern])
            .file_type(globwalk::FileType::FILE);
        if let Some(max_depth) = max_depth {
            builder = builder.max_depth(max_depth);
        }

        let walker = match builder.build() {
            Ok(walker) => walker,
            Err(e) => {
                log::warn!("Could not walk {:?} with pattern {:?}: {}", absolute, pattern, e);
                return Vec::default();
            }
        };

        let mut results = Vec::default();
        for file in walker {
            if let Ok(file) = file {
                if let Some(asset_path) = self.asset_path_for(file.path()) {
                    results.push(asset_path);
                }
            }
        }

        results
    }
}

impl PresetFileSource for FileSystemFileSource {
    fn list_matching_files(
        &self,
        directory: &AssetPath,
        convention: &PresetNameConvention,
    ) -> Vec<AssetPath> {
        self.walk(directory, &convention.glob_pattern(), Some(1))
    }

    fn list_all_files(
        &self,
        subtree_root: &AssetPath,
    ) -> Vec<AssetPath> {
        profiling::scope!("List files for reapply sweep");
        self.walk(subtree_root, "**", None)
    }
}
