use crate::{
    DefaultPresetResolver, ImporterHandle, ImporterHost, PresetFileSource,
    PresetProjectConfiguration, PresetResult,
};
use presetkit_base::AssetPath;
use std::sync::Arc;

/// Everything a preprocess handler may need: the asset being imported, its
/// importer, and the collaborators to resolve against.
#[derive(Clone)]
pub struct PreprocessContext<'a> {
    pub asset_path: &'a AssetPath,
    pub importer: ImporterHandle,
    pub file_source: &'a dyn PresetFileSource,
    pub host: &'a dyn ImporterHost,
    pub project: &'a PresetProjectConfiguration,
}

/// A handler invoked by the host's import pipeline before each asset import.
/// Registered up front; the pipeline controls scheduling and there is no
/// retry.
pub trait AssetPreprocessor {
    fn on_preprocess_asset(
        &self,
        context: PreprocessContext,
    ) -> PresetResult<()>;
}

#[derive(Default)]
pub struct PreprocessorRegistryBuilder {
    handlers: Vec<Arc<dyn AssetPreprocessor>>,
}

impl PreprocessorRegistryBuilder {
    pub fn register_handler<T: AssetPreprocessor + 'static>(
        &mut self,
        handler: T,
    ) {
        self.handlers.push(Arc::new(handler));
    }

    pub fn register_default_handlers(&mut self) {
        self.register_handler(DefaultPresetApplier);
    }

    pub fn build(self) -> PreprocessorRegistry {
        PreprocessorRegistry {
            handlers: self.handlers,
        }
    }
}

pub struct PreprocessorRegistry {
    handlers: Vec<Arc<dyn AssetPreprocessor>>,
}

impl PreprocessorRegistry {
    /// Invokes every registered handler in registration order. The host calls
    /// this from its pre-import event for each asset.
    pub fn preprocess_asset(
        &self,
        context: PreprocessContext,
    ) -> PresetResult<()> {
        for handler in &self.handlers {
            handler.on_preprocess_asset(context.clone())?;
        }

        Ok(())
    }
}

/// The stock handler implementing the default-preset convention: on an
/// asset's first import, resolve the nearest applicable `Default_*` preset
/// and apply it to the importer.
pub struct DefaultPresetApplier;

impl AssetPreprocessor for DefaultPresetApplier {
    fn on_preprocess_asset(
        &self,
        context: PreprocessContext,
    ) -> PresetResult<()> {
        let resolver =
            DefaultPresetResolver::new(context.file_source, context.host, context.project);
        resolver.apply_if_missing(context.importer, context.asset_path)?;
        Ok(())
    }
}
