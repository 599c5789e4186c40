use tsw_core::config::GenerateOptions;
use tsw_core::ir::ApiDocument;
use tsw_core::{CodeGenerator, GeneratedFile};

use crate::emitters::definitions::{build_definitions, emit_definitions};
use crate::emitters::plugin::emit_plugin;
use crate::error::PluginError;

/// The two generated modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSources {
    /// Plugin module: accessor tree plus Nuxt injection boilerplate.
    pub client: String,
    /// Definitions module imported by the plugin.
    pub types: String,
}

/// Generate both modules for one document. Pure: no I/O, no shared state.
pub fn generate(document: &ApiDocument, options: &GenerateOptions) -> Result<GeneratedSources, PluginError> {
    let definitions = build_definitions(&document.schemas);
    log::debug!(
        "generating `{}`: {} declarations, {} operations",
        options.plugin_name,
        definitions.declarations.len(),
        document.operations.len()
    );
    Ok(GeneratedSources {
        client: emit_plugin(document, &definitions, options)?,
        types: emit_definitions(&definitions)?,
    })
}

/// Where the generated modules go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NuxtPluginConfig {
    pub options: GenerateOptions,
    pub plugin_path: String,
    pub type_path: String,
}

/// Nuxt axios plugin generator.
pub struct NuxtPluginGenerator;

impl CodeGenerator for NuxtPluginGenerator {
    type Config = NuxtPluginConfig;
    type Error = PluginError;

    fn generate(
        &self,
        document: &ApiDocument,
        config: &NuxtPluginConfig,
    ) -> Result<Vec<GeneratedFile>, PluginError> {
        let sources = generate(document, &config.options)?;
        Ok(vec![
            GeneratedFile {
                path: config.plugin_path.clone(),
                content: sources.client,
            },
            GeneratedFile {
                path: config.type_path.clone(),
                content: sources.types,
            },
        ])
    }
}
