//! Orchestration of one generation run.

use crate::cache::ModelCache;
use crate::catalog::TypeDefSource;
use crate::config::GeneratorConfig;
use crate::diagnostics::Diagnostic;
use crate::error::Error;
use crate::resolve::{
    register_entity_names, resolve_enum, resolve_relationship, resolve_struct,
    resolve_struct_names, EntityResolver, ResolvedEntityModel, ResolvedEnumModel,
    ResolvedRelationshipModel, ResolvedStructModel,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Execution options of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Worker threads used for entity detail resolution.
    pub workers: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

impl GeneratorOptions {
    /// Set the number of workers; zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

/// Every model produced by one run, keyed by original name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedModels {
    /// Resolved enumerations.
    pub enums: BTreeMap<String, ResolvedEnumModel>,
    /// Resolved structs.
    pub structs: BTreeMap<String, ResolvedStructModel>,
    /// Resolved relationship definitions.
    pub relationships: BTreeMap<String, ResolvedRelationshipModel>,
    /// Resolved entities.
    pub assets: BTreeMap<String, ResolvedEntityModel>,
    /// Diagnostics recorded during the run, sorted.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Serialize)]
struct ModelsOnly<'a> {
    enums: &'a BTreeMap<String, ResolvedEnumModel>,
    structs: &'a BTreeMap<String, ResolvedStructModel>,
    relationships: &'a BTreeMap<String, ResolvedRelationshipModel>,
    assets: &'a BTreeMap<String, ResolvedEntityModel>,
}

impl GeneratedModels {
    /// Pretty JSON rendering of the models and diagnostics.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Hex-encoded blake3 hash of the models, excluding diagnostics.
    ///
    /// Two runs over the same snapshot and configuration yield the same
    /// fingerprint.
    pub fn fingerprint(&self) -> Result<String, Error> {
        let bytes = serde_json::to_vec(&ModelsOnly {
            enums: &self.enums,
            structs: &self.structs,
            relationships: &self.relationships,
            assets: &self.assets,
        })?;
        Ok(hex::encode(blake3::hash(&bytes).as_bytes()))
    }

    /// Number of diagnostics recorded.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Total number of resolved models.
    pub fn len(&self) -> usize {
        self.enums.len() + self.structs.len() + self.relationships.len() + self.assets.len()
    }

    /// Check if nothing was generated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs generation passes over type definition snapshots.
///
/// Each call to [`ModelGenerator::generate`] builds a fresh [`ModelCache`],
/// so nothing memoized in one run leaks into the next.
pub struct ModelGenerator {
    config: Arc<GeneratorConfig>,
    options: GeneratorOptions,
}

impl ModelGenerator {
    /// Create a generator with default options.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config: Arc::new(config),
            options: GeneratorOptions::default(),
        }
    }

    /// Set the execution options.
    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    /// The configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The execution options.
    pub fn options(&self) -> GeneratorOptions {
        self.options
    }

    /// Resolve every included definition of the source.
    ///
    /// Runs ingestion, enums, struct names, entity names, struct details,
    /// relationships and entity details, in that order, so every cross
    /// reference sees an assigned class name.
    #[instrument(skip_all, fields(workers = self.options.workers))]
    pub fn generate(&self, source: &dyn TypeDefSource) -> GeneratedModels {
        let start = Instant::now();
        let cache = ModelCache::with_shared_config(source, Arc::clone(&self.config));
        let config = cache.config();
        let mut output = GeneratedModels::default();

        for def in cache.enum_defs() {
            let model = resolve_enum(&cache, def);
            if config.include_type_def(def) {
                output.enums.insert(def.name.clone(), model.clone());
            }
            cache.register_enum(model);
        }

        resolve_struct_names(&cache);
        let registered = register_entity_names(&cache);

        for def in cache.struct_defs() {
            let model = resolve_struct(&cache, def);
            if config.include_type_def(def) {
                output.structs.insert(def.name.clone(), model.clone());
            }
            cache.register_struct(model);
        }

        for def in cache.relationship_defs() {
            let model = resolve_relationship(&cache, def);
            if config.include_type_def(def) {
                output.relationships.insert(def.name.clone(), model.clone());
            }
            cache.register_relationship(model);
        }

        let resolver = EntityResolver::new(&cache);
        for model in resolver.resolve_all(&registered, self.options.workers) {
            output.assets.insert(model.original_name.clone(), model);
        }

        output.diagnostics = cache.diagnostics().snapshot();
        tracing::info!(
            enums = output.enums.len(),
            structs = output.structs.len(),
            relationships = output.relationships.len(),
            assets = output.assets.len(),
            diagnostics = output.diagnostics.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generation run complete"
        );
        output
    }
}
