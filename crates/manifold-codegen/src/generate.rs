//! Generation driver: one-shot batch transform from validated IR to
//! per-language artifacts.
//!
//! Per-language emission is embarrassingly parallel: every backend works
//! against the same immutable IR and name table, so languages fan out on a
//! rayon pool and join before the parity validation, which needs all
//! artifacts. Per-language failures are collected, not fail-fast, so a
//! single missing helper implementation does not hide other diagnostics.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::artifact::GeneratedArtifact;
use crate::dedup::{NameCollisionError, NameTable};
use crate::emit::{self, EmitError};
use crate::helpers;
use crate::ir::Ir;
use crate::parity::{self, ParityError};
use crate::registry;
use crate::traits::Backend;

/// Failure that invalidates the whole run before any per-language work.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    NameCollision(#[from] NameCollisionError),
    #[error("unknown language {0:?}")]
    UnknownLanguage(String),
}

/// A language that failed to emit. The run continues for the others.
#[derive(Debug, thiserror::Error)]
#[error("{language}: {error}")]
pub struct LanguageFailure {
    pub language: String,
    #[source]
    pub error: EmitError,
}

/// Outcome of one generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub artifacts: Vec<GeneratedArtifact>,
    pub failures: Vec<LanguageFailure>,
    pub parity: Vec<ParityError>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.parity.is_empty()
    }
}

/// Options for one generation run.
#[derive(Debug, Default, Clone)]
pub struct GenerateOptions {
    /// Language ids to emit; empty means every registered backend.
    pub languages: Vec<String>,
    /// Base URL override for generated clients and scaffolds.
    pub base_url: Option<String>,
}

/// Run generation for the selected languages against a validated IR.
pub fn generate(ir: &Ir, options: &GenerateOptions) -> Result<GenerationReport, GenerateError> {
    let backends: Vec<&'static dyn Backend> = if options.languages.is_empty() {
        registry::backends()
    } else {
        options
            .languages
            .iter()
            .map(|id| {
                registry::get_backend(id)
                    .ok_or_else(|| GenerateError::UnknownLanguage(id.clone()))
            })
            .collect::<Result<_, _>>()?
    };

    let names = NameTable::build(ir)?;
    info!(
        endpoints = ir.endpoints.len(),
        helpers = ir.helpers.len(),
        languages = backends.len(),
        "generating"
    );

    let results: Vec<Result<Vec<GeneratedArtifact>, LanguageFailure>> = backends
        .par_iter()
        .map(|backend| {
            let profile = backend.profile();
            debug!(language = profile.id, "emitting");
            emit::build_context(ir, profile, &names, options.base_url.as_deref())
                .and_then(|ctx| backend.generate(&ctx))
                .map_err(|error| LanguageFailure {
                    language: profile.id.to_string(),
                    error,
                })
        })
        .collect();

    let mut report = GenerationReport::default();
    for result in results {
        match result {
            Ok(artifacts) => report.artifacts.extend(artifacts),
            Err(failure) => report.failures.push(failure),
        }
    }
    report.artifacts.sort_by(|a, b| a.path.cmp(&b.path));

    // Parity runs across whatever emitted successfully; a failed language
    // is already reported and must not mask drift among the others.
    let helper_keys = helpers::canonical_helper_keys(&ir.helpers);
    if let Err(errors) = parity::validate(&report.artifacts, &helper_keys) {
        report.parity = errors;
    }

    info!(
        artifacts = report.artifacts.len(),
        failures = report.failures.len(),
        parity_errors = report.parity.len(),
        "generation finished"
    );
    Ok(report)
}
