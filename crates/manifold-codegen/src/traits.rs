//! Trait for per-language output backends.

use crate::artifact::GeneratedArtifact;
use crate::emit::{EmitContext, EmitError};
use crate::profile::LanguageProfile;

/// A code generation backend for one target language.
///
/// Backends are pure: the same [`EmitContext`] always produces the same
/// artifact bytes. Each backend must emit a client source (one method per
/// endpoint plus every composed helper), the type declarations, and a test
/// scaffold exercising every generated method.
pub trait Backend: Send + Sync {
    /// The language profile this backend renders for.
    fn profile(&self) -> &'static LanguageProfile;

    /// Language id; doubles as the registry key and output directory.
    fn id(&self) -> &'static str {
        self.profile().id
    }

    /// Render all artifacts for this language.
    fn generate(&self, ctx: &EmitContext<'_>) -> Result<Vec<GeneratedArtifact>, EmitError>;
}
