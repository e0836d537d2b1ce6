//! Cross-language parity validation.
//!
//! After all backends have emitted, every client's public method surface is
//! extracted from the artifact text, normalized back to canonical keys and
//! compared across languages: the method set and the helper set must be
//! identical everywhere. This gate exists because the drift it catches
//! (one target silently shipping a fraction of the surface) survived in
//! production until a manual audit found it.

use std::collections::{BTreeMap, BTreeSet};

use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::ident;
use crate::profile::{self, LanguageProfile};

/// A language whose emitted surface is missing canonical names that other
/// languages expose. Build-breaking by design.
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "parity failure for {language}: missing methods [{}], missing helpers [{}]",
    .missing_methods.join(", "),
    .missing_helpers.join(", ")
)]
pub struct ParityError {
    pub language: String,
    /// Canonical keys present in other languages but absent here.
    pub missing_methods: Vec<String>,
    pub missing_helpers: Vec<String>,
}

/// Extracted and canonicalized surface of one language's client.
#[derive(Debug, Clone)]
pub struct Surface {
    pub language: String,
    pub methods: BTreeSet<String>,
    pub helpers: BTreeSet<String>,
}

/// Extract the public method surface from a client source using the
/// profile's extraction pattern, and normalize each name through the
/// inverse of the identifier transform.
pub fn extract_surface(
    profile: &LanguageProfile,
    client_source: &str,
    helper_keys: &BTreeSet<String>,
) -> Surface {
    let pattern = regex::Regex::new(profile.surface_pattern)
        .expect("profile surface pattern is a valid regex");

    let mut methods = BTreeSet::new();
    let mut helpers = BTreeSet::new();
    for captures in pattern.captures_iter(client_source) {
        let Some(name) = captures.get(1) else { continue };
        let emitted = name.as_str();
        if emitted.starts_with('_') || profile.surface_exclude.contains(&emitted) {
            continue;
        }
        // Inverse transform: explicit overrides map back to their canonical
        // spelling, everything else collapses mechanically.
        let key = match profile.override_source(emitted) {
            Some(canonical) => ident::canonical_key(canonical),
            None => ident::canonical_key(emitted),
        };
        if helper_keys.contains(&key) {
            helpers.insert(key);
        } else {
            methods.insert(key);
        }
    }

    Surface { language: profile.id.to_string(), methods, helpers }
}

/// Validate that every language exposes the same canonical method and
/// helper sets. Failures are collected per language, not fail-fast.
pub fn validate(
    artifacts: &[GeneratedArtifact],
    helper_keys: &BTreeSet<String>,
) -> Result<(), Vec<ParityError>> {
    let mut surfaces: BTreeMap<String, Surface> = BTreeMap::new();
    for artifact in artifacts {
        if artifact.kind != ArtifactKind::ClientSource {
            continue;
        }
        let Some(profile) = profile::profile_for_id(&artifact.language) else {
            continue;
        };
        surfaces.insert(
            artifact.language.clone(),
            extract_surface(profile, &artifact.text, helper_keys),
        );
    }

    let mut all_methods = BTreeSet::new();
    let mut all_helpers = BTreeSet::new();
    for surface in surfaces.values() {
        all_methods.extend(surface.methods.iter().cloned());
        all_helpers.extend(surface.helpers.iter().cloned());
    }

    let mut errors = Vec::new();
    for surface in surfaces.values() {
        let missing_methods: Vec<String> =
            all_methods.difference(&surface.methods).cloned().collect();
        let missing_helpers: Vec<String> =
            all_helpers.difference(&surface.helpers).cloned().collect();
        if !missing_methods.is_empty() || !missing_helpers.is_empty() {
            errors.push(ParityError {
                language: surface.language.clone(),
                missing_methods,
                missing_helpers,
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(language: &str, text: &str) -> GeneratedArtifact {
        GeneratedArtifact::new(language, ArtifactKind::ClientSource, "client", text.to_string())
    }

    fn helper_keys(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| ident::canonical_key(n)).collect()
    }

    #[test]
    fn identical_surfaces_validate() {
        let go = client(
            "go",
            "func (c *API) CheckWallet(a string) error {\n\
             func (c *API) GetNAGURL() string {\n",
        );
        let py = client(
            "python",
            "    def check_wallet(self, a):\n\
             \x20   def get_nag_url(self):\n",
        );
        let keys = helper_keys(&["getNAGURL"]);
        validate(&[go, py], &keys).unwrap();
    }

    #[test]
    fn missing_method_reported_for_the_lagging_language() {
        let go = client(
            "go",
            "func (c *API) CheckWallet(a string) error {\n\
             func (c *API) GetWallet(a string) error {\n",
        );
        let py = client("python", "    def check_wallet(self, a):\n");

        let errors = validate(&[go, py], &helper_keys(&[])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].language, "python");
        assert_eq!(errors[0].missing_methods, vec!["getwallet"]);
    }

    #[test]
    fn helper_and_method_sets_tracked_separately() {
        let go = client("go", "func (c *API) GetNAGURL() string {\n");
        let py = client("python", "    def check_wallet(self, a):\n");

        let errors = validate(&[go, py], &helper_keys(&["getNAGURL"])).unwrap_err();
        assert_eq!(errors.len(), 2);
        let go_err = errors.iter().find(|e| e.language == "go").unwrap();
        assert_eq!(go_err.missing_methods, vec!["checkwallet"]);
        assert!(go_err.missing_helpers.is_empty());
        let py_err = errors.iter().find(|e| e.language == "python").unwrap();
        assert_eq!(py_err.missing_helpers, vec!["getnagurl"]);
    }

    #[test]
    fn private_and_excluded_names_ignored() {
        let py = client(
            "python",
            "    def __init__(self):\n\
             \x20   def _post(self, path, payload):\n\
             \x20   def check_wallet(self, a):\n",
        );
        let keys = helper_keys(&[]);
        let surface = extract_surface(
            profile::profile_for_id("python").unwrap(),
            &py.text,
            &keys,
        );
        assert_eq!(surface.methods.len(), 1);
        assert!(surface.methods.contains("checkwallet"));
    }

    #[test]
    fn javascript_override_normalizes_to_the_canonical_key() {
        let js = client(
            "javascript",
            "  async getTransactionbyID(id) {\n",
        );
        let go = client("go", "func (c *API) GetTransactionByID(id string) error {\n");
        validate(&[js, go], &helper_keys(&[])).unwrap();
    }
}
