//! Composition of shared helper modules into a language's method list.
//!
//! Helper modules carry one source fragment per target language. A module
//! without a fragment for a language fails generation for that language
//! outright; the alternative — silently emitting a smaller client — is how
//! an SDK ends up shipping 2% of its advertised surface.

use std::collections::BTreeSet;

use crate::ident;
use crate::ir::{HelperCategory, HelperModule};
use crate::profile::LanguageProfile;

/// A helper resolved for one language.
#[derive(Debug, Clone)]
pub struct ComposedHelper {
    pub canonical_name: String,
    pub emitted_name: String,
    pub category: HelperCategory,
    pub docs: Option<String>,
    /// Method source at zero indent; the backend splices it into the
    /// client at the profile's helper indent.
    pub fragment: String,
}

/// One or more helpers lack an implementation for a language. All missing
/// names are reported together so the schema can be fixed in one pass.
#[derive(Debug, Clone, thiserror::Error)]
#[error("helpers missing a {language} implementation: {}", .helpers.join(", "))]
pub struct MissingHelperImplementation {
    pub language: String,
    pub helpers: Vec<String>,
}

/// Resolve every helper module for `profile`, sorted by category then name.
pub fn compose(
    profile: &LanguageProfile,
    helpers: &[HelperModule],
) -> Result<Vec<ComposedHelper>, MissingHelperImplementation> {
    let mut missing = Vec::new();
    let mut composed = Vec::new();

    for helper in helpers {
        match helper.per_language.get(profile.id) {
            Some(fragment) => composed.push(ComposedHelper {
                canonical_name: helper.name.clone(),
                emitted_name: profile.method_name(&helper.name),
                category: helper.category,
                docs: helper.docs.clone(),
                fragment: fragment.clone(),
            }),
            None => missing.push(helper.name.clone()),
        }
    }

    if !missing.is_empty() {
        missing.sort();
        return Err(MissingHelperImplementation {
            language: profile.id.to_string(),
            helpers: missing,
        });
    }

    composed.sort_by(|a, b| {
        (a.category, &a.canonical_name).cmp(&(b.category, &b.canonical_name))
    });
    Ok(composed)
}

/// Canonical comparison keys of all helper names. The composer is the
/// canonical source for the parity check's helper set.
pub fn canonical_helper_keys(helpers: &[HelperModule]) -> BTreeSet<String> {
    helpers.iter().map(|h| ident::canonical_key(&h.name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::profile_for_id;
    use std::collections::BTreeMap;

    fn helper(name: &str, category: HelperCategory, languages: &[&str]) -> HelperModule {
        HelperModule {
            name: name.into(),
            category,
            docs: None,
            per_language: languages
                .iter()
                .map(|l| (l.to_string(), format!("// {name} for {l}")))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn composes_in_category_then_name_order() {
        let helpers = vec![
            helper("stringToHex", HelperCategory::Encoding, &["go"]),
            helper("getNAGURL", HelperCategory::Config, &["go"]),
            helper("hashString", HelperCategory::Crypto, &["go"]),
        ];
        let composed = compose(profile_for_id("go").unwrap(), &helpers).unwrap();
        let names: Vec<&str> = composed.iter().map(|h| h.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["getNAGURL", "stringToHex", "hashString"]);
        assert_eq!(composed[0].emitted_name, "GetNAGURL");
    }

    #[test]
    fn partial_coverage_fails_with_every_missing_helper() {
        // Models the observed defect: a helper set covering only two of the
        // configured languages must hard-fail the rest, not shrink them.
        let helpers = vec![
            helper("getNAGURL", HelperCategory::Config, &["javascript", "typescript"]),
            helper("signMessage", HelperCategory::Crypto, &["javascript", "typescript"]),
        ];

        for lang in ["python", "java", "php", "go", "dart"] {
            let err = compose(profile_for_id(lang).unwrap(), &helpers).unwrap_err();
            assert_eq!(err.language, lang);
            assert_eq!(err.helpers, vec!["getNAGURL", "signMessage"]);
        }
        assert!(compose(profile_for_id("javascript").unwrap(), &helpers).is_ok());
    }

    #[test]
    fn canonical_keys_are_case_insensitive() {
        let helpers = vec![helper("getNAGURL", HelperCategory::Config, &[])];
        let keys = canonical_helper_keys(&helpers);
        assert!(keys.contains("getnagurl"));
    }
}
