//! Static configuration for each target language.
//!
//! A [`LanguageProfile`] describes one language's naming convention, file
//! layout, primitive type table, async idiom and reserved identifiers. It is
//! data, not behavior: rendering lives in the output backends, so profiles
//! stay inspectable and trivially constructible in tests.

use crate::ident::{self, IdentCase};
use crate::ir::ScalarKind;

/// How a generated client method waits for its HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncPattern {
    /// `async` method returning a `Promise` (JavaScript).
    Promise,
    /// `async`/`await` with typed promises (TypeScript).
    AsyncAwait,
    /// Plain blocking call (Python, PHP).
    Sync,
    /// `Future<T>` (Dart).
    Future,
    /// `CompletableFuture<T>` (Java).
    CompletableFuture,
    /// Synchronous call returning `(T, error)` (Go).
    ErrorReturn,
}

/// How the language spells an array of `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArraySyntax {
    /// `T[]`
    Suffix,
    /// `[]T`
    SlicePrefix,
    /// `Name<T>`
    Generic(&'static str),
    /// `name[T]`
    Brackets(&'static str),
    /// A fixed word with no element type (PHP `array`).
    Plain(&'static str),
}

impl ArraySyntax {
    pub fn render(&self, element: &str) -> String {
        match self {
            ArraySyntax::Suffix => format!("{element}[]"),
            ArraySyntax::SlicePrefix => format!("[]{element}"),
            ArraySyntax::Generic(name) => format!("{name}<{element}>"),
            ArraySyntax::Brackets(name) => format!("{name}[{element}]"),
            ArraySyntax::Plain(word) => (*word).to_string(),
        }
    }
}

/// How the language spells an optional `T`. Never silently dropped: `Bare`
/// is an explicit profile choice (Go, Java), not a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalSyntax {
    /// `T?`
    QuestionSuffix,
    /// `name[T]`
    Brackets(&'static str),
    /// `T | undefined`
    UnionUndefined,
    /// `?T`
    NullablePrefix,
    /// No sigil; absence is the zero value / null.
    Bare,
}

impl OptionalSyntax {
    pub fn render(&self, inner: &str) -> String {
        match self {
            OptionalSyntax::QuestionSuffix => format!("{inner}?"),
            OptionalSyntax::Brackets(name) => format!("{name}[{inner}]"),
            OptionalSyntax::UnionUndefined => format!("{inner} | undefined"),
            OptionalSyntax::NullablePrefix => format!("?{inner}"),
            OptionalSyntax::Bare => inner.to_string(),
        }
    }
}

/// Static configuration for one target language.
pub struct LanguageProfile {
    /// Unique language id (e.g. "go"). Doubles as the output directory name
    /// and the key in helper `perLanguage` maps.
    pub id: &'static str,
    /// Human-readable name.
    pub label: &'static str,
    pub client_file: &'static str,
    pub types_file: &'static str,
    pub test_file: &'static str,
    pub method_case: IdentCase,
    pub field_case: IdentCase,
    pub param_case: IdentCase,
    pub async_pattern: AsyncPattern,
    pub array_syntax: ArraySyntax,
    pub optional_syntax: OptionalSyntax,
    /// Whether the language can express named scalar aliases; profiles
    /// without it resolve aliases to the underlying primitive.
    pub supports_alias: bool,
    /// Prefix for generated type names when referenced from the client
    /// (Java nests declarations in a `Types` holder class).
    pub type_prefix: &'static str,
    /// Indentation prepended to helper fragments when splicing them into
    /// the client class body.
    pub helper_indent: &'static str,
    /// ScalarKind → type expression. A missing entry is a hard
    /// `UnmappableScalar` error.
    pub primitives: &'static [(ScalarKind, &'static str)],
    /// Identifiers that cannot be used for fields, params or methods.
    pub reserved: &'static [&'static str],
    /// Explicit canonical-name → emitted-name overrides. Wins
    /// unconditionally over the algorithmic conversion.
    pub name_overrides: &'static [(&'static str, &'static str)],
    /// Regex (one capture group) extracting public method names from the
    /// emitted client source; used by the consistency validator.
    pub surface_pattern: &'static str,
    /// Extracted names to ignore (constructors and similar).
    pub surface_exclude: &'static [&'static str],
}

impl LanguageProfile {
    /// Convert a canonical method name into this language's convention.
    /// An explicit `name_overrides` entry wins unconditionally.
    pub fn method_name(&self, canonical: &str) -> String {
        if let Some(emitted) = self.name_override(canonical) {
            return emitted.to_string();
        }
        ident::convert(canonical, self.method_case)
    }

    pub fn field_name(&self, wire: &str) -> String {
        ident::convert(wire, self.field_case)
    }

    pub fn param_name(&self, wire: &str) -> String {
        ident::convert(wire, self.param_case)
    }

    pub fn primitive(&self, kind: ScalarKind) -> Option<&'static str> {
        self.primitives
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, ty)| *ty)
    }

    pub fn name_override(&self, canonical: &str) -> Option<&'static str> {
        self.name_overrides
            .iter()
            .find(|(c, _)| *c == canonical)
            .map(|(_, emitted)| *emitted)
    }

    pub fn is_reserved(&self, ident: &str) -> bool {
        self.reserved.contains(&ident)
    }

    /// Map an emitted name back to the canonical spelling when it came from
    /// an explicit override; used by the parity validator's inverse
    /// normalization.
    pub fn override_source(&self, emitted: &str) -> Option<&'static str> {
        self.name_overrides
            .iter()
            .find(|(_, e)| *e == emitted)
            .map(|(c, _)| *c)
    }
}

impl std::fmt::Debug for LanguageProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageProfile").field("id", &self.id).finish()
    }
}

/// All configured language profiles, in stable order.
pub fn profiles() -> &'static [&'static LanguageProfile] {
    &[
        &crate::profiles::javascript::PROFILE,
        &crate::profiles::typescript::PROFILE,
        &crate::profiles::python::PROFILE,
        &crate::profiles::java::PROFILE,
        &crate::profiles::php::PROFILE,
        &crate::profiles::go::PROFILE,
        &crate::profiles::dart::PROFILE,
    ]
}

/// Look up a profile by language id.
pub fn profile_for_id(id: &str) -> Option<&'static LanguageProfile> {
    profiles().iter().find(|p| p.id == id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_profiles_have_full_primitive_tables() {
        for profile in profiles() {
            for kind in [ScalarKind::String, ScalarKind::Int, ScalarKind::Float, ScalarKind::Bool] {
                assert!(
                    profile.primitive(kind).is_some(),
                    "{} lacks a mapping for {}",
                    profile.id,
                    kind.as_str()
                );
            }
        }
    }

    #[test]
    fn profile_ids_are_unique() {
        let mut ids: Vec<&str> = profiles().iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), profiles().len());
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(profile_for_id("go").unwrap().label, "Go");
        assert!(profile_for_id("cobol").is_none());
    }

    #[test]
    fn spec_case_conversions() {
        let go = profile_for_id("go").unwrap();
        let python = profile_for_id("python").unwrap();
        assert_eq!(go.method_name("getTransactionbyID"), "GetTransactionByID");
        assert_eq!(python.method_name("getTransactionbyID"), "get_transaction_by_id");
        assert_eq!(python.method_name("getNAGURL"), "get_nag_url");
    }

    #[test]
    fn javascript_keeps_legacy_spellings() {
        let js = profile_for_id("javascript").unwrap();
        assert_eq!(js.method_name("getTransactionbyID"), "getTransactionbyID");
        assert_eq!(js.method_name("checkWallet"), "checkWallet");
    }
}
