//! Polyglot client SDK generation from a canonical API schema.
//!
//! `manifold-codegen` turns one language-agnostic schema (types, contracts,
//! endpoints, shared helpers) into idiomatic client source for seven target
//! languages, guaranteeing every target exposes the same method surface
//! with only syntax and naming differing.
//!
//! # Architecture
//!
//! ```text
//! Schema documents        IR                Per-language emission
//! ────────────────    ───────────      ────────────────────────────
//! defaults  ─┐                         profiles ─┐    ┌─> JavaScript
//! types     ─┼─ merge ─> Ir ─┬─ names ─ typemap ──┼────┼─> TypeScript
//! endpoints ─┤  (input/)     │  (dedup)           │    ├─> Python
//! helpers   ─┘               └─ helpers ──────────┘    ├─> Java
//!                                                      ├─> PHP
//!                            parity validator  <───────┼─> Go
//!                            (post-generation)         └─> Dart
//! ```
//!
//! Generation is a one-shot batch transform: the IR is parsed and validated
//! once ([`input::load_ir`]), every downstream structure is derived and
//! immutable, languages emit in parallel, and the consistency validator
//! compares the emitted method surfaces before anything is reported as
//! success.
//!
//! # Example
//!
//! ```
//! use manifold_codegen::{generate, input, profile, GenerateOptions};
//!
//! let document = serde_json::json!({
//!     "api": {
//!         "name": "ExampleAPI",
//!         "version": "1.0.0",
//!         "defaultBaseUrl": "https://example.test/api"
//!     },
//!     "endpoints": {
//!         "checkWallet": {
//!             "request": {"record": [{"name": "Address", "type": "string"}]},
//!             "response": {"record": [{"name": "exists", "type": "bool"}]}
//!         }
//!     }
//! });
//!
//! let ir = input::load_ir(vec![document], profile::profiles()).unwrap();
//! let report = generate(&ir, &GenerateOptions::default()).unwrap();
//! assert!(report.is_success());
//! ```
//!
//! # Feature Flags
//!
//! One `backend-*` flag per target language, all on by default:
//! `backend-javascript`, `backend-typescript`, `backend-python`,
//! `backend-java`, `backend-php`, `backend-go`, `backend-dart`. Language
//! profiles are always compiled in; flags only control the emitters.

pub mod artifact;
pub mod contract;
pub mod dedup;
pub mod emit;
pub mod generate;
pub mod helpers;
pub mod ident;
pub mod input;
pub mod ir;
pub mod merge;
pub mod output;
pub mod parity;
pub mod profile;
pub mod profiles;
pub mod registry;
pub mod traits;
pub mod typemap;

// Re-export commonly used items
pub use artifact::{ArtifactKind, GeneratedArtifact, WriteError, write_artifacts};
pub use dedup::{NameCollisionError, NameTable};
pub use emit::{EmitContext, EmitError, build_context};
pub use generate::{GenerateError, GenerateOptions, GenerationReport, generate};
pub use helpers::MissingHelperImplementation;
pub use input::{DocumentError, SchemaError, load_ir, read_documents};
pub use ir::Ir;
pub use parity::ParityError;
pub use profile::{LanguageProfile, profile_for_id, profiles};
pub use registry::{backend_ids, backends, get_backend, register_backend};
pub use traits::Backend;
pub use typemap::TypeMapError;
