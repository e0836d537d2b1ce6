//! Intermediate representation for the canonical API schema.
//!
//! Schema documents normalize to this IR before any per-language work
//! happens. The IR is parsed and validated once per generation run and is
//! immutable afterwards; every downstream component borrows it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::contract::Contract;

/// The fully loaded and validated schema: types, endpoints and shared
/// helper modules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ir {
    /// API-level metadata (client class name, version, default gateway URL).
    pub api: ApiInfo,
    /// All named type definitions.
    pub types: Vec<TypeDef>,
    /// All endpoint definitions.
    pub endpoints: Vec<EndpointDef>,
    /// Shared helper modules composed into every generated client.
    pub helpers: Vec<HelperModule>,
}

/// API-level metadata carried by the schema, not by the generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiInfo {
    /// Client class name emitted in every language (e.g. "CircularProtocolAPI").
    pub name: String,
    /// API version baked into generated request payloads.
    pub version: String,
    /// Default base URL for generated clients and test scaffolds.
    pub default_base_url: String,
}

/// A named type definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    pub docs: Option<String>,
    pub kind: TypeKind,
}

/// The kind of a named type definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeKind {
    /// A primitive with an optional validation contract (e.g. hex string of
    /// length 64 or 66).
    Scalar(ScalarDef),
    /// A record with ordered named fields.
    Record(RecordDef),
    /// A closed set of string values.
    Enum(EnumDef),
    /// An array alias.
    Array(ArrayDef),
    /// An optional alias.
    Optional(OptionalDef),
}

/// A scalar definition: primitive kind plus validation contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalarDef {
    pub scalar: ScalarKind,
    pub contract: Option<Contract>,
}

/// A record definition with ordered fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDef {
    pub fields: Vec<Field>,
}

/// A string enum definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDef {
    pub variants: Vec<String>,
}

/// An array type alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayDef {
    pub element: TypeExpr,
}

/// An optional type alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionalDef {
    pub element: TypeExpr,
}

/// Primitive scalar kinds. Each `LanguageProfile` maps these through its
/// primitive table; a missing entry is a hard error, never a silent `any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Bool,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Bool => "bool",
        }
    }
}

/// A type expression as it appears in field and endpoint schemas.
///
/// Unlike [`TypeKind`], expressions may nest anonymous records; the
/// structural deduplicator assigns those deterministic names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeExpr {
    Scalar(ScalarKind),
    /// Reference to a named type definition.
    Ref(String),
    /// Inline anonymous record.
    Record(Vec<Field>),
    Array(Box<TypeExpr>),
    Optional(Box<TypeExpr>),
}

/// A field in a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field name as it appears on the wire.
    pub name: String,
    pub ty: TypeExpr,
    pub required: bool,
    pub docs: Option<String>,
}

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A single API endpoint. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDef {
    /// Canonical (language-agnostic) method name, e.g. "checkWallet".
    pub canonical_name: String,
    pub http_method: HttpMethod,
    pub path: String,
    /// Endpoint grouping used in error paths (e.g. "wallet").
    pub category: Option<String>,
    pub request: TypeExpr,
    pub response: TypeExpr,
    pub example_request: Option<serde_json::Value>,
    pub example_response: Option<serde_json::Value>,
    pub docs: Option<String>,
}

/// Category of a shared helper module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HelperCategory {
    Config,
    Utility,
    Encoding,
    Crypto,
    ErrorHandling,
}

impl HelperCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HelperCategory::Config => "config",
            HelperCategory::Utility => "utility",
            HelperCategory::Encoding => "encoding",
            HelperCategory::Crypto => "crypto",
            HelperCategory::ErrorHandling => "errorHandling",
        }
    }
}

/// A shared helper method with one source fragment per target language.
///
/// The consistency validator enforces that the `per_language` key set covers
/// every configured language profile; a missing implementation fails
/// generation for that language instead of silently shrinking the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperModule {
    /// Canonical helper name, e.g. "getNAGURL".
    pub name: String,
    pub category: HelperCategory,
    pub docs: Option<String>,
    /// Language id → method source fragment, written at zero indent.
    pub per_language: BTreeMap<String, String>,
}

impl Ir {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a named type definition.
    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Look up an endpoint by canonical name.
    pub fn endpoint(&self, canonical_name: &str) -> Option<&EndpointDef> {
        self.endpoints.iter().find(|e| e.canonical_name == canonical_name)
    }
}

impl TypeDef {
    pub fn record(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            docs: None,
            kind: TypeKind::Record(RecordDef { fields }),
        }
    }

    pub fn scalar(name: impl Into<String>, scalar: ScalarKind, contract: Option<Contract>) -> Self {
        Self {
            name: name.into(),
            docs: None,
            kind: TypeKind::Scalar(ScalarDef { scalar, contract }),
        }
    }

    pub fn string_enum(name: impl Into<String>, variants: Vec<&str>) -> Self {
        Self {
            name: name.into(),
            docs: None,
            kind: TypeKind::Enum(EnumDef {
                variants: variants.into_iter().map(String::from).collect(),
            }),
        }
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

impl Field {
    pub fn required(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            docs: None,
        }
    }

    pub fn optional(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            docs: None,
        }
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

impl TypeExpr {
    pub fn string() -> Self {
        TypeExpr::Scalar(ScalarKind::String)
    }

    pub fn int() -> Self {
        TypeExpr::Scalar(ScalarKind::Int)
    }

    pub fn bool() -> Self {
        TypeExpr::Scalar(ScalarKind::Bool)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeExpr::Ref(name.into())
    }

    pub fn array(element: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(element))
    }

    pub fn optional(element: TypeExpr) -> Self {
        TypeExpr::Optional(Box::new(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_ir_programmatically() {
        let mut ir = Ir::new();
        ir.types.push(TypeDef::scalar("Address", ScalarKind::String, None));
        ir.types.push(TypeDef::string_enum(
            "TransactionStatus",
            vec!["pending", "confirmed", "failed"],
        ));
        ir.endpoints.push(EndpointDef {
            canonical_name: "checkWallet".into(),
            http_method: HttpMethod::Post,
            path: "/checkWallet".into(),
            category: Some("wallet".into()),
            request: TypeExpr::Record(vec![
                Field::required("Blockchain", TypeExpr::reference("Address")),
                Field::required("Address", TypeExpr::reference("Address")),
            ]),
            response: TypeExpr::Record(vec![
                Field::required("exists", TypeExpr::bool()),
                Field::required("address", TypeExpr::reference("Address")),
            ]),
            example_request: None,
            example_response: None,
            docs: None,
        });

        assert!(ir.type_def("Address").is_some());
        assert!(ir.type_def("Missing").is_none());
        assert_eq!(ir.endpoint("checkWallet").unwrap().path, "/checkWallet");
    }
}
