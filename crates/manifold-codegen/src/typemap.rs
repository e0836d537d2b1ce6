//! Mapping of IR type expressions onto target-language type expressions.
//!
//! All seven backends share these rules; only the syntax tables differ per
//! profile. A scalar kind missing from a profile's primitive table is a
//! hard error so the generated SDKs never degrade to an untyped `any`.

use crate::dedup::NameTable;
use crate::ident;
use crate::ir::{Ir, ScalarKind, TypeExpr, TypeKind};
use crate::profile::LanguageProfile;

/// Type-mapping failure. Unrecoverable for the affected language only.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeMapError {
    #[error("no {language} mapping for scalar {scalar} at {path}")]
    UnmappableScalar {
        language: String,
        scalar: &'static str,
        path: String,
    },
    #[error("anonymous record at {path} was never named")]
    UnnamedRecord { path: String },
}

/// Renders [`TypeExpr`]s for one language.
pub struct TypeMapper<'a> {
    pub ir: &'a Ir,
    pub profile: &'static LanguageProfile,
    pub names: &'a NameTable,
    /// Apply the profile's type prefix to generated type names. On for
    /// client-side references, off inside the type-declarations artifact.
    pub qualify: bool,
}

impl<'a> TypeMapper<'a> {
    pub fn new(ir: &'a Ir, profile: &'static LanguageProfile, names: &'a NameTable) -> Self {
        Self { ir, profile, names, qualify: true }
    }

    pub fn unqualified(ir: &'a Ir, profile: &'static LanguageProfile, names: &'a NameTable) -> Self {
        Self { ir, profile, names, qualify: false }
    }

    /// Render a type expression. `path` locates the expression in the IR
    /// and resolves anonymous record names.
    pub fn render(&self, expr: &TypeExpr, path: &str) -> Result<String, TypeMapError> {
        match expr {
            TypeExpr::Scalar(kind) => self.primitive(*kind, path),
            TypeExpr::Ref(name) => self.render_ref(name, path),
            TypeExpr::Record(_) => {
                let name = self
                    .names
                    .name_for(path)
                    .ok_or_else(|| TypeMapError::UnnamedRecord { path: path.to_string() })?;
                Ok(self.type_name(name))
            }
            TypeExpr::Array(element) => {
                let inner = self.render(element, path)?;
                Ok(self.profile.array_syntax.render(&inner))
            }
            TypeExpr::Optional(element) => {
                let inner = self.render(element, path)?;
                Ok(self.profile.optional_syntax.render(&inner))
            }
        }
    }

    fn primitive(&self, kind: ScalarKind, path: &str) -> Result<String, TypeMapError> {
        self.profile
            .primitive(kind)
            .map(String::from)
            .ok_or_else(|| TypeMapError::UnmappableScalar {
                language: self.profile.id.to_string(),
                scalar: kind.as_str(),
                path: path.to_string(),
            })
    }

    fn render_ref(&self, name: &str, path: &str) -> Result<String, TypeMapError> {
        let Some(def) = self.ir.type_def(name) else {
            // Refs are resolved during schema validation; an unknown name
            // here means the caller bypassed it.
            return Ok(self.type_name(&ident::pascal(name)));
        };
        match &def.kind {
            TypeKind::Scalar(scalar) => {
                if self.profile.supports_alias {
                    Ok(ident::pascal(name))
                } else {
                    self.primitive(scalar.scalar, path)
                }
            }
            TypeKind::Enum(_) | TypeKind::Record(_) => Ok(self.type_name(&ident::pascal(name))),
            TypeKind::Array(def) => {
                if self.profile.supports_alias {
                    Ok(ident::pascal(name))
                } else {
                    let inner = self.render(&def.element, path)?;
                    Ok(self.profile.array_syntax.render(&inner))
                }
            }
            TypeKind::Optional(def) => {
                if self.profile.supports_alias {
                    Ok(ident::pascal(name))
                } else {
                    let inner = self.render(&def.element, path)?;
                    Ok(self.profile.optional_syntax.render(&inner))
                }
            }
        }
    }

    fn type_name(&self, name: &str) -> String {
        if self.qualify {
            format!("{}{name}", self.profile.type_prefix)
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::IdentCase;
    use crate::ir::{Field, TypeDef};
    use crate::profile::{profile_for_id, ArraySyntax, AsyncPattern, OptionalSyntax};

    fn sample_ir() -> Ir {
        let mut ir = Ir::new();
        ir.types.push(TypeDef::scalar("Address", ScalarKind::String, None));
        ir.types.push(TypeDef::string_enum("TransactionStatus", vec!["pending", "confirmed"]));
        ir
    }

    #[test]
    fn primitives_map_through_the_profile_table() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let go = TypeMapper::new(&ir, profile_for_id("go").unwrap(), &names);
        let python = TypeMapper::new(&ir, profile_for_id("python").unwrap(), &names);

        assert_eq!(go.render(&TypeExpr::int(), "t").unwrap(), "int64");
        assert_eq!(python.render(&TypeExpr::bool(), "t").unwrap(), "bool");
    }

    #[test]
    fn arrays_and_optionals_use_profile_syntax() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let go = TypeMapper::new(&ir, profile_for_id("go").unwrap(), &names);
        let python = TypeMapper::new(&ir, profile_for_id("python").unwrap(), &names);
        let dart = TypeMapper::new(&ir, profile_for_id("dart").unwrap(), &names);

        let strings = TypeExpr::array(TypeExpr::string());
        assert_eq!(go.render(&strings, "t").unwrap(), "[]string");
        assert_eq!(python.render(&strings, "t").unwrap(), "list[str]");
        assert_eq!(dart.render(&strings, "t").unwrap(), "List<String>");

        let opt = TypeExpr::optional(TypeExpr::string());
        assert_eq!(python.render(&opt, "t").unwrap(), "Optional[str]");
        assert_eq!(dart.render(&opt, "t").unwrap(), "String?");
        assert_eq!(go.render(&opt, "t").unwrap(), "string");
    }

    #[test]
    fn aliases_resolve_per_profile_support() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let go = TypeMapper::new(&ir, profile_for_id("go").unwrap(), &names);
        let java = TypeMapper::new(&ir, profile_for_id("java").unwrap(), &names);

        let addr = TypeExpr::reference("Address");
        assert_eq!(go.render(&addr, "t").unwrap(), "Address");
        // Java has no aliases: resolve to the underlying primitive.
        assert_eq!(java.render(&addr, "t").unwrap(), "String");

        let status = TypeExpr::reference("TransactionStatus");
        assert_eq!(java.render(&status, "t").unwrap(), "Types.TransactionStatus");
    }

    #[test]
    fn missing_primitive_mapping_is_a_hard_error() {
        // A profile with no float mapping: floats must fail, not fall back.
        static BROKEN: LanguageProfile = LanguageProfile {
            id: "broken",
            label: "Broken",
            client_file: "client.x",
            types_file: "types.x",
            test_file: "test.x",
            method_case: IdentCase::Camel,
            field_case: IdentCase::Camel,
            param_case: IdentCase::Camel,
            async_pattern: AsyncPattern::Sync,
            array_syntax: ArraySyntax::Suffix,
            optional_syntax: OptionalSyntax::Bare,
            supports_alias: false,
            type_prefix: "",
            helper_indent: "  ",
            primitives: &[(ScalarKind::String, "string")],
            reserved: &[],
            name_overrides: &[],
            surface_pattern: r"x^",
            surface_exclude: &[],
        };

        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let mapper = TypeMapper::new(&ir, &BROKEN, &names);
        let err = mapper
            .render(&TypeExpr::Scalar(ScalarKind::Float), "types.Fee")
            .unwrap_err();
        match err {
            TypeMapError::UnmappableScalar { language, scalar, path } => {
                assert_eq!(language, "broken");
                assert_eq!(scalar, "float");
                assert_eq!(path, "types.Fee");
            }
            other => panic!("expected UnmappableScalar, got {other:?}"),
        }
    }
}
