//! Shared emitter driver.
//!
//! Everything language-independent about emission happens here once per
//! language: method names, parameter lists, mapped types, resolved response
//! shapes, type declarations and composed helpers are precomputed into an
//! [`EmitContext`], so the per-language backends are thin renderers over
//! ready-made specs. A failure for any endpoint or helper aborts the whole
//! language — no partial SDKs.

use serde_json::Value;

use crate::dedup::NameTable;
use crate::helpers::{self, ComposedHelper, MissingHelperImplementation};
use crate::ident;
use crate::ir::{EndpointDef, Field, HttpMethod, Ir, ScalarKind, TypeExpr, TypeKind};
use crate::profile::LanguageProfile;
use crate::typemap::{TypeMapError, TypeMapper};

/// Per-language emission failure. Unrecoverable for that language only;
/// other languages keep generating so one gap does not hide the rest.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EmitError {
    #[error(transparent)]
    TypeMap(#[from] TypeMapError),
    #[error(transparent)]
    MissingHelpers(#[from] MissingHelperImplementation),
    #[error("unsupported shape at {path}: {detail}")]
    Unsupported { path: String, detail: String },
}

/// The runtime shape of a value, with refs and aliases resolved. Backends
/// use it to emit decode logic without re-walking the IR.
#[derive(Debug, Clone)]
pub enum ValueShape {
    Scalar(ScalarKind),
    Enum { type_name: String, variants: Vec<String> },
    Record { type_name: String },
    ScalarList(ScalarKind),
    RecordList { type_name: String },
    Optional(Box<ValueShape>),
}

/// One method parameter, derived from a request record field.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub wire_name: String,
    pub emitted_name: String,
    pub ty: String,
    pub required: bool,
    pub shape: ValueShape,
    pub docs: Option<String>,
}

/// One endpoint method, fully resolved for a language.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    pub canonical_name: String,
    pub emitted_name: String,
    pub docs: Option<String>,
    pub category: Option<String>,
    pub path: String,
    pub http_method: HttpMethod,
    pub params: Vec<ParamSpec>,
    /// Rendered return type (without the async wrapper).
    pub response_type: String,
    pub response_shape: ValueShape,
    pub example_request: Option<Value>,
}

/// One field of an emitted record declaration.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub wire_name: String,
    pub emitted_name: String,
    /// Rendered type, unqualified (declarations live next to each other).
    pub ty: String,
    pub required: bool,
    pub shape: ValueShape,
    pub docs: Option<String>,
}

/// One emitted type declaration.
#[derive(Debug, Clone)]
pub enum Declaration {
    Alias { name: String, ty: String, docs: Option<String> },
    Enum { name: String, variants: Vec<String>, docs: Option<String> },
    Record { name: String, fields: Vec<FieldDecl>, docs: Option<String> },
}

/// Everything a backend needs to render one language's artifacts.
pub struct EmitContext<'a> {
    pub ir: &'a Ir,
    pub profile: &'static LanguageProfile,
    /// Client class name, straight from the schema.
    pub class_name: String,
    pub base_url: String,
    pub version: String,
    pub methods: Vec<MethodSpec>,
    pub helpers: Vec<ComposedHelper>,
    pub declarations: Vec<Declaration>,
}

impl EmitContext<'_> {
    /// A request value for exercising `param` in the test scaffold: the
    /// endpoint's example value when present, otherwise a default for the
    /// parameter's shape.
    pub fn sample_value(&self, method: &MethodSpec, param: &ParamSpec) -> Value {
        if let Some(example) = &method.example_request {
            if let Some(v) = example.get(&param.wire_name) {
                return v.clone();
            }
        }
        sample_for_shape(&param.shape)
    }
}

fn sample_for_shape(shape: &ValueShape) -> Value {
    match shape {
        ValueShape::Scalar(ScalarKind::String) => Value::String("test".into()),
        ValueShape::Scalar(ScalarKind::Int) => Value::from(1),
        ValueShape::Scalar(ScalarKind::Float) => Value::from(1.0),
        ValueShape::Scalar(ScalarKind::Bool) => Value::Bool(true),
        ValueShape::Enum { variants, .. } => variants
            .first()
            .map(|v| Value::String(v.clone()))
            .unwrap_or(Value::Null),
        ValueShape::Optional(inner) => sample_for_shape(inner),
        ValueShape::Record { .. } | ValueShape::RecordList { .. } | ValueShape::ScalarList(_) => {
            Value::Null
        }
    }
}

/// Build the emission context for one language against an immutable IR.
pub fn build_context<'a>(
    ir: &'a Ir,
    profile: &'static LanguageProfile,
    names: &'a NameTable,
    base_url: Option<&str>,
) -> Result<EmitContext<'a>, EmitError> {
    // Helpers first: a missing implementation must surface even when the
    // type mapping would also fail.
    let helpers = helpers::compose(profile, &ir.helpers)?;

    let qualified = TypeMapper::new(ir, profile, names);
    let unqualified = TypeMapper::unqualified(ir, profile, names);

    let mut declarations = Vec::new();
    for ty in &ir.types {
        let path = format!("types.{}", ty.name);
        let name = ident::pascal(&ty.name);
        match &ty.kind {
            TypeKind::Scalar(def) => {
                if profile.supports_alias {
                    let rendered = unqualified.render(&TypeExpr::Scalar(def.scalar), &path)?;
                    let docs = match (&ty.docs, &def.contract) {
                        (Some(d), Some(c)) => Some(format!("{d} ({})", c.describe())),
                        (Some(d), None) => Some(d.clone()),
                        (None, Some(c)) => Some(c.describe()),
                        (None, None) => None,
                    };
                    declarations.push(Declaration::Alias { name, ty: rendered, docs });
                }
            }
            TypeKind::Enum(def) => {
                declarations.push(Declaration::Enum {
                    name,
                    variants: def.variants.clone(),
                    docs: ty.docs.clone(),
                });
            }
            TypeKind::Record(def) => {
                let fields =
                    field_decls(ir, profile, names, &unqualified, &def.fields, &path)?;
                declarations.push(Declaration::Record { name, fields, docs: ty.docs.clone() });
            }
            TypeKind::Array(def) => {
                if profile.supports_alias {
                    let inner = unqualified.render(&def.element, &path)?;
                    declarations.push(Declaration::Alias {
                        name,
                        ty: profile.array_syntax.render(&inner),
                        docs: ty.docs.clone(),
                    });
                }
            }
            TypeKind::Optional(def) => {
                if profile.supports_alias {
                    let inner = unqualified.render(&def.element, &path)?;
                    declarations.push(Declaration::Alias {
                        name,
                        ty: profile.optional_syntax.render(&inner),
                        docs: ty.docs.clone(),
                    });
                }
            }
        }
    }
    for record in names.records() {
        let fields =
            field_decls(ir, profile, names, &unqualified, &record.fields, &record.path)?;
        declarations.push(Declaration::Record {
            name: record.name.clone(),
            fields,
            docs: None,
        });
    }

    let mut methods = Vec::with_capacity(ir.endpoints.len());
    for ep in &ir.endpoints {
        methods.push(method_spec(ir, profile, names, &qualified, ep)?);
    }

    Ok(EmitContext {
        ir,
        profile,
        class_name: ir.api.name.clone(),
        base_url: base_url.unwrap_or(&ir.api.default_base_url).to_string(),
        version: ir.api.version.clone(),
        methods,
        helpers,
        declarations,
    })
}

fn method_spec(
    ir: &Ir,
    profile: &'static LanguageProfile,
    names: &NameTable,
    mapper: &TypeMapper<'_>,
    ep: &EndpointDef,
) -> Result<MethodSpec, EmitError> {
    let base = format!("endpoints.{}", ep.canonical_name);

    let (request_fields, request_base): (&[Field], String) = match &ep.request {
        TypeExpr::Record(fields) => (fields, format!("{base}.request")),
        TypeExpr::Ref(name) => match ir.type_def(name).map(|t| &t.kind) {
            Some(TypeKind::Record(def)) => (&def.fields, format!("types.{name}")),
            _ => {
                return Err(EmitError::Unsupported {
                    path: format!("{base}.request"),
                    detail: format!("request reference {name:?} is not a record"),
                });
            }
        },
        _ => {
            return Err(EmitError::Unsupported {
                path: format!("{base}.request"),
                detail: "request schema must be a record".into(),
            });
        }
    };

    let mut params = Vec::with_capacity(request_fields.len());
    for field in request_fields {
        let field_path = format!("{request_base}.{}", field.name);
        params.push(ParamSpec {
            wire_name: field.name.clone(),
            emitted_name: profile.param_name(&field.name),
            ty: mapper.render(&field.ty, &field_path)?,
            required: field.required,
            shape: resolve_shape(ir, names, &field.ty, &field_path)?,
            docs: field.docs.clone(),
        });
    }
    // Optional parameters last; several targets require defaulted
    // parameters to trail the required ones.
    params.sort_by_key(|p| !p.required);

    let response_path = format!("{base}.response");
    Ok(MethodSpec {
        canonical_name: ep.canonical_name.clone(),
        emitted_name: profile.method_name(&ep.canonical_name),
        docs: ep.docs.clone(),
        category: ep.category.clone(),
        path: ep.path.clone(),
        http_method: ep.http_method,
        params,
        response_type: mapper.render(&ep.response, &response_path)?,
        response_shape: resolve_shape(ir, names, &ep.response, &response_path)?,
        example_request: ep.example_request.clone(),
    })
}

fn field_decls(
    ir: &Ir,
    profile: &'static LanguageProfile,
    names: &NameTable,
    mapper: &TypeMapper<'_>,
    fields: &[Field],
    base: &str,
) -> Result<Vec<FieldDecl>, EmitError> {
    let mut decls = Vec::with_capacity(fields.len());
    for field in fields {
        let path = format!("{base}.{}", field.name);
        decls.push(FieldDecl {
            wire_name: field.name.clone(),
            emitted_name: profile.field_name(&field.name),
            ty: mapper.render(&field.ty, &path)?,
            required: field.required,
            shape: resolve_shape(ir, names, &field.ty, &path)?,
            docs: field.docs.clone(),
        });
    }
    Ok(decls)
}

/// Resolve a type expression to its runtime shape, following refs and
/// aliases. Shapes the decode templates cannot express are rejected here,
/// before any text is produced.
fn resolve_shape(
    ir: &Ir,
    names: &NameTable,
    expr: &TypeExpr,
    path: &str,
) -> Result<ValueShape, EmitError> {
    match expr {
        TypeExpr::Scalar(kind) => Ok(ValueShape::Scalar(*kind)),
        TypeExpr::Ref(name) => {
            let Some(def) = ir.type_def(name) else {
                return Err(EmitError::Unsupported {
                    path: path.to_string(),
                    detail: format!("unresolved reference {name:?}"),
                });
            };
            match &def.kind {
                TypeKind::Scalar(s) => Ok(ValueShape::Scalar(s.scalar)),
                TypeKind::Enum(e) => Ok(ValueShape::Enum {
                    type_name: ident::pascal(name),
                    variants: e.variants.clone(),
                }),
                TypeKind::Record(_) => {
                    Ok(ValueShape::Record { type_name: ident::pascal(name) })
                }
                TypeKind::Array(def) => list_shape(ir, names, &def.element, path),
                TypeKind::Optional(def) => Ok(ValueShape::Optional(Box::new(resolve_shape(
                    ir,
                    names,
                    &def.element,
                    path,
                )?))),
            }
        }
        TypeExpr::Record(fields) => {
            if fields.is_empty() {
                return Err(EmitError::Unsupported {
                    path: path.to_string(),
                    detail: "empty anonymous record".into(),
                });
            }
            let type_name = names.name_for(path).ok_or_else(|| EmitError::Unsupported {
                path: path.to_string(),
                detail: "anonymous record was never named".into(),
            })?;
            Ok(ValueShape::Record { type_name: type_name.to_string() })
        }
        TypeExpr::Array(element) => list_shape(ir, names, element, path),
        TypeExpr::Optional(element) => Ok(ValueShape::Optional(Box::new(resolve_shape(
            ir, names, element, path,
        )?))),
    }
}

fn list_shape(
    ir: &Ir,
    names: &NameTable,
    element: &TypeExpr,
    path: &str,
) -> Result<ValueShape, EmitError> {
    match resolve_shape(ir, names, element, path)? {
        ValueShape::Scalar(kind) => Ok(ValueShape::ScalarList(kind)),
        ValueShape::Record { type_name } => Ok(ValueShape::RecordList { type_name }),
        _ => Err(EmitError::Unsupported {
            path: path.to_string(),
            detail: "unsupported array element shape".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeDef;
    use crate::profile::profile_for_id;

    fn sample_ir() -> Ir {
        let mut ir = Ir::new();
        ir.api = crate::ir::ApiInfo {
            name: "ExampleAPI".into(),
            version: "1.0.0".into(),
            default_base_url: "https://example.test/api".into(),
        };
        ir.types.push(TypeDef::scalar("Address", ScalarKind::String, None));
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
        ir
    }

    #[test]
    fn go_and_python_method_specs_match_the_spec_scenario() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();

        let go = build_context(&ir, profile_for_id("go").unwrap(), &names, None).unwrap();
        let method = &go.methods[0];
        assert_eq!(method.emitted_name, "CheckWallet");
        assert_eq!(method.response_type, "CheckWalletResponse");
        assert_eq!(method.params[0].emitted_name, "blockchain");
        assert_eq!(method.params[0].ty, "Address");

        let py = build_context(&ir, profile_for_id("python").unwrap(), &names, None).unwrap();
        let method = &py.methods[0];
        assert_eq!(method.emitted_name, "check_wallet");
        assert_eq!(method.response_type, "CheckWalletResponse");
        assert_eq!(method.params[0].emitted_name, "blockchain");
    }

    #[test]
    fn response_record_declaration_present_for_both_profiles() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();

        for lang in ["go", "python"] {
            let ctx = build_context(&ir, profile_for_id(lang).unwrap(), &names, None).unwrap();
            let record = ctx.declarations.iter().find_map(|d| match d {
                Declaration::Record { name, fields, .. } if name == "CheckWalletResponse" => {
                    Some(fields)
                }
                _ => None,
            });
            let fields = record.expect("CheckWalletResponse declared");
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[0].wire_name, "exists");
            assert_eq!(fields[1].wire_name, "address");
        }
    }

    #[test]
    fn field_names_follow_profile_case() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();

        let go = build_context(&ir, profile_for_id("go").unwrap(), &names, None).unwrap();
        let py = build_context(&ir, profile_for_id("python").unwrap(), &names, None).unwrap();

        let field_names = |ctx: &EmitContext<'_>| -> Vec<String> {
            ctx.declarations
                .iter()
                .find_map(|d| match d {
                    Declaration::Record { name, fields, .. }
                        if name == "CheckWalletResponse" =>
                    {
                        Some(fields.iter().map(|f| f.emitted_name.clone()).collect())
                    }
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(field_names(&go), vec!["Exists", "Address"]);
        assert_eq!(field_names(&py), vec!["exists", "address"]);
    }

    #[test]
    fn base_url_defaults_to_schema_value() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx = build_context(&ir, profile_for_id("go").unwrap(), &names, None).unwrap();
        assert_eq!(ctx.base_url, "https://example.test/api");

        let ctx = build_context(
            &ir,
            profile_for_id("go").unwrap(),
            &names,
            Some("http://localhost:8080"),
        )
        .unwrap();
        assert_eq!(ctx.base_url, "http://localhost:8080");
    }
}
