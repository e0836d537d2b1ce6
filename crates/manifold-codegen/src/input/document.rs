//! Canonical schema document parser and validator.

use serde_json::Value;

use super::SchemaError;
use crate::contract::Contract;
use crate::ir::{
    ApiInfo, EndpointDef, Field, HelperCategory, HelperModule, HttpMethod, Ir, ScalarKind,
    TypeDef, TypeExpr, TypeKind,
};
use crate::merge;
use crate::profile::LanguageProfile;

/// Compose the given documents and parse them into a fully validated [`Ir`].
///
/// `profiles` is the set of configured target languages; reserved-identifier
/// checks and helper language-id checks run against every one of them, so a
/// schema that loads cleanly can be emitted for any subset.
pub fn load_ir(
    documents: Vec<Value>,
    profiles: &[&'static LanguageProfile],
) -> Result<Ir, SchemaError> {
    let composed = merge::merge_documents(documents);
    let parser = Parser { profiles };
    parser.parse(&composed)
}

/// Endpoint settings shared across endpoints and layered under each one.
#[derive(Default)]
struct EndpointDefaults {
    http_method: Option<HttpMethod>,
    request_fields: Vec<Field>,
}

struct Parser<'a> {
    profiles: &'a [&'static LanguageProfile],
}

impl Parser<'_> {
    fn parse(&self, root: &Value) -> Result<Ir, SchemaError> {
        let obj = as_object(root, "$")?;

        let api = self.parse_api(obj.get("api"))?;
        let defaults = match obj.get("endpointDefaults") {
            Some(v) => self.parse_defaults(v)?,
            None => EndpointDefaults::default(),
        };
        let types = match obj.get("types") {
            Some(v) => self.parse_types(v)?,
            None => Vec::new(),
        };
        let endpoints = match obj.get("endpoints") {
            Some(v) => self.parse_endpoints(v, &defaults)?,
            None => Vec::new(),
        };
        let helpers = match obj.get("helpers") {
            Some(v) => self.parse_helpers(v)?,
            None => Vec::new(),
        };

        let ir = Ir { api, types, endpoints, helpers };
        self.validate(&ir)?;
        Ok(ir)
    }

    fn parse_api(&self, value: Option<&Value>) -> Result<ApiInfo, SchemaError> {
        let value = value.ok_or_else(|| SchemaError::new("api", "api section", "nothing"))?;
        let obj = as_object(value, "api")?;
        Ok(ApiInfo {
            name: req_str(obj, "name", "api")?.to_string(),
            version: req_str(obj, "version", "api")?.to_string(),
            default_base_url: req_str(obj, "defaultBaseUrl", "api")?.to_string(),
        })
    }

    fn parse_defaults(&self, value: &Value) -> Result<EndpointDefaults, SchemaError> {
        let obj = as_object(value, "endpointDefaults")?;
        let http_method = match obj.get("httpMethod") {
            Some(v) => Some(parse_http_method(v, "endpointDefaults.httpMethod")?),
            None => None,
        };
        let request_fields = match obj.get("request") {
            Some(v) => {
                match self.parse_type_expr(v, "endpointDefaults.request")? {
                    TypeExpr::Record(fields) => fields,
                    _ => {
                        return Err(SchemaError::new(
                            "endpointDefaults.request",
                            "record",
                            describe(v),
                        ));
                    }
                }
            }
            None => Vec::new(),
        };
        Ok(EndpointDefaults { http_method, request_fields })
    }

    fn parse_types(&self, value: &Value) -> Result<Vec<TypeDef>, SchemaError> {
        let obj = as_object(value, "types")?;
        let mut types = Vec::with_capacity(obj.len());
        for (name, def) in obj {
            types.push(self.parse_type_def(name, def)?);
        }
        Ok(types)
    }

    fn parse_type_def(&self, name: &str, value: &Value) -> Result<TypeDef, SchemaError> {
        let path = format!("types.{name}");
        let obj = as_object(value, &path)?;
        let docs = opt_str(obj, "docs", &path)?.map(String::from);

        let kind = if let Some(scalar) = obj.get("scalar") {
            check_keys(obj, &["scalar", "contract", "docs"], &path)?;
            let kind = parse_scalar_kind(scalar, &format!("{path}.scalar"))?;
            let contract = match obj.get("contract") {
                Some(c) => Some(parse_contract(c, &format!("{path}.contract"))?),
                None => None,
            };
            TypeKind::Scalar(crate::ir::ScalarDef { scalar: kind, contract })
        } else if let Some(record) = obj.get("record") {
            check_keys(obj, &["record", "docs"], &path)?;
            let fields = self.parse_fields(record, &format!("{path}.record"))?;
            TypeKind::Record(crate::ir::RecordDef { fields })
        } else if let Some(variants) = obj.get("enum") {
            check_keys(obj, &["enum", "docs"], &path)?;
            let arr = as_array(variants, &format!("{path}.enum"))?;
            let mut values = Vec::with_capacity(arr.len());
            for (i, v) in arr.iter().enumerate() {
                let item_path = format!("{path}.enum[{i}]");
                values.push(as_str(v, &item_path)?.to_string());
            }
            TypeKind::Enum(crate::ir::EnumDef { variants: values })
        } else if let Some(element) = obj.get("array") {
            check_keys(obj, &["array", "docs"], &path)?;
            let element = self.parse_type_expr(element, &format!("{path}.array"))?;
            TypeKind::Array(crate::ir::ArrayDef { element })
        } else if let Some(element) = obj.get("optional") {
            check_keys(obj, &["optional", "docs"], &path)?;
            let element = self.parse_type_expr(element, &format!("{path}.optional"))?;
            TypeKind::Optional(crate::ir::OptionalDef { element })
        } else {
            return Err(SchemaError::new(
                &path,
                "one of scalar, record, enum, array, optional",
                describe(value),
            ));
        };

        Ok(TypeDef { name: name.to_string(), docs, kind })
    }

    fn parse_type_expr(&self, value: &Value, path: &str) -> Result<TypeExpr, SchemaError> {
        if let Some(s) = value.as_str() {
            // Shorthand: a bare string is a scalar kind, anything else a
            // reference to a named type.
            return Ok(match s {
                "string" => TypeExpr::Scalar(ScalarKind::String),
                "int" => TypeExpr::Scalar(ScalarKind::Int),
                "float" => TypeExpr::Scalar(ScalarKind::Float),
                "bool" => TypeExpr::Scalar(ScalarKind::Bool),
                other => TypeExpr::Ref(other.to_string()),
            });
        }

        let obj = as_object(value, path)?;
        if let Some(scalar) = obj.get("scalar") {
            check_keys(obj, &["scalar"], path)?;
            return Ok(TypeExpr::Scalar(parse_scalar_kind(scalar, &format!("{path}.scalar"))?));
        }
        if let Some(name) = obj.get("ref") {
            check_keys(obj, &["ref"], path)?;
            return Ok(TypeExpr::Ref(as_str(name, &format!("{path}.ref"))?.to_string()));
        }
        if let Some(fields) = obj.get("record") {
            check_keys(obj, &["record"], path)?;
            return Ok(TypeExpr::Record(self.parse_fields(fields, &format!("{path}.record"))?));
        }
        if let Some(element) = obj.get("array") {
            check_keys(obj, &["array"], path)?;
            let element = self.parse_type_expr(element, &format!("{path}.array"))?;
            return Ok(TypeExpr::Array(Box::new(element)));
        }
        if let Some(element) = obj.get("optional") {
            check_keys(obj, &["optional"], path)?;
            let element = self.parse_type_expr(element, &format!("{path}.optional"))?;
            return Ok(TypeExpr::Optional(Box::new(element)));
        }
        Err(SchemaError::new(path, "type expression", describe(value)))
    }

    fn parse_fields(&self, value: &Value, path: &str) -> Result<Vec<Field>, SchemaError> {
        let arr = as_array(value, path)?;
        let mut fields = Vec::with_capacity(arr.len());
        for (i, item) in arr.iter().enumerate() {
            let item_path = format!("{path}[{i}]");
            let obj = as_object(item, &item_path)?;
            check_keys(obj, &["name", "type", "required", "docs"], &item_path)?;
            let name = req_str(obj, "name", &item_path)?.to_string();
            if fields.iter().any(|f: &Field| f.name == name) {
                return Err(SchemaError::new(&item_path, "unique field name", name));
            }
            let ty = self.parse_type_expr(
                obj.get("type").ok_or_else(|| {
                    SchemaError::new(&item_path, "type key", "nothing")
                })?,
                &format!("{item_path}.type"),
            )?;
            let required = match obj.get("required") {
                Some(v) => as_bool(v, &format!("{item_path}.required"))?,
                None => true,
            };
            let docs = opt_str(obj, "docs", &item_path)?.map(String::from);
            fields.push(Field { name, ty, required, docs });
        }
        Ok(fields)
    }

    fn parse_endpoints(
        &self,
        value: &Value,
        defaults: &EndpointDefaults,
    ) -> Result<Vec<EndpointDef>, SchemaError> {
        let obj = as_object(value, "endpoints")?;
        let mut endpoints = Vec::with_capacity(obj.len());
        for (name, def) in obj {
            endpoints.push(self.parse_endpoint(name, def, defaults)?);
        }
        Ok(endpoints)
    }

    fn parse_endpoint(
        &self,
        name: &str,
        value: &Value,
        defaults: &EndpointDefaults,
    ) -> Result<EndpointDef, SchemaError> {
        let path = format!("endpoints.{name}");
        let obj = as_object(value, &path)?;
        check_keys(
            obj,
            &[
                "category",
                "path",
                "httpMethod",
                "request",
                "response",
                "exampleRequest",
                "exampleResponse",
                "docs",
                "defaults",
            ],
            &path,
        )?;

        let http_method = match obj.get("httpMethod") {
            Some(v) => parse_http_method(v, &format!("{path}.httpMethod"))?,
            None => defaults.http_method.unwrap_or(HttpMethod::Post),
        };
        let endpoint_path = match opt_str(obj, "path", &path)? {
            Some(p) => p.to_string(),
            None => format!("/{name}"),
        };
        let use_defaults = match obj.get("defaults") {
            Some(v) => as_bool(v, &format!("{path}.defaults"))?,
            None => true,
        };

        let mut request = match obj.get("request") {
            Some(v) => self.parse_type_expr(v, &format!("{path}.request"))?,
            None => TypeExpr::Record(Vec::new()),
        };
        if use_defaults && !defaults.request_fields.is_empty() {
            request = match request {
                TypeExpr::Record(own) => {
                    TypeExpr::Record(merge_fields(&defaults.request_fields, own))
                }
                other => other,
            };
        }

        let response = self.parse_type_expr(
            obj.get("response")
                .ok_or_else(|| SchemaError::new(&path, "response schema", "nothing"))?,
            &format!("{path}.response"),
        )?;

        Ok(EndpointDef {
            canonical_name: name.to_string(),
            http_method,
            path: endpoint_path,
            category: opt_str(obj, "category", &path)?.map(String::from),
            request,
            response,
            example_request: obj.get("exampleRequest").cloned(),
            example_response: obj.get("exampleResponse").cloned(),
            docs: opt_str(obj, "docs", &path)?.map(String::from),
        })
    }

    fn parse_helpers(&self, value: &Value) -> Result<Vec<HelperModule>, SchemaError> {
        let obj = as_object(value, "helpers")?;
        let mut helpers = Vec::with_capacity(obj.len());
        for (name, def) in obj {
            let path = format!("helpers.{name}");
            let def_obj = as_object(def, &path)?;
            check_keys(def_obj, &["category", "docs", "perLanguage"], &path)?;
            let category = parse_helper_category(
                def_obj
                    .get("category")
                    .ok_or_else(|| SchemaError::new(&path, "category", "nothing"))?,
                &format!("{path}.category"),
            )?;
            let per_language_val = def_obj
                .get("perLanguage")
                .ok_or_else(|| SchemaError::new(&path, "perLanguage map", "nothing"))?;
            let per_language_obj = as_object(per_language_val, &format!("{path}.perLanguage"))?;
            let mut per_language = std::collections::BTreeMap::new();
            for (lang, fragment) in per_language_obj {
                let frag_path = format!("{path}.perLanguage.{lang}");
                per_language.insert(lang.clone(), as_str(fragment, &frag_path)?.to_string());
            }
            helpers.push(HelperModule {
                name: name.to_string(),
                category,
                docs: opt_str(def_obj, "docs", &path)?.map(String::from),
                per_language,
            });
        }
        Ok(helpers)
    }

    // === Whole-IR validation ===

    fn validate(&self, ir: &Ir) -> Result<(), SchemaError> {
        for ty in &ir.types {
            if matches!(ty.name.as_str(), "string" | "int" | "float" | "bool") {
                return Err(SchemaError::new(
                    format!("types.{}", ty.name),
                    "type name distinct from scalar kinds",
                    ty.name.clone(),
                ));
            }
            if let TypeKind::Scalar(def) = &ty.kind {
                if let Some(contract) = &def.contract {
                    contract.validate().map_err(|e| {
                        SchemaError::new(
                            format!("types.{}.contract", ty.name),
                            "well-formed contract",
                            e.to_string(),
                        )
                    })?;
                }
            }
        }

        self.check_refs(ir)?;
        self.check_cycles(ir)?;
        self.check_reserved(ir)?;
        self.check_helper_languages(ir)?;
        self.check_examples(ir)?;
        Ok(())
    }

    fn check_refs(&self, ir: &Ir) -> Result<(), SchemaError> {
        for ty in &ir.types {
            for (path, expr) in type_def_exprs(ty) {
                self.check_refs_in(ir, expr, &path)?;
            }
        }
        for ep in &ir.endpoints {
            let base = format!("endpoints.{}", ep.canonical_name);
            self.check_refs_in(ir, &ep.request, &format!("{base}.request"))?;
            self.check_refs_in(ir, &ep.response, &format!("{base}.response"))?;
        }
        Ok(())
    }

    fn check_refs_in(&self, ir: &Ir, expr: &TypeExpr, path: &str) -> Result<(), SchemaError> {
        match expr {
            TypeExpr::Ref(name) => {
                if ir.type_def(name).is_none() {
                    return Err(SchemaError::new(
                        path,
                        "reference to a declared type",
                        format!("unresolved reference {name:?}"),
                    ));
                }
                Ok(())
            }
            TypeExpr::Record(fields) => {
                for field in fields {
                    self.check_refs_in(ir, &field.ty, &format!("{path}.{}", field.name))?;
                }
                Ok(())
            }
            TypeExpr::Array(element) | TypeExpr::Optional(element) => {
                self.check_refs_in(ir, element, path)
            }
            TypeExpr::Scalar(_) => Ok(()),
        }
    }

    /// Reject reference cycles among named types: every record reachable
    /// from an endpoint schema must terminate in scalars/enums within a
    /// finite unrolling.
    fn check_cycles(&self, ir: &Ir) -> Result<(), SchemaError> {
        const UNSEEN: u8 = 0;
        const ACTIVE: u8 = 1;
        const DONE: u8 = 2;

        fn refs_of(ty: &TypeDef, out: &mut Vec<String>) {
            for (_, expr) in type_def_exprs(ty) {
                collect_refs(expr, out);
            }
        }

        fn visit(
            ir: &Ir,
            name: &str,
            state: &mut std::collections::BTreeMap<String, u8>,
        ) -> Option<String> {
            match state.get(name).copied().unwrap_or(UNSEEN) {
                ACTIVE => return Some(name.to_string()),
                DONE => return None,
                _ => {}
            }
            state.insert(name.to_string(), ACTIVE);
            if let Some(ty) = ir.type_def(name) {
                let mut refs = Vec::new();
                refs_of(ty, &mut refs);
                for r in refs {
                    if let Some(cycle) = visit(ir, &r, state) {
                        return Some(cycle);
                    }
                }
            }
            state.insert(name.to_string(), DONE);
            None
        }

        let mut state = std::collections::BTreeMap::new();
        for ty in &ir.types {
            if let Some(name) = visit(ir, &ty.name, &mut state) {
                return Err(SchemaError::new(
                    format!("types.{name}"),
                    "acyclic type references",
                    format!("cycle through {name:?}"),
                ));
            }
        }
        Ok(())
    }

    /// No emitted field, parameter or method name may collide with a
    /// reserved identifier in any configured language.
    fn check_reserved(&self, ir: &Ir) -> Result<(), SchemaError> {
        let mut fields: Vec<(String, String)> = Vec::new();
        for ty in &ir.types {
            for (path, expr) in type_def_exprs(ty) {
                collect_fields(expr, &path, &mut fields);
            }
        }
        for ep in &ir.endpoints {
            let base = format!("endpoints.{}", ep.canonical_name);
            collect_fields(&ep.request, &format!("{base}.request"), &mut fields);
            collect_fields(&ep.response, &format!("{base}.response"), &mut fields);
        }

        for profile in self.profiles {
            for (path, wire) in &fields {
                let emitted = profile.field_name(wire);
                if profile.is_reserved(&emitted) {
                    return Err(SchemaError::new(
                        path,
                        format!("field name legal in {}", profile.id),
                        format!("{wire:?} emits reserved identifier {emitted:?}"),
                    ));
                }
            }
            for ep in &ir.endpoints {
                if let TypeExpr::Record(params) = &ep.request {
                    for param in params {
                        let emitted = profile.param_name(&param.name);
                        if profile.is_reserved(&emitted) {
                            return Err(SchemaError::new(
                                format!("endpoints.{}.request.{}", ep.canonical_name, param.name),
                                format!("parameter name legal in {}", profile.id),
                                format!("reserved identifier {emitted:?}"),
                            ));
                        }
                    }
                }
            }

            let mut seen: std::collections::BTreeMap<String, String> =
                std::collections::BTreeMap::new();
            let methods = ir
                .endpoints
                .iter()
                .map(|e| (e.canonical_name.clone(), "endpoints"))
                .chain(ir.helpers.iter().map(|h| (h.name.clone(), "helpers")));
            for (canonical, section) in methods {
                let emitted = profile.method_name(&canonical);
                if profile.is_reserved(&emitted) {
                    return Err(SchemaError::new(
                        format!("{section}.{canonical}"),
                        format!("method name legal in {}", profile.id),
                        format!("reserved identifier {emitted:?}"),
                    ));
                }
                if let Some(previous) = seen.insert(emitted.clone(), canonical.clone()) {
                    return Err(SchemaError::new(
                        format!("{section}.{canonical}"),
                        format!("unique {} method name", profile.id),
                        format!("{previous:?} and {canonical:?} both emit {emitted:?}"),
                    ));
                }
            }
        }
        Ok(())
    }

    fn check_helper_languages(&self, ir: &Ir) -> Result<(), SchemaError> {
        for helper in &ir.helpers {
            for lang in helper.per_language.keys() {
                if !self.profiles.iter().any(|p| p.id == *lang) {
                    return Err(SchemaError::new(
                        format!("helpers.{}.perLanguage.{lang}", helper.name),
                        "configured language id",
                        lang.clone(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn check_examples(&self, ir: &Ir) -> Result<(), SchemaError> {
        for ep in &ir.endpoints {
            let base = format!("endpoints.{}", ep.canonical_name);
            if let Some(example) = &ep.example_request {
                self.check_value(ir, &ep.request, example, &format!("{base}.exampleRequest"))?;
            }
            if let Some(example) = &ep.example_response {
                self.check_value(ir, &ep.response, example, &format!("{base}.exampleResponse"))?;
            }
        }
        Ok(())
    }

    /// Structural check of an example value against a type expression,
    /// including contract predicates on referenced scalars.
    fn check_value(
        &self,
        ir: &Ir,
        expr: &TypeExpr,
        value: &Value,
        path: &str,
    ) -> Result<(), SchemaError> {
        match expr {
            TypeExpr::Scalar(kind) => check_scalar(*kind, value, path),
            TypeExpr::Ref(name) => {
                let ty = ir.type_def(name).ok_or_else(|| {
                    SchemaError::new(path, "declared type", format!("unresolved {name:?}"))
                })?;
                match &ty.kind {
                    TypeKind::Scalar(def) => {
                        check_scalar(def.scalar, value, path)?;
                        if let Some(contract) = &def.contract {
                            if !contract.check(value) {
                                return Err(SchemaError::new(
                                    path,
                                    contract.describe(),
                                    describe(value),
                                ));
                            }
                        }
                        Ok(())
                    }
                    TypeKind::Enum(def) => {
                        let s = value.as_str().ok_or_else(|| {
                            SchemaError::new(path, "enum string", describe(value))
                        })?;
                        if !def.variants.iter().any(|v| v == s) {
                            return Err(SchemaError::new(
                                path,
                                format!("one of {}", def.variants.join(", ")),
                                describe(value),
                            ));
                        }
                        Ok(())
                    }
                    TypeKind::Record(def) => self.check_record(ir, &def.fields, value, path),
                    TypeKind::Array(def) => self.check_value(
                        ir,
                        &TypeExpr::Array(Box::new(def.element.clone())),
                        value,
                        path,
                    ),
                    TypeKind::Optional(def) => self.check_value(
                        ir,
                        &TypeExpr::Optional(Box::new(def.element.clone())),
                        value,
                        path,
                    ),
                }
            }
            TypeExpr::Record(fields) => self.check_record(ir, fields, value, path),
            TypeExpr::Array(element) => {
                let arr = as_array(value, path)?;
                for (i, item) in arr.iter().enumerate() {
                    self.check_value(ir, element, item, &format!("{path}[{i}]"))?;
                }
                Ok(())
            }
            TypeExpr::Optional(element) => {
                if value.is_null() {
                    return Ok(());
                }
                self.check_value(ir, element, value, path)
            }
        }
    }

    fn check_record(
        &self,
        ir: &Ir,
        fields: &[Field],
        value: &Value,
        path: &str,
    ) -> Result<(), SchemaError> {
        let obj = as_object(value, path)?;
        for field in fields {
            match obj.get(&field.name) {
                Some(v) => {
                    self.check_value(ir, &field.ty, v, &format!("{path}.{}", field.name))?
                }
                None if field.required => {
                    return Err(SchemaError::new(
                        path,
                        format!("required field {:?}", field.name),
                        "nothing",
                    ));
                }
                None => {}
            }
        }
        for key in obj.keys() {
            if !fields.iter().any(|f| &f.name == key) {
                return Err(SchemaError::new(
                    format!("{path}.{key}"),
                    "declared field",
                    format!("unknown field {key:?}"),
                ));
            }
        }
        Ok(())
    }
}

/// All type expressions inside a named type definition, with their paths.
fn type_def_exprs(ty: &TypeDef) -> Vec<(String, &TypeExpr)> {
    let base = format!("types.{}", ty.name);
    match &ty.kind {
        TypeKind::Record(def) => def
            .fields
            .iter()
            .map(|f| (format!("{base}.{}", f.name), &f.ty))
            .collect(),
        TypeKind::Array(def) => vec![(base, &def.element)],
        TypeKind::Optional(def) => vec![(base, &def.element)],
        TypeKind::Scalar(_) | TypeKind::Enum(_) => Vec::new(),
    }
}

fn collect_refs(expr: &TypeExpr, out: &mut Vec<String>) {
    match expr {
        TypeExpr::Ref(name) => out.push(name.clone()),
        TypeExpr::Record(fields) => {
            for field in fields {
                collect_refs(&field.ty, out);
            }
        }
        TypeExpr::Array(element) | TypeExpr::Optional(element) => collect_refs(element, out),
        TypeExpr::Scalar(_) => {}
    }
}

fn collect_fields<'a>(expr: &'a TypeExpr, path: &str, out: &mut Vec<(String, String)>) {
    match expr {
        TypeExpr::Record(fields) => {
            for field in fields {
                let field_path = format!("{path}.{}", field.name);
                out.push((field_path.clone(), field.name.clone()));
                collect_fields(&field.ty, &field_path, out);
            }
        }
        TypeExpr::Array(element) | TypeExpr::Optional(element) => {
            collect_fields(element, path, out)
        }
        TypeExpr::Scalar(_) | TypeExpr::Ref(_) => {}
    }
}

/// Layer endpoint-specific fields over the shared defaults: an endpoint
/// field with the same name replaces the default in place, new fields
/// append.
fn merge_fields(base: &[Field], own: Vec<Field>) -> Vec<Field> {
    let mut fields = base.to_vec();
    for field in own {
        match fields.iter_mut().find(|f| f.name == field.name) {
            Some(slot) => *slot = field,
            None => fields.push(field),
        }
    }
    fields
}

fn check_scalar(kind: ScalarKind, value: &Value, path: &str) -> Result<(), SchemaError> {
    let ok = match kind {
        ScalarKind::String => value.is_string(),
        ScalarKind::Int => value.is_i64() || value.is_u64(),
        ScalarKind::Float => value.is_number(),
        ScalarKind::Bool => value.is_boolean(),
    };
    if ok {
        Ok(())
    } else {
        Err(SchemaError::new(path, kind.as_str(), describe(value)))
    }
}

fn parse_scalar_kind(value: &Value, path: &str) -> Result<ScalarKind, SchemaError> {
    match as_str(value, path)? {
        "string" => Ok(ScalarKind::String),
        "int" => Ok(ScalarKind::Int),
        "float" => Ok(ScalarKind::Float),
        "bool" => Ok(ScalarKind::Bool),
        other => Err(SchemaError::new(path, "string, int, float or bool", other)),
    }
}

fn parse_http_method(value: &Value, path: &str) -> Result<HttpMethod, SchemaError> {
    match as_str(value, path)? {
        "GET" => Ok(HttpMethod::Get),
        "POST" => Ok(HttpMethod::Post),
        other => Err(SchemaError::new(path, "GET or POST", other)),
    }
}

fn parse_helper_category(value: &Value, path: &str) -> Result<HelperCategory, SchemaError> {
    match as_str(value, path)? {
        "config" => Ok(HelperCategory::Config),
        "utility" => Ok(HelperCategory::Utility),
        "encoding" => Ok(HelperCategory::Encoding),
        "crypto" => Ok(HelperCategory::Crypto),
        "errorHandling" => Ok(HelperCategory::ErrorHandling),
        other => Err(SchemaError::new(
            path,
            "config, utility, encoding, crypto or errorHandling",
            other,
        )),
    }
}

fn parse_contract(value: &Value, path: &str) -> Result<Contract, SchemaError> {
    serde_json::from_value(value.clone())
        .map_err(|e| SchemaError::new(path, "contract predicate", e.to_string()))
}

// === Small JSON access helpers ===

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

fn as_object<'v>(
    value: &'v Value,
    path: &str,
) -> Result<&'v serde_json::Map<String, Value>, SchemaError> {
    value
        .as_object()
        .ok_or_else(|| SchemaError::new(path, "object", describe(value)))
}

fn as_array<'v>(value: &'v Value, path: &str) -> Result<&'v Vec<Value>, SchemaError> {
    value
        .as_array()
        .ok_or_else(|| SchemaError::new(path, "array", describe(value)))
}

fn as_str<'v>(value: &'v Value, path: &str) -> Result<&'v str, SchemaError> {
    value
        .as_str()
        .ok_or_else(|| SchemaError::new(path, "string", describe(value)))
}

fn as_bool(value: &Value, path: &str) -> Result<bool, SchemaError> {
    value
        .as_bool()
        .ok_or_else(|| SchemaError::new(path, "boolean", describe(value)))
}

fn req_str<'v>(
    obj: &'v serde_json::Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'v str, SchemaError> {
    let value = obj
        .get(key)
        .ok_or_else(|| SchemaError::new(format!("{path}.{key}"), "string", "nothing"))?;
    as_str(value, &format!("{path}.{key}"))
}

fn opt_str<'v>(
    obj: &'v serde_json::Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<&'v str>, SchemaError> {
    match obj.get(key) {
        Some(value) => Ok(Some(as_str(value, &format!("{path}.{key}"))?)),
        None => Ok(None),
    }
}

fn check_keys(
    obj: &serde_json::Map<String, Value>,
    allowed: &[&str],
    path: &str,
) -> Result<(), SchemaError> {
    for key in obj.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(SchemaError::new(
                format!("{path}.{key}"),
                format!("one of {}", allowed.join(", ")),
                format!("unknown key {key:?}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile;
    use serde_json::json;

    fn minimal_doc() -> Value {
        json!({
            "api": {
                "name": "ExampleAPI",
                "version": "1.0.0",
                "defaultBaseUrl": "https://example.test/api"
            },
            "types": {
                "Address": {
                    "scalar": "string",
                    "contract": {"all": [
                        {"matches": "^(0x)?[0-9a-fA-F]+$"},
                        {"lengthIn": [64, 66]}
                    ]}
                }
            },
            "endpoints": {
                "checkWallet": {
                    "category": "wallet",
                    "request": {"record": [
                        {"name": "Blockchain", "type": "Address"},
                        {"name": "Address", "type": "Address"}
                    ]},
                    "response": {"record": [
                        {"name": "exists", "type": "bool"},
                        {"name": "address", "type": "Address"}
                    ]}
                }
            }
        })
    }

    fn load(doc: Value) -> Result<Ir, SchemaError> {
        load_ir(vec![doc], profile::profiles())
    }

    #[test]
    fn minimal_schema_loads() {
        let ir = load(minimal_doc()).unwrap();
        assert_eq!(ir.api.name, "ExampleAPI");
        assert_eq!(ir.endpoints.len(), 1);
        assert_eq!(ir.endpoints[0].path, "/checkWallet");
        assert_eq!(ir.endpoints[0].http_method, HttpMethod::Post);
    }

    #[test]
    fn endpoint_defaults_prepend_and_override() {
        let mut doc = minimal_doc();
        let defaults = json!({
            "httpMethod": "POST",
            "request": {"record": [
                {"name": "Blockchain", "type": "Address", "docs": "chain id"}
            ]}
        });
        doc["endpointDefaults"] = defaults;
        doc["endpoints"]["checkWallet"]["request"] = json!({"record": [
            {"name": "Address", "type": "Address"},
            {"name": "Blockchain", "type": "string"}
        ]});

        let ir = load(doc).unwrap();
        let request = &ir.endpoints[0].request;
        let TypeExpr::Record(fields) = request else {
            panic!("expected record request");
        };
        // Default position kept, endpoint definition wins.
        assert_eq!(fields[0].name, "Blockchain");
        assert!(matches!(fields[0].ty, TypeExpr::Scalar(ScalarKind::String)));
        assert_eq!(fields[1].name, "Address");
    }

    #[test]
    fn unresolved_ref_reports_exact_path() {
        let mut doc = minimal_doc();
        doc["endpoints"]["checkWallet"]["response"] = json!({"record": [
            {"name": "wallet", "type": "Wallet"}
        ]});
        let err = load(doc).unwrap_err();
        assert_eq!(err.path, "endpoints.checkWallet.response.wallet");
        assert!(err.actual.contains("Wallet"));
    }

    #[test]
    fn reference_cycles_rejected() {
        let mut doc = minimal_doc();
        doc["types"]["Node"] = json!({"record": [
            {"name": "Child", "type": "Node"}
        ]});
        let err = load(doc).unwrap_err();
        assert_eq!(err.expected, "acyclic type references");
    }

    #[test]
    fn reserved_field_names_rejected() {
        let mut doc = minimal_doc();
        // "From" snake-cases to the Python keyword "from".
        doc["endpoints"]["checkWallet"]["request"] = json!({"record": [
            {"name": "From", "type": "Address"}
        ]});
        let err = load(doc).unwrap_err();
        assert!(err.path.ends_with("request.From"));
        assert!(err.actual.contains("from"));
    }

    #[test]
    fn malformed_contract_rejected() {
        let mut doc = minimal_doc();
        doc["types"]["Address"]["contract"] = json!({"matches": "(unclosed"});
        let err = load(doc).unwrap_err();
        assert_eq!(err.path, "types.Address.contract");
        assert_eq!(err.expected, "well-formed contract");
    }

    #[test]
    fn example_violating_contract_rejected() {
        let mut doc = minimal_doc();
        doc["endpoints"]["checkWallet"]["exampleRequest"] = json!({
            "Blockchain": "zz",
            "Address": "zz"
        });
        let err = load(doc).unwrap_err();
        assert!(err.path.starts_with("endpoints.checkWallet.exampleRequest"));
    }

    #[test]
    fn conforming_example_accepted() {
        let mut doc = minimal_doc();
        let hex = "a".repeat(64);
        doc["endpoints"]["checkWallet"]["exampleRequest"] = json!({
            "Blockchain": hex,
            "Address": hex
        });
        doc["endpoints"]["checkWallet"]["exampleResponse"] = json!({
            "exists": true,
            "address": hex
        });
        load(doc).unwrap();
    }

    #[test]
    fn unknown_helper_language_rejected() {
        let mut doc = minimal_doc();
        doc["helpers"] = json!({
            "getError": {
                "category": "errorHandling",
                "perLanguage": {"cobol": "..."}
            }
        });
        let err = load(doc).unwrap_err();
        assert_eq!(err.path, "helpers.getError.perLanguage.cobol");
    }

    #[test]
    fn documents_merge_before_parsing() {
        let base = minimal_doc();
        let overlay = json!({
            "api": {"version": "2.0.0"},
            "endpoints": {
                "checkWallet": {"docs": "Check whether a wallet exists."}
            }
        });
        let ir = load_ir(vec![base, overlay], profile::profiles()).unwrap();
        assert_eq!(ir.api.version, "2.0.0");
        assert_eq!(
            ir.endpoints[0].docs.as_deref(),
            Some("Check whether a wallet exists.")
        );
    }
}
