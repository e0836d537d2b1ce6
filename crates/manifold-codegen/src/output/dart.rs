//! Dart output backend.
//!
//! Emits `client.dart` (package:http client with `Future` methods),
//! `types.dart` (typedefs, enums and data classes with `fromJson`
//! factories) and `client_test.dart` (script scaffold against a mock
//! server).

use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::emit::{Declaration, EmitContext, EmitError, FieldDecl, MethodSpec, ValueShape};
use crate::ir::ScalarKind;
use crate::output::{indent_fragment, json_literal};
use crate::profile::LanguageProfile;
use crate::traits::Backend;

pub struct DartBackend;

pub static DART_BACKEND: DartBackend = DartBackend;

impl Backend for DartBackend {
    fn profile(&self) -> &'static LanguageProfile {
        &crate::profiles::dart::PROFILE
    }

    fn generate(&self, ctx: &EmitContext<'_>) -> Result<Vec<GeneratedArtifact>, EmitError> {
        let profile = self.profile();
        Ok(vec![
            GeneratedArtifact::new(self.id(), ArtifactKind::ClientSource, profile.client_file, client(ctx)),
            GeneratedArtifact::new(self.id(), ArtifactKind::TypeDeclarations, profile.types_file, types(ctx)),
            GeneratedArtifact::new(self.id(), ArtifactKind::TestScaffold, profile.test_file, scaffold(ctx)),
        ])
    }
}

fn string_literal(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'").replace('$', "\\$"))
}

fn literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => string_literal(s),
        other => json_literal(other),
    }
}

fn client(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();

    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str("import 'dart:convert';\n");
    out.push_str("import 'dart:typed_data';\n\n");
    out.push_str("import 'package:crypto/crypto.dart' as crypto;\n");
    out.push_str("import 'package:http/http.dart' as http;\n");
    out.push_str("import 'package:pointycastle/export.dart' as pc;\n\n");
    out.push_str("import 'types.dart';\n\n");

    out.push_str(&format!("/// Generated client for the {} API.\n", ctx.ir.api.name));
    out.push_str(&format!("class {class} {{\n"));
    out.push_str(&format!(
        "  {class}({{String? baseUrl}}) : _nagUrl = baseUrl ?? {};\n\n",
        string_literal(&ctx.base_url)
    ));
    out.push_str("  String _nagUrl;\n");
    out.push_str("  String _nagKey = '';\n");
    out.push_str(&format!(
        "  final String _version = {};\n",
        string_literal(&ctx.version)
    ));
    out.push_str("  String _lastError = '';\n\n");

    out.push_str("  Future<dynamic> _post(String path, Map<String, dynamic> payload) async {\n");
    out.push_str("    payload['Version'] = _version;\n");
    out.push_str("    final response = await http.post(\n");
    out.push_str("      Uri.parse('$_nagUrl$path'),\n");
    out.push_str("      headers: {'Content-Type': 'application/json'},\n");
    out.push_str("      body: jsonEncode(payload),\n");
    out.push_str("    );\n");
    out.push_str("    final envelope = jsonDecode(response.body) as Map<String, dynamic>;\n");
    out.push_str("    if (envelope['Result'] != 200) {\n");
    out.push_str("      _lastError = 'request failed with result ${envelope['Result']}';\n");
    out.push_str("      throw StateError(_lastError);\n");
    out.push_str("    }\n");
    out.push_str("    return envelope['Response'];\n");
    out.push_str("  }\n");

    for method in &ctx.methods {
        out.push('\n');
        out.push_str(&render_method(method));
    }

    for helper in &ctx.helpers {
        out.push('\n');
        out.push_str(&indent_fragment(&helper.fragment, ctx.profile.helper_indent));
    }

    out.push_str("}\n");
    out
}

fn render_method(method: &MethodSpec) -> String {
    let mut out = String::new();
    if let Some(docs) = &method.docs {
        out.push_str(&format!("  /// {docs}\n"));
    }

    let required: Vec<String> = method
        .params
        .iter()
        .filter(|p| p.required)
        .map(|p| format!("{} {}", p.ty, p.emitted_name))
        .collect();
    let optional: Vec<String> = method
        .params
        .iter()
        .filter(|p| !p.required)
        .map(|p| {
            let ty = if p.ty.ends_with('?') { p.ty.clone() } else { format!("{}?", p.ty) };
            format!("{ty} {}", p.emitted_name)
        })
        .collect();
    let mut signature = required.join(", ");
    if !optional.is_empty() {
        if !signature.is_empty() {
            signature.push_str(", ");
        }
        signature.push_str(&format!("[{}]", optional.join(", ")));
    }

    out.push_str(&format!(
        "  Future<{}> {}({signature}) async {{\n",
        method.response_type, method.emitted_name
    ));
    out.push_str("    final payload = <String, dynamic>{\n");
    for param in method.params.iter().filter(|p| p.required) {
        out.push_str(&format!(
            "      {}: {},\n",
            string_literal(&param.wire_name),
            param.emitted_name
        ));
    }
    out.push_str("    };\n");
    for param in method.params.iter().filter(|p| !p.required) {
        out.push_str(&format!("    if ({} != null) {{\n", param.emitted_name));
        out.push_str(&format!(
            "      payload[{}] = {};\n",
            string_literal(&param.wire_name),
            param.emitted_name
        ));
        out.push_str("    }\n");
    }
    out.push_str(&decode_response(method));
    out.push_str("  }\n");
    out
}

fn decode_response(method: &MethodSpec) -> String {
    let call = format!("await _post({}, payload)", string_literal(&method.path));
    let shape = match &method.response_shape {
        ValueShape::Optional(inner) => inner.as_ref(),
        other => other,
    };
    match shape {
        ValueShape::Record { type_name } => format!(
            "    return {type_name}.fromJson({call} as Map<String, dynamic>);\n"
        ),
        ValueShape::Scalar(kind) => match kind {
            ScalarKind::String => format!("    return {call} as String;\n"),
            ScalarKind::Int => format!("    return ({call} as num).toInt();\n"),
            ScalarKind::Float => format!("    return ({call} as num).toDouble();\n"),
            ScalarKind::Bool => format!("    return {call} as bool;\n"),
        },
        ValueShape::Enum { type_name, .. } => format!(
            "    return {type_name}.values.byName({call} as String);\n"
        ),
        ValueShape::RecordList { type_name } => {
            let mut out = String::new();
            out.push_str(&format!("    final response = {call} as List<dynamic>;\n"));
            out.push_str("    return response\n");
            out.push_str(&format!(
                "        .map((item) => {type_name}.fromJson(item as Map<String, dynamic>))\n"
            ));
            out.push_str("        .toList();\n");
            out
        }
        ValueShape::ScalarList(kind) => {
            let target = dart_scalar(*kind);
            format!("    return ({call} as List<dynamic>).cast<{target}>();\n")
        }
        ValueShape::Optional(_) => format!("    return {call};\n"),
    }
}

fn dart_scalar(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => "String",
        ScalarKind::Int => "int",
        ScalarKind::Float => "double",
        ScalarKind::Bool => "bool",
    }
}

fn types(ctx: &EmitContext<'_>) -> String {
    let mut out = String::new();
    out.push_str("// Generated by manifold. Do not edit.\n");

    for decl in &ctx.declarations {
        out.push('\n');
        match decl {
            Declaration::Alias { name, ty, docs } => {
                if let Some(docs) = docs {
                    out.push_str(&format!("/// {docs}\n"));
                }
                out.push_str(&format!("typedef {name} = {ty};\n"));
            }
            Declaration::Enum { name, variants, docs } => {
                if let Some(docs) = docs {
                    out.push_str(&format!("/// {docs}\n"));
                }
                out.push_str(&format!("enum {name} {{ {} }}\n", variants.join(", ")));
            }
            Declaration::Record { name, fields, docs } => {
                if let Some(docs) = docs {
                    out.push_str(&format!("/// {docs}\n"));
                }
                out.push_str(&format!("class {name} {{\n"));

                let ctor_params: Vec<String> = fields
                    .iter()
                    .map(|f| {
                        if f.required {
                            format!("required this.{}", f.emitted_name)
                        } else {
                            format!("this.{}", f.emitted_name)
                        }
                    })
                    .collect();
                if ctor_params.is_empty() {
                    out.push_str(&format!("  {name}();\n\n"));
                } else {
                    out.push_str(&format!("  {name}({{{}}});\n\n", ctor_params.join(", ")));
                }

                out.push_str(&format!(
                    "  factory {name}.fromJson(Map<String, dynamic> json) {{\n"
                ));
                out.push_str(&format!("    return {name}(\n"));
                for field in fields {
                    out.push_str(&format!(
                        "      {}: {},\n",
                        field.emitted_name,
                        decode_field(field)
                    ));
                }
                out.push_str("    );\n");
                out.push_str("  }\n\n");

                for field in fields {
                    let ty = field_type(field);
                    out.push_str(&format!("  final {ty} {};\n", field.emitted_name));
                }
                out.push_str("}\n");
            }
        }
    }
    out
}

fn field_type(field: &FieldDecl) -> String {
    if field.required || field.ty.ends_with('?') {
        field.ty.clone()
    } else {
        format!("{}?", field.ty)
    }
}

fn decode_field(field: &FieldDecl) -> String {
    let key = string_literal(&field.wire_name);
    let optional = !field.required || matches!(field.shape, ValueShape::Optional(_));
    let shape = match &field.shape {
        ValueShape::Optional(inner) => inner.as_ref(),
        other => other,
    };
    let decode = match shape {
        ValueShape::Scalar(ScalarKind::String) => format!("json[{key}] as String"),
        ValueShape::Scalar(ScalarKind::Int) => format!("(json[{key}] as num).toInt()"),
        ValueShape::Scalar(ScalarKind::Float) => format!("(json[{key}] as num).toDouble()"),
        ValueShape::Scalar(ScalarKind::Bool) => format!("json[{key}] as bool"),
        ValueShape::Enum { type_name, .. } => {
            format!("{type_name}.values.byName(json[{key}] as String)")
        }
        ValueShape::Record { type_name } => {
            format!("{type_name}.fromJson(json[{key}] as Map<String, dynamic>)")
        }
        ValueShape::ScalarList(kind) => {
            format!("(json[{key}] as List<dynamic>).cast<{}>()", dart_scalar(*kind))
        }
        ValueShape::RecordList { type_name } => format!(
            "(json[{key}] as List<dynamic>).map((item) => {type_name}.fromJson(item as Map<String, dynamic>)).toList()"
        ),
        ValueShape::Optional(_) => format!("json[{key}]"),
    };
    if optional {
        format!("json[{key}] == null ? null : {decode}")
    } else {
        decode
    }
}

fn scaffold(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();
    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str("import 'dart:io';\n\n");
    out.push_str("import 'client.dart';\n\n");
    out.push_str("Future<void> main() async {\n");
    out.push_str(
        "  final baseUrl = Platform.environment['MOCK_SERVER_URL'] ?? 'http://localhost:8080';\n",
    );
    out.push_str(&format!("  final client = {class}(baseUrl: baseUrl);\n\n"));

    for method in &ctx.methods {
        let args: Vec<String> = method
            .params
            .iter()
            .map(|p| literal(&ctx.sample_value(method, p)))
            .collect();
        out.push_str(&format!("  await client.{}({});\n", method.emitted_name, args.join(", ")));
    }

    out.push_str(&format!(
        "\n  print('ok: {} methods exercised');\n",
        ctx.methods.len()
    ));
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::NameTable;
    use crate::emit::build_context;
    use crate::ir::{EndpointDef, Field, HttpMethod, Ir, TypeDef, TypeExpr};
    use crate::profile::profile_for_id;

    fn sample_ir() -> Ir {
        let mut ir = Ir::new();
        ir.api = crate::ir::ApiInfo {
            name: "ExampleAPI".into(),
            version: "1.0.0".into(),
            default_base_url: "https://example.test/api".into(),
        };
        ir.types.push(TypeDef::record(
            "Blockchain",
            vec![
                Field::required("Name", TypeExpr::string()),
                Field::required("ChainID", TypeExpr::string()),
            ],
        ));
        ir.endpoints.push(EndpointDef {
            canonical_name: "getBlockchains".into(),
            http_method: HttpMethod::Post,
            path: "/getBlockchains".into(),
            category: Some("network".into()),
            request: TypeExpr::Record(Vec::new()),
            response: TypeExpr::array(TypeExpr::reference("Blockchain")),
            example_request: None,
            example_response: None,
            docs: None,
        });
        ir
    }

    #[test]
    fn list_responses_map_into_typed_lists() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx = build_context(&ir, profile_for_id("dart").unwrap(), &names, None).unwrap();
        let source = client(&ctx);

        assert!(source.contains("  Future<List<Blockchain>> getBlockchains() async {"));
        assert!(source.contains(".map((item) => Blockchain.fromJson(item as Map<String, dynamic>))"));
    }

    #[test]
    fn records_emit_from_json_factories() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx = build_context(&ir, profile_for_id("dart").unwrap(), &names, None).unwrap();
        let source = types(&ctx);

        assert!(source.contains("class Blockchain {"));
        assert!(source.contains("  factory Blockchain.fromJson(Map<String, dynamic> json) {"));
        assert!(source.contains("      name: json['Name'] as String,"));
        assert!(source.contains("  final String name;"));
    }
}
