//! PHP output backend.
//!
//! Emits `Client.php` (stream-context HTTP client with snake_case methods,
//! matching the reference SDK's convention), `Types.php` (backed enums and
//! data classes with `fromArray` decoders) and `ClientTest.php` (plain
//! script scaffold against a mock server).

use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::emit::{Declaration, EmitContext, EmitError, FieldDecl, MethodSpec, ParamSpec, ValueShape};
use crate::ident;
use crate::ir::ScalarKind;
use crate::output::indent_fragment;
use crate::profile::LanguageProfile;
use crate::traits::Backend;

pub struct PhpBackend;

pub static PHP_BACKEND: PhpBackend = PhpBackend;

impl Backend for PhpBackend {
    fn profile(&self) -> &'static LanguageProfile {
        &crate::profiles::php::PROFILE
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
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::String(s) => string_literal(s),
        other => other.to_string(),
    }
}

fn client(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();

    out.push_str("<?php\n");
    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str("declare(strict_types=1);\n\n");
    out.push_str("require_once __DIR__ . '/Types.php';\n\n");

    out.push_str(&format!("/** Generated client for the {} API. */\n", ctx.ir.api.name));
    out.push_str(&format!("class {class}\n{{\n"));
    out.push_str("    private string $nagUrl;\n");
    out.push_str("    private string $nagKey = '';\n");
    out.push_str(&format!(
        "    private string $version = {};\n",
        string_literal(&ctx.version)
    ));
    out.push_str("    private string $lastError = '';\n\n");

    out.push_str(&format!(
        "    public function __construct(string $baseUrl = {})\n",
        string_literal(&ctx.base_url)
    ));
    out.push_str("    {\n");
    out.push_str("        $this->nagUrl = $baseUrl;\n");
    out.push_str("    }\n\n");

    out.push_str("    private function post(string $path, array $payload)\n");
    out.push_str("    {\n");
    out.push_str("        $payload['Version'] = $this->version;\n");
    out.push_str("        $context = stream_context_create([\n");
    out.push_str("            'http' => [\n");
    out.push_str("                'method' => 'POST',\n");
    out.push_str("                'header' => \"Content-Type: application/json\\r\\n\",\n");
    out.push_str("                'content' => json_encode($payload),\n");
    out.push_str("            ],\n");
    out.push_str("        ]);\n");
    out.push_str("        $body = file_get_contents($this->nagUrl . $path, false, $context);\n");
    out.push_str("        if ($body === false) {\n");
    out.push_str("            $this->lastError = 'request failed';\n");
    out.push_str("            throw new RuntimeException($this->lastError);\n");
    out.push_str("        }\n");
    out.push_str("        $envelope = json_decode($body, true);\n");
    out.push_str("        if (($envelope['Result'] ?? 0) !== 200) {\n");
    out.push_str("            $this->lastError = 'request failed with result ' . ($envelope['Result'] ?? 0);\n");
    out.push_str("            throw new RuntimeException($this->lastError);\n");
    out.push_str("        }\n");
    out.push_str("        return $envelope['Response'] ?? null;\n");
    out.push_str("    }\n");

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

fn param_signature(param: &ParamSpec) -> String {
    if param.required {
        format!("{} ${}", param.ty, param.emitted_name)
    } else if param.ty.starts_with('?') {
        format!("{} ${} = null", param.ty, param.emitted_name)
    } else {
        format!("?{} ${} = null", param.ty, param.emitted_name)
    }
}

fn return_type(shape: &ValueShape, rendered: &str) -> String {
    // Plain `array` covers both list responses and is already the rendered
    // type for them; records keep their class name.
    match shape {
        ValueShape::Optional(_) if !rendered.starts_with('?') => format!("?{rendered}"),
        _ => rendered.to_string(),
    }
}

fn render_method(method: &MethodSpec) -> String {
    let mut out = String::new();
    if let Some(docs) = &method.docs {
        out.push_str(&format!("    /** {docs} */\n"));
    }
    let params: Vec<String> = method.params.iter().map(param_signature).collect();
    out.push_str(&format!(
        "    public function {}({}): {}\n",
        method.emitted_name,
        params.join(", "),
        return_type(&method.response_shape, &method.response_type)
    ));
    out.push_str("    {\n");
    out.push_str("        $payload = [\n");
    for param in method.params.iter().filter(|p| p.required) {
        out.push_str(&format!(
            "            {} => ${},\n",
            string_literal(&param.wire_name),
            param.emitted_name
        ));
    }
    out.push_str("        ];\n");
    for param in method.params.iter().filter(|p| !p.required) {
        out.push_str(&format!("        if (${} !== null) {{\n", param.emitted_name));
        out.push_str(&format!(
            "            $payload[{}] = ${};\n",
            string_literal(&param.wire_name),
            param.emitted_name
        ));
        out.push_str("        }\n");
    }
    out.push_str(&decode_response(method));
    out.push_str("    }\n");
    out
}

fn decode_response(method: &MethodSpec) -> String {
    let call = format!("$this->post({}, $payload)", string_literal(&method.path));
    let shape = match &method.response_shape {
        ValueShape::Optional(inner) => inner.as_ref(),
        other => other,
    };
    match shape {
        ValueShape::Record { type_name } => {
            format!("        return {type_name}::fromArray({call});\n")
        }
        ValueShape::Scalar(kind) => {
            let cast = match kind {
                ScalarKind::String => "string",
                ScalarKind::Int => "int",
                ScalarKind::Float => "float",
                ScalarKind::Bool => "bool",
            };
            format!("        return ({cast}) {call};\n")
        }
        ValueShape::Enum { type_name, .. } => {
            format!("        return {type_name}::from((string) {call});\n")
        }
        ValueShape::RecordList { type_name } => {
            let mut out = String::new();
            out.push_str("        $items = [];\n");
            out.push_str(&format!("        foreach ({call} as $item) {{\n"));
            out.push_str(&format!("            $items[] = {type_name}::fromArray($item);\n"));
            out.push_str("        }\n");
            out.push_str("        return $items;\n");
            out
        }
        ValueShape::ScalarList(_) => format!("        return (array) {call};\n"),
        ValueShape::Optional(_) => format!("        return {call};\n"),
    }
}

fn types(ctx: &EmitContext<'_>) -> String {
    let mut out = String::new();
    out.push_str("<?php\n");
    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str("declare(strict_types=1);\n");

    for decl in &ctx.declarations {
        match decl {
            // Aliases are resolved away for PHP by the type mapper.
            Declaration::Alias { .. } => {}
            Declaration::Enum { name, variants, docs } => {
                out.push('\n');
                if let Some(docs) = docs {
                    out.push_str(&format!("/** {docs} */\n"));
                }
                out.push_str(&format!("enum {name}: string\n{{\n"));
                for variant in variants {
                    out.push_str(&format!(
                        "    case {} = {};\n",
                        ident::pascal(variant),
                        string_literal(variant)
                    ));
                }
                out.push_str("}\n");
            }
            Declaration::Record { name, fields, docs } => {
                out.push('\n');
                if let Some(docs) = docs {
                    out.push_str(&format!("/** {docs} */\n"));
                }
                out.push_str(&format!("class {name}\n{{\n"));
                for field in fields {
                    let ty = field_type(field);
                    out.push_str(&format!("    public {ty} ${};\n", field.emitted_name));
                }
                out.push('\n');
                out.push_str("    public static function fromArray(array $data): self\n");
                out.push_str("    {\n");
                out.push_str("        $out = new self();\n");
                for field in fields {
                    out.push_str(&decode_field(field));
                }
                out.push_str("        return $out;\n");
                out.push_str("    }\n");
                out.push_str("}\n");
            }
        }
    }
    out
}

fn field_type(field: &FieldDecl) -> String {
    if field.required || field.ty.starts_with('?') {
        field.ty.clone()
    } else {
        format!("?{}", field.ty)
    }
}

fn decode_field(field: &FieldDecl) -> String {
    let key = string_literal(&field.wire_name);
    let target = &field.emitted_name;
    let optional = !field.required || matches!(field.shape, ValueShape::Optional(_));
    let shape = match &field.shape {
        ValueShape::Optional(inner) => inner.as_ref(),
        other => other,
    };
    let decode = match shape {
        ValueShape::Scalar(kind) => {
            let cast = match kind {
                ScalarKind::String => "string",
                ScalarKind::Int => "int",
                ScalarKind::Float => "float",
                ScalarKind::Bool => "bool",
            };
            format!("({cast}) $data[{key}]")
        }
        ValueShape::Enum { type_name, .. } => {
            format!("{type_name}::from((string) $data[{key}])")
        }
        ValueShape::Record { type_name } => format!("{type_name}::fromArray($data[{key}])"),
        ValueShape::ScalarList(_) => format!("(array) $data[{key}]"),
        ValueShape::RecordList { type_name } => format!(
            "array_map(static fn ($item) => {type_name}::fromArray($item), $data[{key}])"
        ),
        ValueShape::Optional(_) => format!("$data[{key}]"),
    };
    if optional {
        format!("        $out->{target} = isset($data[{key}]) ? {decode} : null;\n")
    } else {
        format!("        $out->{target} = {decode};\n")
    }
}

fn scaffold(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();
    out.push_str("<?php\n");
    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str("declare(strict_types=1);\n\n");
    out.push_str("require_once __DIR__ . '/Client.php';\n\n");
    out.push_str("$baseUrl = getenv('MOCK_SERVER_URL') ?: 'http://localhost:8080';\n");
    out.push_str(&format!("$client = new {class}($baseUrl);\n\n"));

    for method in &ctx.methods {
        let args: Vec<String> = method
            .params
            .iter()
            .map(|p| literal(&ctx.sample_value(method, p)))
            .collect();
        out.push_str(&format!(
            "$client->{}({});\n",
            method.emitted_name,
            args.join(", ")
        ));
    }

    out.push_str(&format!(
        "\necho \"ok: {} methods exercised\\n\";\n",
        ctx.methods.len()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::NameTable;
    use crate::emit::build_context;
    use crate::ir::{EndpointDef, Field, HttpMethod, Ir, TypeExpr};
    use crate::profile::profile_for_id;

    fn sample_ir() -> Ir {
        let mut ir = Ir::new();
        ir.api = crate::ir::ApiInfo {
            name: "ExampleAPI".into(),
            version: "1.0.0".into(),
            default_base_url: "https://example.test/api".into(),
        };
        ir.endpoints.push(EndpointDef {
            canonical_name: "getWalletBalance".into(),
            http_method: HttpMethod::Post,
            path: "/getWalletBalance".into(),
            category: Some("wallet".into()),
            request: TypeExpr::Record(vec![
                Field::required("Address", TypeExpr::string()),
                Field::optional("Asset", TypeExpr::string()),
            ]),
            response: TypeExpr::Record(vec![
                Field::required("Balance", TypeExpr::int()),
                Field::optional("Asset", TypeExpr::string()),
            ]),
            example_request: None,
            example_response: None,
            docs: None,
        });
        ir
    }

    #[test]
    fn methods_use_snake_case_and_nullable_defaults() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx = build_context(&ir, profile_for_id("php").unwrap(), &names, None).unwrap();
        let source = client(&ctx);

        assert!(source.contains(
            "    public function get_wallet_balance(string $address, ?string $asset = null): GetWalletBalanceResponse"
        ));
        assert!(source.contains("        if ($asset !== null) {"));
    }

    #[test]
    fn records_decode_with_from_array() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx = build_context(&ir, profile_for_id("php").unwrap(), &names, None).unwrap();
        let source = types(&ctx);

        assert!(source.contains("class GetWalletBalanceResponse"));
        assert!(source.contains("    public int $balance;"));
        assert!(source.contains("    public ?string $asset;"));
        assert!(source.contains("$out->balance = (int) $data['Balance'];"));
        assert!(source.contains("$out->asset = isset($data['Asset']) ? (string) $data['Asset'] : null;"));
    }
}
