//! TypeScript output backend.
//!
//! Emits `client.ts` (fetch-based class, async/await methods), `types.ts`
//! (aliases, literal-union enums, interfaces mirroring the wire format) and
//! `client.test.ts` (node scaffold against a mock server).

use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::emit::{Declaration, EmitContext, EmitError, MethodSpec, ParamSpec};
use crate::output::{indent_fragment, json_literal};
use crate::profile::LanguageProfile;
use crate::traits::Backend;

pub struct TypeScriptBackend;

pub static TYPESCRIPT_BACKEND: TypeScriptBackend = TypeScriptBackend;

impl Backend for TypeScriptBackend {
    fn profile(&self) -> &'static LanguageProfile {
        &crate::profiles::typescript::PROFILE
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

fn imported_names(ctx: &EmitContext<'_>) -> Vec<String> {
    ctx.declarations
        .iter()
        .map(|d| match d {
            Declaration::Alias { name, .. }
            | Declaration::Enum { name, .. }
            | Declaration::Record { name, .. } => name.clone(),
        })
        .collect()
}

fn client(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();

    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str("import { secp256k1 } from \"@noble/curves/secp256k1\";\n");
    out.push_str("import { sha256 } from \"@noble/hashes/sha256\";\n\n");

    let names = imported_names(ctx);
    if !names.is_empty() {
        out.push_str("import {\n");
        for name in &names {
            out.push_str(&format!("  {name},\n"));
        }
        out.push_str("} from \"./types\";\n\n");
    }

    out.push_str(&format!("/** Generated client for the {} API. */\n", ctx.ir.api.name));
    out.push_str(&format!("export class {class} {{\n"));
    out.push_str("  private nagUrl: string;\n");
    out.push_str("  private nagKey: string;\n");
    out.push_str(&format!(
        "  private readonly version: string = {};\n",
        json_literal(&ctx.version.clone().into())
    ));
    out.push_str("  private lastError = \"\";\n\n");
    out.push_str(&format!(
        "  constructor(baseUrl: string = {}) {{\n",
        json_literal(&ctx.base_url.clone().into())
    ));
    out.push_str("    this.nagUrl = baseUrl;\n");
    out.push_str("    this.nagKey = \"\";\n");
    out.push_str("  }\n\n");

    out.push_str("  private async _post(path: string, payload: Record<string, unknown>): Promise<unknown> {\n");
    out.push_str("    payload[\"Version\"] = this.version;\n");
    out.push_str("    const response = await fetch(this.nagUrl + path, {\n");
    out.push_str("      method: \"POST\",\n");
    out.push_str("      headers: { \"Content-Type\": \"application/json\" },\n");
    out.push_str("      body: JSON.stringify(payload),\n");
    out.push_str("    });\n");
    out.push_str("    const envelope = (await response.json()) as { Result: number; Response: unknown };\n");
    out.push_str("    if (envelope.Result !== 200) {\n");
    out.push_str("      this.lastError = `request failed with result ${envelope.Result}`;\n");
    out.push_str("      throw new Error(this.lastError);\n");
    out.push_str("    }\n");
    out.push_str("    return envelope.Response;\n");
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

fn param_signature(param: &ParamSpec) -> String {
    if param.required {
        format!("{}: {}", param.emitted_name, param.ty)
    } else {
        format!("{}?: {}", param.emitted_name, param.ty)
    }
}

fn render_method(method: &MethodSpec) -> String {
    let mut out = String::new();
    if let Some(docs) = &method.docs {
        out.push_str(&format!("  /** {docs} */\n"));
    }
    let params: Vec<String> = method.params.iter().map(param_signature).collect();
    out.push_str(&format!(
        "  async {}({}): Promise<{}> {{\n",
        method.emitted_name,
        params.join(", "),
        method.response_type
    ));
    out.push_str("    const payload: Record<string, unknown> = {\n");
    for param in method.params.iter().filter(|p| p.required) {
        out.push_str(&format!("      {}: {},\n", ts_key(&param.wire_name), param.emitted_name));
    }
    out.push_str("    };\n");
    for param in method.params.iter().filter(|p| !p.required) {
        out.push_str(&format!("    if ({} !== undefined) {{\n", param.emitted_name));
        out.push_str(&format!(
            "      payload[{}] = {};\n",
            json_literal(&param.wire_name.clone().into()),
            param.emitted_name
        ));
        out.push_str("    }\n");
    }
    out.push_str(&format!(
        "    return (await this._post({}, payload)) as {};\n",
        json_literal(&method.path.clone().into()),
        method.response_type
    ));
    out.push_str("  }\n");
    out
}

/// Object-literal key: bare when it is a plain identifier.
fn ts_key(wire: &str) -> String {
    let plain = wire
        .chars()
        .enumerate()
        .all(|(i, c)| c == '_' || c == '$' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()));
    if plain && !wire.is_empty() {
        wire.to_string()
    } else {
        format!("{wire:?}")
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
                    out.push_str(&format!("/** {docs} */\n"));
                }
                out.push_str(&format!("export type {name} = {ty};\n"));
            }
            Declaration::Enum { name, variants, docs } => {
                if let Some(docs) = docs {
                    out.push_str(&format!("/** {docs} */\n"));
                }
                let values: Vec<String> = variants
                    .iter()
                    .map(|v| json_literal(&v.clone().into()))
                    .collect();
                out.push_str(&format!("export type {name} = {};\n", values.join(" | ")));
            }
            Declaration::Record { name, fields, docs } => {
                if let Some(docs) = docs {
                    out.push_str(&format!("/** {docs} */\n"));
                }
                out.push_str(&format!("export interface {name} {{\n"));
                for field in fields {
                    if let Some(docs) = &field.docs {
                        out.push_str(&format!("  /** {docs} */\n"));
                    }
                    let sep = if field.required { ":" } else { "?:" };
                    out.push_str(&format!(
                        "  {}{sep} {};\n",
                        ts_key(&field.emitted_name),
                        field.ty
                    ));
                }
                out.push_str("}\n");
            }
        }
    }
    out
}

fn scaffold(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();
    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str("import assert from \"node:assert\";\n\n");
    out.push_str(&format!("import {{ {class} }} from \"./client\";\n\n"));
    out.push_str(&format!(
        "const client = new {class}(process.env.MOCK_SERVER_URL ?? \"http://localhost:8080\");\n\n"
    ));
    out.push_str("async function main(): Promise<void> {\n");

    for method in &ctx.methods {
        let args: Vec<String> = method
            .params
            .iter()
            .map(|p| json_literal(&ctx.sample_value(method, p)))
            .collect();
        out.push_str(&format!(
            "  assert.notStrictEqual(await client.{}({}), undefined);\n",
            method.emitted_name,
            args.join(", ")
        ));
    }

    out.push_str(&format!(
        "  console.log(\"ok: {} methods exercised\");\n",
        ctx.methods.len()
    ));
    out.push_str("}\n\n");
    out.push_str("main().catch((error) => {\n");
    out.push_str("  console.error(error);\n");
    out.push_str("  process.exit(1);\n");
    out.push_str("});\n");
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
            canonical_name: "getTransactionbyID".into(),
            http_method: HttpMethod::Post,
            path: "/getTransactionbyID".into(),
            category: Some("transaction".into()),
            request: TypeExpr::Record(vec![Field::required("ID", TypeExpr::string())]),
            response: TypeExpr::Record(vec![Field::required("Status", TypeExpr::string())]),
            example_request: None,
            example_response: None,
            docs: None,
        });
        ir
    }

    #[test]
    fn methods_are_camel_case_with_typed_promises() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx =
            build_context(&ir, profile_for_id("typescript").unwrap(), &names, None).unwrap();
        let source = client(&ctx);

        assert!(source.contains(
            "  async getTransactionByID(id: string): Promise<GetTransactionByIDResponse> {"
        ));
    }

    #[test]
    fn interfaces_preserve_wire_field_names() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx =
            build_context(&ir, profile_for_id("typescript").unwrap(), &names, None).unwrap();
        let source = types(&ctx);

        assert!(source.contains("export interface GetTransactionByIDResponse {"));
        assert!(source.contains("  Status: string;"));
    }
}
