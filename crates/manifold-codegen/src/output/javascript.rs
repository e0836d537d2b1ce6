//! JavaScript output backend.
//!
//! Emits a CommonJS client (`client.js`) with JSDoc-typed methods,
//! `types.js` carrying the shared `@typedef` blocks, and `client.test.js`,
//! a node scaffold against a mock server. Method names keep the reference
//! SDK's legacy spellings via the profile override table.

use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::emit::{Declaration, EmitContext, EmitError, MethodSpec};
use crate::output::{indent_fragment, json_literal};
use crate::profile::LanguageProfile;
use crate::traits::Backend;

pub struct JavaScriptBackend;

pub static JAVASCRIPT_BACKEND: JavaScriptBackend = JavaScriptBackend;

impl Backend for JavaScriptBackend {
    fn profile(&self) -> &'static LanguageProfile {
        &crate::profiles::javascript::PROFILE
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

fn client(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();

    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str("\"use strict\";\n\n");
    out.push_str("const crypto = require(\"crypto\");\n");
    out.push_str("const { ec: EC } = require(\"elliptic\");\n\n");
    out.push_str("const secp256k1 = new EC(\"secp256k1\");\n\n");

    out.push_str(&format!("/** Generated client for the {} API. */\n", ctx.ir.api.name));
    out.push_str(&format!("class {class} {{\n"));
    out.push_str(&format!(
        "  constructor(baseUrl = {}) {{\n",
        json_literal(&ctx.base_url.clone().into())
    ));
    out.push_str("    this._nagUrl = baseUrl;\n");
    out.push_str("    this._nagKey = \"\";\n");
    out.push_str(&format!(
        "    this._version = {};\n",
        json_literal(&ctx.version.clone().into())
    ));
    out.push_str("    this._lastError = \"\";\n");
    out.push_str("  }\n\n");

    out.push_str("  async _post(path, payload) {\n");
    out.push_str("    payload[\"Version\"] = this._version;\n");
    out.push_str("    const response = await fetch(this._nagUrl + path, {\n");
    out.push_str("      method: \"POST\",\n");
    out.push_str("      headers: { \"Content-Type\": \"application/json\" },\n");
    out.push_str("      body: JSON.stringify(payload),\n");
    out.push_str("    });\n");
    out.push_str("    const envelope = await response.json();\n");
    out.push_str("    if (envelope.Result !== 200) {\n");
    out.push_str("      this._lastError = `request failed with result ${envelope.Result}`;\n");
    out.push_str("      throw new Error(this._lastError);\n");
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

    out.push_str("}\n\n");
    out.push_str(&format!("module.exports = {{ {class} }};\n"));
    out
}

fn render_method(method: &MethodSpec) -> String {
    let mut out = String::new();

    out.push_str("  /**\n");
    if let Some(docs) = &method.docs {
        out.push_str(&format!("   * {docs}\n"));
    }
    for param in &method.params {
        let ty = if param.required {
            param.ty.clone()
        } else {
            format!("{}=", param.ty)
        };
        out.push_str(&format!("   * @param {{{ty}}} {}\n", param.emitted_name));
    }
    out.push_str(&format!("   * @returns {{Promise<{}>}}\n", method.response_type));
    out.push_str("   */\n");

    let params: Vec<String> = method
        .params
        .iter()
        .map(|p| {
            if p.required {
                p.emitted_name.clone()
            } else {
                format!("{} = undefined", p.emitted_name)
            }
        })
        .collect();
    out.push_str(&format!("  async {}({}) {{\n", method.emitted_name, params.join(", ")));
    out.push_str("    const payload = {\n");
    for param in method.params.iter().filter(|p| p.required) {
        out.push_str(&format!("      {}: {},\n", js_key(&param.wire_name), param.emitted_name));
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
        "    return await this._post({}, payload);\n",
        json_literal(&method.path.clone().into())
    ));
    out.push_str("  }\n");
    out
}

fn js_key(wire: &str) -> String {
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
    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str(&format!("// Shared type definitions for the {} API.\n", ctx.ir.api.name));

    for decl in &ctx.declarations {
        out.push('\n');
        match decl {
            Declaration::Alias { name, ty, docs } => {
                out.push_str("/**\n");
                if let Some(docs) = docs {
                    out.push_str(&format!(" * {docs}\n"));
                }
                out.push_str(&format!(" * @typedef {{{ty}}} {name}\n"));
                out.push_str(" */\n");
            }
            Declaration::Enum { name, variants, docs } => {
                let values: Vec<String> = variants
                    .iter()
                    .map(|v| json_literal(&v.clone().into()))
                    .collect();
                out.push_str("/**\n");
                if let Some(docs) = docs {
                    out.push_str(&format!(" * {docs}\n"));
                }
                out.push_str(&format!(" * @typedef {{({})}} {name}\n", values.join("|")));
                out.push_str(" */\n");
            }
            Declaration::Record { name, fields, docs } => {
                out.push_str("/**\n");
                if let Some(docs) = docs {
                    out.push_str(&format!(" * {docs}\n"));
                }
                out.push_str(&format!(" * @typedef {{object}} {name}\n"));
                for field in fields {
                    let key = if field.required {
                        field.emitted_name.clone()
                    } else {
                        format!("[{}]", field.emitted_name)
                    };
                    out.push_str(&format!(" * @property {{{}}} {key}\n", field.ty));
                }
                out.push_str(" */\n");
            }
        }
    }

    out.push_str("\nmodule.exports = {};\n");
    out
}

fn scaffold(ctx: &EmitContext<'_>) -> String {
    let class = &ctx.class_name;
    let mut out = String::new();
    out.push_str("// Generated by manifold. Do not edit.\n\n");
    out.push_str("\"use strict\";\n\n");
    out.push_str("const assert = require(\"node:assert\");\n\n");
    out.push_str(&format!("const {{ {class} }} = require(\"./client\");\n\n"));
    out.push_str(&format!(
        "const client = new {class}(process.env.MOCK_SERVER_URL || \"http://localhost:8080\");\n\n"
    ));
    out.push_str("async function main() {\n");

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
    fn legacy_method_spelling_survives() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx =
            build_context(&ir, profile_for_id("javascript").unwrap(), &names, None).unwrap();
        let source = client(&ctx);

        // The reference SDK spelled this method with a lowercase "by".
        assert!(source.contains("  async getTransactionbyID(id) {"));
        assert!(source.contains("module.exports = { ExampleAPI };"));
    }

    #[test]
    fn typedefs_cover_generated_records() {
        let ir = sample_ir();
        let names = NameTable::build(&ir).unwrap();
        let ctx =
            build_context(&ir, profile_for_id("javascript").unwrap(), &names, None).unwrap();
        let source = types(&ctx);

        assert!(source.contains(" * @typedef {object} GetTransactionByIDResponse"));
        assert!(source.contains(" * @property {string} Status"));
    }
}
