//! Command implementations.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::bail;

use manifold_codegen::{GenerateOptions, Ir, generate, input, profile, write_artifacts};

use crate::cli::{Cli, Command};

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Generate { schema, out, lang, base_url } => {
            run_generate(&schema, &out, &lang, base_url)
        }
        Command::Check { schema } => run_check(&schema),
        Command::Languages => run_languages(),
    }
}

fn load(schema: &[PathBuf]) -> anyhow::Result<Ir> {
    let documents = input::read_documents(schema)?;
    if documents.is_empty() {
        bail!("no schema documents found");
    }
    Ok(input::load_ir(documents, profile::profiles())?)
}

fn parse_languages(lang: &str) -> Vec<String> {
    if lang == "all" {
        return Vec::new();
    }
    lang.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn run_generate(
    schema: &[PathBuf],
    out: &PathBuf,
    lang: &str,
    base_url: Option<String>,
) -> anyhow::Result<()> {
    let ir = load(schema)?;
    let options = GenerateOptions { languages: parse_languages(lang), base_url };
    let report = generate(&ir, &options)?;

    write_artifacts(out, &report.artifacts)?;

    let mut per_language: BTreeMap<&str, usize> = BTreeMap::new();
    for artifact in &report.artifacts {
        *per_language.entry(artifact.language.as_str()).or_default() += 1;
    }
    for (language, count) in &per_language {
        println!("{language}: {count} files");
    }

    for failure in &report.failures {
        eprintln!("error: {failure}");
    }
    for parity in &report.parity {
        eprintln!("error: {parity}");
    }
    if !report.is_success() {
        bail!(
            "generation failed: {} language failure(s), {} parity error(s)",
            report.failures.len(),
            report.parity.len()
        );
    }

    println!("generated {} artifacts under {}", report.artifacts.len(), out.display());
    Ok(())
}

fn run_check(schema: &[PathBuf]) -> anyhow::Result<()> {
    let ir = load(schema)?;
    println!(
        "schema OK: {} types, {} endpoints, {} helpers",
        ir.types.len(),
        ir.endpoints.len(),
        ir.helpers.len()
    );
    Ok(())
}

fn run_languages() -> anyhow::Result<()> {
    for profile in profile::profiles() {
        println!("{:<12} {}", profile.id, profile.label);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_selector_parses_csv_and_all() {
        assert!(parse_languages("all").is_empty());
        assert_eq!(parse_languages("go,python"), vec!["go", "python"]);
        assert_eq!(parse_languages(" go , dart "), vec!["go", "dart"]);
    }

    #[test]
    fn generate_writes_per_language_directories() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("schema.json");
        let document = serde_json::json!({
            "api": {
                "name": "ExampleAPI",
                "version": "1.0.0",
                "defaultBaseUrl": "https://example.test/api"
            },
            "endpoints": {
                "checkWallet": {
                    "request": {"record": [{"name": "Address", "type": "string"}]},
                    "response": {"record": [{"name": "exists", "type": "bool"}]}
                }
            }
        });
        std::fs::write(&schema_path, serde_json::to_string_pretty(&document).unwrap()).unwrap();

        let out = dir.path().join("out");
        run_generate(&[schema_path], &out, "go,python", None).unwrap();

        assert!(out.join("go/client.go").is_file());
        assert!(out.join("go/types.go").is_file());
        assert!(out.join("go/client_test.go").is_file());
        assert!(out.join("python/client.py").is_file());
        assert!(out.join("python/models.py").is_file());
        assert!(!out.join("php").exists());
    }

    #[test]
    fn check_rejects_a_broken_schema() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("schema.json");
        let document = serde_json::json!({
            "api": {
                "name": "ExampleAPI",
                "version": "1.0.0",
                "defaultBaseUrl": "https://example.test/api"
            },
            "endpoints": {
                "checkWallet": {
                    "request": {"record": [{"name": "Address", "type": "Missing"}]},
                    "response": "bool"
                }
            }
        });
        std::fs::write(&schema_path, serde_json::to_string(&document).unwrap()).unwrap();

        let err = run_check(&[schema_path]).unwrap_err();
        assert!(err.to_string().contains("endpoints.checkWallet.request.Address"));
    }
}
