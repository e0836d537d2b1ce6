//! Deterministic naming of nested anonymous record shapes.
//!
//! Every anonymous record reachable from an endpoint schema (or nested in a
//! declared record) gets the name `PascalCase(owner) + PascalCase(field
//! path)`: the record under `checkWallet`'s response becomes
//! `CheckWalletResponse`, a nested `Stats` field under it would become
//! `CheckWalletResponseStats`. Structurally identical shapes at different
//! paths are named independently; what is enforced is uniqueness, not
//! structural sharing. The table is built once per generation run and is
//! the same for every language (all targets use PascalCase type names).

use std::collections::BTreeMap;

use crate::ident;
use crate::ir::{Field, Ir, TypeExpr, TypeKind};

/// Two distinct paths resolved to the same generated type name, or a
/// generated name collided with a declared type. Requires a schema or
/// naming-rule change; generation cannot proceed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("type name collision: {name:?} generated for both {path1} and {path2}")]
pub struct NameCollisionError {
    pub name: String,
    pub path1: String,
    pub path2: String,
}

/// An anonymous record that received a generated name.
#[derive(Debug, Clone)]
pub struct NamedRecord {
    pub name: String,
    pub path: String,
    pub fields: Vec<Field>,
}

/// Memoized path → type-name table for one generation run.
#[derive(Debug, Default)]
pub struct NameTable {
    names: BTreeMap<String, String>,
    records: Vec<NamedRecord>,
}

impl NameTable {
    /// Walk every endpoint schema and declared record, assigning names to
    /// anonymous records and checking global uniqueness.
    pub fn build(ir: &Ir) -> Result<NameTable, NameCollisionError> {
        let mut table = NameTable::default();
        // Seed with declared type names so a generated name cannot shadow
        // one.
        let mut by_name: BTreeMap<String, String> = ir
            .types
            .iter()
            .map(|t| (ident::pascal(&t.name), format!("types.{}", t.name)))
            .collect();

        for ty in &ir.types {
            if let TypeKind::Record(def) = &ty.kind {
                let base = format!("types.{}", ty.name);
                let hint = ident::pascal(&ty.name);
                for field in &def.fields {
                    table.walk(
                        &field.ty,
                        format!("{hint}{}", ident::pascal(&field.name)),
                        format!("{base}.{}", field.name),
                        &mut by_name,
                    )?;
                }
            }
        }

        for ep in &ir.endpoints {
            let base = format!("endpoints.{}", ep.canonical_name);
            let pascal = ident::pascal(&ep.canonical_name);
            table.walk(
                &ep.request,
                format!("{pascal}Request"),
                format!("{base}.request"),
                &mut by_name,
            )?;
            table.walk(
                &ep.response,
                format!("{pascal}Response"),
                format!("{base}.response"),
                &mut by_name,
            )?;
        }

        Ok(table)
    }

    fn walk(
        &mut self,
        expr: &TypeExpr,
        hint: String,
        path: String,
        by_name: &mut BTreeMap<String, String>,
    ) -> Result<(), NameCollisionError> {
        match expr {
            TypeExpr::Record(fields) => {
                // Empty records (e.g. parameterless requests) produce no
                // type declaration and need no name.
                if !fields.is_empty() {
                    if let Some(existing) = by_name.get(&hint) {
                        return Err(NameCollisionError {
                            name: hint,
                            path1: existing.clone(),
                            path2: path,
                        });
                    }
                    by_name.insert(hint.clone(), path.clone());
                    self.names.insert(path.clone(), hint.clone());
                    self.records.push(NamedRecord {
                        name: hint.clone(),
                        path: path.clone(),
                        fields: fields.clone(),
                    });
                }
                for field in fields {
                    self.walk(
                        &field.ty,
                        format!("{hint}{}", ident::pascal(&field.name)),
                        format!("{path}.{}", field.name),
                        by_name,
                    )?;
                }
                Ok(())
            }
            TypeExpr::Array(element) | TypeExpr::Optional(element) => {
                self.walk(element, hint, path, by_name)
            }
            TypeExpr::Scalar(_) | TypeExpr::Ref(_) => Ok(()),
        }
    }

    /// Name assigned to the anonymous record at `path`, if any.
    pub fn name_for(&self, path: &str) -> Option<&str> {
        self.names.get(path).map(String::as_str)
    }

    /// All named anonymous records, in deterministic walk order.
    pub fn records(&self) -> &[NamedRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EndpointDef, HttpMethod, TypeDef};

    fn endpoint(name: &str, request: TypeExpr, response: TypeExpr) -> EndpointDef {
        EndpointDef {
            canonical_name: name.into(),
            http_method: HttpMethod::Post,
            path: format!("/{name}"),
            category: None,
            request,
            response,
            example_request: None,
            example_response: None,
            docs: None,
        }
    }

    #[test]
    fn response_record_named_after_endpoint() {
        let mut ir = Ir::new();
        ir.endpoints.push(endpoint(
            "checkWallet",
            TypeExpr::Record(vec![Field::required("Address", TypeExpr::string())]),
            TypeExpr::Record(vec![Field::required("exists", TypeExpr::bool())]),
        ));

        let table = NameTable::build(&ir).unwrap();
        assert_eq!(
            table.name_for("endpoints.checkWallet.response"),
            Some("CheckWalletResponse")
        );
        assert_eq!(
            table.name_for("endpoints.checkWallet.request"),
            Some("CheckWalletRequest")
        );
    }

    #[test]
    fn nested_records_extend_the_owner_name() {
        let mut ir = Ir::new();
        ir.endpoints.push(endpoint(
            "getAnalytics",
            TypeExpr::Record(Vec::new()),
            TypeExpr::Record(vec![Field::required(
                "Totals",
                TypeExpr::Record(vec![Field::required("Wallets", TypeExpr::int())]),
            )]),
        ));

        let table = NameTable::build(&ir).unwrap();
        assert_eq!(
            table.name_for("endpoints.getAnalytics.response.Totals"),
            Some("GetAnalyticsResponseTotals")
        );
    }

    #[test]
    fn identical_shapes_named_independently() {
        let shape = || TypeExpr::Record(vec![Field::required("Count", TypeExpr::int())]);
        let mut ir = Ir::new();
        ir.endpoints.push(endpoint("getBlockCount", TypeExpr::Record(Vec::new()), shape()));
        ir.endpoints.push(endpoint("getAssetSupply", TypeExpr::Record(Vec::new()), shape()));

        let table = NameTable::build(&ir).unwrap();
        assert_eq!(table.records().len(), 2);
        assert_eq!(
            table.name_for("endpoints.getBlockCount.response"),
            Some("GetBlockCountResponse")
        );
        assert_eq!(
            table.name_for("endpoints.getAssetSupply.response"),
            Some("GetAssetSupplyResponse")
        );
    }

    #[test]
    fn collision_with_declared_type_is_an_error() {
        let mut ir = Ir::new();
        ir.types.push(TypeDef::record(
            "CheckWalletResponse",
            vec![Field::required("exists", TypeExpr::bool())],
        ));
        ir.endpoints.push(endpoint(
            "checkWallet",
            TypeExpr::Record(Vec::new()),
            TypeExpr::Record(vec![Field::required("exists", TypeExpr::bool())]),
        ));

        let err = NameTable::build(&ir).unwrap_err();
        assert_eq!(err.name, "CheckWalletResponse");
        assert_eq!(err.path1, "types.CheckWalletResponse");
        assert_eq!(err.path2, "endpoints.checkWallet.response");
    }

    #[test]
    fn records_inside_arrays_are_named() {
        let mut ir = Ir::new();
        ir.endpoints.push(endpoint(
            "getBlockRange",
            TypeExpr::Record(Vec::new()),
            TypeExpr::Record(vec![Field::required(
                "Blocks",
                TypeExpr::array(TypeExpr::Record(vec![Field::required(
                    "Hash",
                    TypeExpr::string(),
                )])),
            )]),
        ));

        let table = NameTable::build(&ir).unwrap();
        assert_eq!(
            table.name_for("endpoints.getBlockRange.response.Blocks"),
            Some("GetBlockRangeResponseBlocks")
        );
    }
}
