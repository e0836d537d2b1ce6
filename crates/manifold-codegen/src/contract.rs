//! Validation contracts attached to scalar types.
//!
//! Contracts are a small fixed set of predicate kinds evaluated by an
//! interpreter. Keeping them as tagged variants (rather than closures) keeps
//! the schema inspectable and serializable, and lets emitters derive static
//! type constraints from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validation predicate on a scalar value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Contract {
    /// String length must be one of the listed values.
    LengthIn(Vec<usize>),
    /// String length must fall in the inclusive range.
    LengthRange { min: usize, max: usize },
    /// String must match the regex.
    Matches(String),
    /// Value must be one of the listed strings.
    OneOf(Vec<String>),
    /// All sub-contracts must hold.
    All(Vec<Contract>),
}

/// A malformed contract found at schema load time.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("invalid regex {pattern:?}: {message}")]
    InvalidRegex { pattern: String, message: String },
    #[error("empty length set")]
    EmptyLengthSet,
    #[error("inverted length range {min}..={max}")]
    InvertedRange { min: usize, max: usize },
    #[error("empty value set")]
    EmptyValueSet,
    #[error("empty composite contract")]
    EmptyComposite,
}

impl Contract {
    /// Check the contract is well-formed. Called once at schema load; a
    /// malformed contract is a schema error, not a runtime surprise.
    pub fn validate(&self) -> Result<(), ContractError> {
        match self {
            Contract::LengthIn(lengths) => {
                if lengths.is_empty() {
                    return Err(ContractError::EmptyLengthSet);
                }
                Ok(())
            }
            Contract::LengthRange { min, max } => {
                if min > max {
                    return Err(ContractError::InvertedRange { min: *min, max: *max });
                }
                Ok(())
            }
            Contract::Matches(pattern) => match regex::Regex::new(pattern) {
                Ok(_) => Ok(()),
                Err(e) => Err(ContractError::InvalidRegex {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                }),
            },
            Contract::OneOf(values) => {
                if values.is_empty() {
                    return Err(ContractError::EmptyValueSet);
                }
                Ok(())
            }
            Contract::All(parts) => {
                if parts.is_empty() {
                    return Err(ContractError::EmptyComposite);
                }
                for part in parts {
                    part.validate()?;
                }
                Ok(())
            }
        }
    }

    /// Evaluate the contract against a JSON value.
    ///
    /// Length and regex predicates apply to strings; non-string values fail
    /// them. `validate` must have passed before this is called.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Contract::LengthIn(lengths) => value
                .as_str()
                .is_some_and(|s| lengths.contains(&s.chars().count())),
            Contract::LengthRange { min, max } => value
                .as_str()
                .is_some_and(|s| (*min..=*max).contains(&s.chars().count())),
            Contract::Matches(pattern) => match regex::Regex::new(pattern) {
                Ok(re) => value.as_str().is_some_and(|s| re.is_match(s)),
                Err(_) => false,
            },
            Contract::OneOf(values) => value
                .as_str()
                .is_some_and(|s| values.iter().any(|v| v == s)),
            Contract::All(parts) => parts.iter().all(|p| p.check(value)),
        }
    }

    /// Human-readable description used in generated doc comments.
    pub fn describe(&self) -> String {
        match self {
            Contract::LengthIn(lengths) => {
                let parts: Vec<String> = lengths.iter().map(|l| l.to_string()).collect();
                format!("length {}", parts.join(" or "))
            }
            Contract::LengthRange { min, max } => format!("length {min}..={max}"),
            Contract::Matches(pattern) => format!("matches {pattern}"),
            Contract::OneOf(values) => format!("one of {}", values.join(", ")),
            Contract::All(parts) => {
                let parts: Vec<String> = parts.iter().map(|p| p.describe()).collect();
                parts.join("; ")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hex_address_contract() {
        let contract = Contract::All(vec![
            Contract::Matches("^(0x)?[0-9a-fA-F]+$".into()),
            Contract::LengthIn(vec![64, 66]),
        ]);
        contract.validate().unwrap();

        let hex64 = "a".repeat(64);
        assert!(contract.check(&json!(hex64)));
        let hex66 = format!("0x{}", "b".repeat(64));
        assert!(contract.check(&json!(hex66)));
        assert!(!contract.check(&json!("zz")));
        assert!(!contract.check(&json!(42)));
    }

    #[test]
    fn malformed_contracts_rejected() {
        assert!(Contract::Matches("(unclosed".into()).validate().is_err());
        assert!(Contract::LengthIn(vec![]).validate().is_err());
        assert!(Contract::LengthRange { min: 5, max: 2 }.validate().is_err());
        assert!(Contract::All(vec![]).validate().is_err());
    }

    #[test]
    fn one_of_membership() {
        let contract = Contract::OneOf(vec!["pending".into(), "confirmed".into()]);
        assert!(contract.check(&json!("pending")));
        assert!(!contract.check(&json!("unknown")));
    }

    #[test]
    fn serde_round_trip_uses_camel_case_tags() {
        let contract = Contract::LengthIn(vec![64, 66]);
        let value = serde_json::to_value(&contract).unwrap();
        assert_eq!(value, json!({"lengthIn": [64, 66]}));
    }
}
