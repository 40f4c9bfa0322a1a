use super::{Describe, FieldPath, Schema};
use crate::numeric;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// All violations found while checking a value against a schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {schema}: {}", summarize(.issues))]
pub struct ValidationError {
    pub schema: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    /// Issues with union alternatives expanded into the issues of each branch
    pub fn leaf_issues(&self) -> Vec<&ValidationIssue> {
        fn collect<'a>(issues: &'a [ValidationIssue], out: &mut Vec<&'a ValidationIssue>) {
            for issue in issues {
                match &issue.kind {
                    IssueKind::NoUnionBranch { branches } => collect(branches, out),
                    _ => out.push(issue),
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.issues, &mut out);
        out
    }

    /// Whether any issue, including those within union branches, is located at `path`
    pub fn contains_path(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path.to_string() == path)
            || self.leaf_issues().iter().any(|i| i.path.to_string() == path)
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: FieldPath,
    /// Description of the expected shape
    pub expected: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IssueKind {
    /// Required field is absent
    Missing,
    /// Value has the wrong JSON type
    TypeMismatch { found: String },
    /// String does not parse as a finite decimal number
    InvalidNumericString { value: String },
    /// String is outside the allowed literal set
    NotInLiteralSet { value: String },
    /// No union alternative matched; holds the failures of every alternative
    NoUnionBranch { branches: Vec<ValidationIssue> },
    /// Value matched the schema but could not be decoded into its record type
    Malformed { message: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.path)?;
        match &self.kind {
            IssueKind::Missing => write!(f, "missing required field ({})", self.expected),
            IssueKind::TypeMismatch { found } => {
                write!(f, "expected {}, found {}", self.expected, found)
            }
            IssueKind::InvalidNumericString { value } => {
                write!(f, "\"{}\" is not a numeric string", value)
            }
            IssueKind::NotInLiteralSet { value } => {
                write!(f, "\"{}\" is not {}", value, self.expected)
            }
            IssueKind::NoUnionBranch { branches } => write!(
                f,
                "expected {}, no alternative matched ({})",
                self.expected,
                summarize(branches)
            ),
            IssueKind::Malformed { message } => write!(f, "{}", message),
        }
    }
}

/// Check `value` against `schema`, collecting every violation.
pub fn check(schema: &Schema, value: &Value) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    visit(schema, value, &FieldPath::root(), &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            schema: schema.name(),
            issues,
        })
    }
}

/// Check `value` against the description of `T` and decode it.
pub fn validate<T>(value: Value) -> Result<T, ValidationError>
where
    T: Describe + DeserializeOwned,
{
    let schema = T::describe();
    if let Err(err) = check(&schema, &value) {
        log::debug!("{} rejected with {} issue(s)", err.schema, err.issues.len());
        return Err(err);
    }

    serde_json::from_value(value).map_err(|err| ValidationError {
        schema: schema.name(),
        issues: vec![ValidationIssue {
            path: FieldPath::root(),
            expected: schema.to_string(),
            kind: IssueKind::Malformed {
                message: err.to_string(),
            },
        }],
    })
}

fn visit(schema: &Schema, value: &Value, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
    let issue = |kind| ValidationIssue {
        path: path.clone(),
        expected: schema.to_string(),
        kind,
    };

    match (schema, value) {
        (Schema::String, Value::String(_))
        | (Schema::Boolean, Value::Bool(_))
        | (Schema::Null, Value::Null) => {}

        (Schema::NumericString, Value::String(s)) => {
            if !numeric::is_numeric(s) {
                issues.push(issue(IssueKind::InvalidNumericString { value: s.clone() }));
            }
        }

        (Schema::Integer { signed }, Value::Number(n)) => {
            let fits = if *signed { n.is_i64() } else { n.is_u64() };
            if !fits {
                let found = if n.is_u64() {
                    "integer out of range"
                } else {
                    kind_of(value)
                };
                issues.push(issue(IssueKind::TypeMismatch {
                    found: found.to_string(),
                }));
            }
        }

        (Schema::Literal(set), Value::String(s)) => {
            if !set.contains(s) {
                issues.push(issue(IssueKind::NotInLiteralSet { value: s.clone() }));
            }
        }

        (Schema::Array(item), Value::Array(items)) => {
            for (i, item_value) in items.iter().enumerate() {
                visit(item, item_value, &path.index(i), issues);
            }
        }

        (Schema::Union(branches), _) => {
            let mut failures = Vec::new();
            for branch in branches {
                let mut branch_issues = Vec::new();
                visit(branch, value, path, &mut branch_issues);
                if branch_issues.is_empty() {
                    return;
                }
                failures.extend(branch_issues);
            }
            issues.push(issue(IssueKind::NoUnionBranch { branches: failures }));
        }

        (Schema::Record(record), Value::Object(map)) => {
            // fields not declared by the record are ignored, and dropped when decoding
            for field in record.fields() {
                let field_path = path.key(field.name());
                match field.lookup(map) {
                    Some(field_value) => visit(field.schema(), field_value, &field_path, issues),
                    None if field.is_optional() => {}
                    None => issues.push(ValidationIssue {
                        path: field_path,
                        expected: field.schema().to_string(),
                        kind: IssueKind::Missing,
                    }),
                }
            }
        }

        _ => issues.push(issue(IssueKind::TypeMismatch {
            found: kind_of(value).to_string(),
        })),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_u64() => "integer",
        Value::Number(n) if n.is_i64() => "negative integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
