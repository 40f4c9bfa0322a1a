//! Declarative schema descriptions and the extension operations used to compose them.

mod path;
mod validate;

pub use path::{FieldPath, PathSegment};
pub use validate::{check, validate, IssueKind, ValidationError, ValidationIssue};

use std::fmt;

/// Shape of a JSON value, interpreted by [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    String,
    /// String which parses as a finite decimal number
    NumericString,
    Integer {
        signed: bool,
    },
    Boolean,
    Null,
    Literal(LiteralSet),
    Array(Box<Schema>),
    /// Branches are tried in declared order
    Union(Vec<Schema>),
    Record(RecordSchema),
}

impl Schema {
    pub fn array(item: Schema) -> Self {
        Schema::Array(Box::new(item))
    }

    pub fn nullable(schema: Schema) -> Self {
        Schema::Union(vec![schema, Schema::Null])
    }

    /// Name used when reporting on the schema as a whole
    pub fn name(&self) -> String {
        match self {
            Schema::Record(record) => record.name.clone(),
            Schema::Literal(set) => set.name.clone(),
            other => other.to_string(),
        }
    }

    pub fn as_record(&self) -> Option<&RecordSchema> {
        match self {
            Schema::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl From<RecordSchema> for Schema {
    fn from(record: RecordSchema) -> Self {
        Schema::Record(record)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::String => write!(f, "string"),
            Schema::NumericString => write!(f, "numeric string"),
            Schema::Integer { signed: true } => write!(f, "integer"),
            Schema::Integer { signed: false } => write!(f, "non-negative integer"),
            Schema::Boolean => write!(f, "boolean"),
            Schema::Null => write!(f, "null"),
            Schema::Literal(set) => write!(f, "{}", set),
            Schema::Array(item) => write!(f, "array of {}", item),
            Schema::Union(branches) => {
                let branches: Vec<_> = branches.iter().map(|b| b.to_string()).collect();
                write!(f, "{}", branches.join(" or "))
            }
            Schema::Record(record) => write!(f, "{}", record.name),
        }
    }
}

/// Closed set of allowed string values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralSet {
    name: String,
    values: Vec<String>,
}

impl LiteralSet {
    pub fn new(name: impl Into<String>, values: &[&str]) -> Self {
        LiteralSet {
            name: name.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

impl fmt::Display for LiteralSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<_> = self.values.iter().map(|v| format!("\"{}\"", v)).collect();
        write!(f, "one of {}", quoted.join(", "))
    }
}

/// Named record with an ordered field set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    name: String,
    fields: Vec<Field>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>) -> Self {
        RecordSchema {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Add a field, replacing any existing field of the same name in place.
    pub fn field(mut self, field: Field) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// New record with this record's fields plus `other`'s, added or overridden by name.
    ///
    /// Overridden fields keep their position in `self`; new fields follow in `other`'s order.
    /// The result keeps this record's name.
    pub fn extend(&self, other: &RecordSchema) -> RecordSchema {
        other
            .fields
            .iter()
            .cloned()
            .fold(self.clone(), |record, field| record.field(field))
    }

    /// New record with the field `from` renamed to `to`. Unchanged if `from` is absent.
    pub fn rename_field(&self, from: &str, to: &str) -> RecordSchema {
        let mut record = self.clone();
        if let Some(field) = record.fields.iter_mut().find(|f| f.name == from) {
            field.name = to.to_string();
        }
        record
    }
}

/// A single named field of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    schema: Schema,
    optional: bool,
    aliases: Vec<String>,
    doc: String,
}

impl Field {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Field {
            name: name.into(),
            schema,
            optional: false,
            aliases: Vec::new(),
            doc: String::new(),
        }
    }

    /// Additional wire name accepted on input
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Optional fields may be absent from the input
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Value of this field in `map`, under its name or the first alias present
    pub fn lookup<'a>(
        &self,
        map: &'a serde_json::Map<String, serde_json::Value>,
    ) -> Option<&'a serde_json::Value> {
        map.get(&self.name)
            .or_else(|| self.aliases.iter().find_map(|alias| map.get(alias)))
    }

    pub fn description(&self) -> &str {
        &self.doc
    }
}

/// Types which carry a schema description of their JSON shape
pub trait Describe {
    fn describe() -> Schema;
}

/// Types which are described by a record, and so can be flattened into or extended by another
pub trait DescribeRecord {
    fn record() -> RecordSchema;
}

impl Describe for String {
    fn describe() -> Schema {
        Schema::String
    }
}

impl Describe for bool {
    fn describe() -> Schema {
        Schema::Boolean
    }
}

macro_rules! describe_integer {
    ($signed:expr => $($ty:ty),*) => {
        $(
            impl Describe for $ty {
                fn describe() -> Schema {
                    Schema::Integer { signed: $signed }
                }
            }
        )*
    };
}

describe_integer!(false => u8, u16, u32, u64, usize);
describe_integer!(true => i8, i16, i32, i64, isize);

impl<T: Describe> Describe for Option<T> {
    fn describe() -> Schema {
        Schema::nullable(T::describe())
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> Schema {
        Schema::array(T::describe())
    }
}
