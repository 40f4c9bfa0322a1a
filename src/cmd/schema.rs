//! Schema command - print the registered payload schemas

use clap::{Args, ValueEnum};
use pnlreport::registry::Entry;
use pnlreport::Registry;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Schema to print; lists every registered schema when omitted
    name: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "fields")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaFormat {
    /// Table of fields with their types
    Fields,
    /// JSON Schema document
    JsonSchema,
}

#[derive(Tabled)]
struct SchemaRow {
    #[tabled(rename = "Schema")]
    name: &'static str,
    #[tabled(rename = "Shape")]
    shape: String,
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Required")]
    required: &'static str,
    #[tabled(rename = "Description")]
    description: String,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let registry = Registry::global();

        let Some(name) = &self.name else {
            self.print_list(registry);
            return Ok(());
        };
        let Some(entry) = registry.find(name) else {
            anyhow::bail!("Unknown schema '{}'", name);
        };

        match self.format {
            SchemaFormat::Fields => self.print_fields(entry),
            SchemaFormat::JsonSchema => self.print_json_schema(entry)?,
        }
        Ok(())
    }

    fn print_list(&self, registry: &Registry) {
        let rows: Vec<_> = registry
            .entries()
            .map(|entry| SchemaRow {
                name: entry.name(),
                shape: match entry.schema().as_record() {
                    Some(record) => format!("record of {} fields", record.fields().len()),
                    None => entry.schema().to_string(),
                },
            })
            .collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    fn print_fields(&self, entry: &Entry) {
        let Some(record) = entry.schema().as_record() else {
            println!("{}: {}", entry.name(), entry.schema());
            return;
        };

        let rows: Vec<_> = record
            .fields()
            .iter()
            .map(|field| FieldRow {
                name: field.name().to_string(),
                kind: field.schema().to_string(),
                required: if field.is_optional() { "optional" } else { "required" },
                description: field.description().to_string(),
            })
            .collect();

        println!("{}", entry.name());
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    fn print_json_schema(&self, entry: &Entry) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(&entry.json_schema())?);
        Ok(())
    }
}
