pub mod events;
pub mod schema;
pub mod validate;

use anyhow::Context;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a JSON document from a file (or stdin with "-")
pub fn read_document(path: &Path) -> anyhow::Result<Value> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(value)
    }
}

fn read_from_stdin() -> anyhow::Result<Value> {
    let mut buffer = Vec::new();
    io::stdin().lock().read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    let value = serde_json::from_slice(&buffer).context("parsing stdin")?;
    Ok(value)
}
