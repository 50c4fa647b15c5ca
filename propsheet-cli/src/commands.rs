//! The convert and regex pipelines, independent of where text comes from.

use std::io::{self, Read, Write};

use colored::Colorize;
use propsheet_core::{Document, compile, parse, rewrite};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::error::CliError;

/// Read all props text from `reader`
pub fn read_source<R: Read>(mut reader: R) -> Result<String, CliError> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    Ok(source)
}

/// Serialize a document, pretty-printed with sorted keys when `verbose`
pub fn to_json(doc: &Document, verbose: bool) -> Result<String, CliError> {
    if !verbose {
        return Ok(serde_json::to_string(doc)?);
    }
    // Going through `Value` sorts every object's keys.
    let value = doc.to_json_value()?;
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| CliError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Compile props text into its JSON text
pub fn convert_source(source: &str, verbose: bool) -> Result<String, CliError> {
    let doc = compile(source)?;
    info!(entries = doc.len(), "compiled props");
    to_json(&doc, verbose)
}

/// Write JSON text followed by a newline
pub fn write_output<W: Write>(mut writer: W, json: &str) -> Result<(), CliError> {
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Rewrite one fuzzy pattern and describe its capture groups
pub fn describe_pattern<W: Write>(
    mut writer: W,
    pattern: &str,
    debug: bool,
) -> Result<(), CliError> {
    let expr = parse(pattern)?;
    let rewritten = rewrite(&expr)?;

    if debug {
        writeln!(writer, "{}", "AST:".bold())?;
        writeln!(writer, "{:#?}", expr)?;
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "Output:".bold())?;
    writeln!(writer, "  {}", rewritten.pattern.green())?;
    writeln!(writer, "  groups: {}", rewritten.groups.group_count())?;

    if rewritten.groups.group_count() > 0 {
        writeln!(writer)?;
        writeln!(writer, "{}", "Capture groups:".bold())?;
        for group in rewritten.groups.groups() {
            match rewritten.assertions.get(&group.index) {
                Some(assertions) => writeln!(
                    writer,
                    "  group {}: version {}",
                    group.index,
                    assertions.to_string().cyan()
                )?,
                None => writeln!(writer, "  group {}: plain", group.index)?,
            }
        }
    }
    Ok(())
}
