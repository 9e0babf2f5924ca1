use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use attr_format::Dictionary;

use crate::error::{Error, Result};
use crate::util::decode_blob;

pub fn run(path: &Path, base64: bool) -> Result<()> {
    let decoded = decode_blob(path, base64)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_table(&mut out, &decoded.model.value)
        .and_then(|_| {
            writeln!(
                out,
                "{} entries, {} bytes",
                decoded.model.value.len(),
                decoded.bytes
            )
        })
        .map_err(|source| Error::WriteOutput {
            path: "-".into(),
            source,
        })?;

    if decoded.trailing() > 0 {
        eprintln!("warning: {} trailing bytes ignored", decoded.trailing());
    }

    Ok(())
}

/// One row per entry in stored order. Entries hidden by an earlier entry
/// of the same name are marked with `*`.
pub fn write_table<W: Write>(out: &mut W, dict: &Dictionary) -> std::io::Result<()> {
    let shadowed: HashSet<usize> = dict.shadowed().into_iter().collect();

    writeln!(out, "{:>5}  {:<14}  {:<24}  Value", "Index", "Type", "Name")?;
    writeln!(out, "{}", "-".repeat(60))?;

    for (index, entry) in dict.iter().enumerate() {
        let mark = if shadowed.contains(&index) { "*" } else { " " };
        writeln!(
            out,
            "{:>5}{} {:<14}  {:<24}  {}",
            index,
            mark,
            entry.value.value_type(),
            entry.name,
            entry.value
        )?;
    }

    if !shadowed.is_empty() {
        writeln!(out, "* shadowed by an earlier entry with the same name")?;
    }

    Ok(())
}
