use std::path::Path;

use attr_format::{Dictionary, Model};
use base64::Engine;

use crate::error::{Error, Result};
use crate::util::{display_path, read_input, write_output};

pub fn run(input: &Path, output: &Path, base64: bool, no_check: bool) -> Result<()> {
    let data = read_input(input)?;
    let dict = super::json::parse(input, &data)?;
    let blob = build(dict, output, base64, !no_check)?;
    write_output(output, &blob)?;

    tracing::info!(
        bytes = blob.len(),
        output = %display_path(output),
        "wrote attributes"
    );
    Ok(())
}

/// Encodes `dict`, optionally as base64 text, after checking entry names.
pub fn build(dict: Dictionary, output: &Path, base64: bool, check: bool) -> Result<Vec<u8>> {
    if check {
        if let Some((index, source)) = dict.check_names().into_iter().next() {
            return Err(Error::InvalidName {
                index,
                name: dict.entries()[index].name.to_string(),
                source,
            });
        }
    }

    for name in dict.duplicates() {
        tracing::warn!(%name, "duplicate name; only the first entry will be visible");
    }

    let blob = Model::new(dict).to_vec().map_err(|source| Error::Encode {
        path: output.to_path_buf(),
        source,
    })?;

    if base64 {
        let mut text = base64::engine::general_purpose::STANDARD.encode(&blob);
        text.push('\n');
        Ok(text.into_bytes())
    } else {
        Ok(blob)
    }
}
