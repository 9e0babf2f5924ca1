use std::path::Path;

use attr_format::Dictionary;

use crate::error::{Error, Result};
use crate::util::{decode_blob, write_output};

pub fn run(path: &Path, base64: bool, raw: bool) -> Result<()> {
    let decoded = decode_blob(path, base64)?;
    let mut text = render(&decoded.model.value, raw);
    text.push('\n');
    write_output(Path::new("-"), text.as_bytes())
}

/// Pretty JSON: an object keyed by name (first entry wins), or with `raw`
/// the full entry array including duplicates.
pub fn render(dict: &Dictionary, raw: bool) -> String {
    let json = if raw {
        dict.to_json()
    } else {
        dict.to_json_map()
    };
    // Serializing a `serde_json::Value` cannot fail.
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
}

pub(crate) fn parse(path: &Path, data: &[u8]) -> Result<Dictionary> {
    let json: serde_json::Value =
        serde_json::from_slice(data).map_err(|source| Error::ParseJson {
            path: path.to_path_buf(),
            source,
        })?;
    Dictionary::from_json(&json).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}
