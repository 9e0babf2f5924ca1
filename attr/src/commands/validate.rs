use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::util::{decode_blob, display_path, Decoded};

pub fn run(files: &[PathBuf], base64: bool) -> Result<()> {
    let mut failed = 0;

    for path in files {
        match decode_blob(path, base64) {
            Ok(decoded) => {
                for line in report(path, &decoded) {
                    println!("{}", line);
                }
            }
            Err(e) => {
                failed += 1;
                println!("FAIL {}: {:#}", display_path(path), anyhow::Error::from(e));
            }
        }
    }

    if failed > 0 {
        return Err(Error::ValidationFailed {
            failed,
            total: files.len(),
        });
    }

    Ok(())
}

/// Summary line followed by one warning line per problem found.
pub fn report(path: &Path, decoded: &Decoded) -> Vec<String> {
    let dict = &decoded.model.value;
    let mut lines = vec![format!(
        "ok   {}: {} entries, {} bytes",
        display_path(path),
        dict.len(),
        decoded.bytes
    )];

    if decoded.trailing() > 0 {
        lines.push(format!(
            "     warning: {} trailing bytes after dictionary",
            decoded.trailing()
        ));
    }

    for name in dict.duplicates() {
        lines.push(format!("     warning: duplicate name {:?}", name));
    }

    for (index, e) in dict.check_names() {
        lines.push(format!(
            "     warning: entry {} ({:?}): {}",
            index,
            dict.entries()[index].name,
            e
        ));
    }

    lines
}
