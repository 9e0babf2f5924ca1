use std::io::{Read, Write};
use std::path::Path;

use attr_format::Model;
use base64::Engine;

use crate::error::{Error, Result};

/// An attribute blob decoded from an input file.
#[derive(Debug)]
pub struct Decoded {
    pub model: Model,
    /// Bytes consumed by the dictionary.
    pub bytes: u64,
    /// Size of the blob after base64 decoding, if any.
    pub len: usize,
}

impl Decoded {
    pub fn trailing(&self) -> usize {
        self.len.saturating_sub(self.bytes as usize)
    }
}

pub fn is_stdio(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn display_path(path: &Path) -> String {
    if is_stdio(path) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

/// Reads all of `path`, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let result = if is_stdio(path) {
        let mut buf = Vec::new();
        std::io::stdin().lock().read_to_end(&mut buf).map(|_| buf)
    } else {
        std::fs::read(path)
    };

    result.map_err(|source| Error::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a blob, decoding it from base64 text first when asked to.
pub fn read_blob(path: &Path, base64: bool) -> Result<Vec<u8>> {
    let data = read_input(path)?;
    if !base64 {
        return Ok(data);
    }

    let text: Vec<u8> = data
        .into_iter()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    base64::engine::general_purpose::STANDARD
        .decode(&text)
        .map_err(|source| Error::Base64 {
            path: path.to_path_buf(),
            source,
        })
}

pub fn decode_blob(path: &Path, base64: bool) -> Result<Decoded> {
    let data = read_blob(path, base64)?;
    let (model, bytes) = Model::from_slice(&data).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes as usize != data.len() {
        tracing::debug!(
            bytes,
            len = data.len(),
            path = %display_path(path),
            "trailing data after dictionary"
        );
    }

    Ok(Decoded {
        model,
        bytes,
        len: data.len(),
    })
}

/// Writes `data` to `path`, or stdout when `path` is `-`.
pub fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    let result = if is_stdio(path) {
        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        stdout.write_all(data).and_then(|_| stdout.flush())
    } else {
        std::fs::write(path, data)
    };

    result.map_err(|source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}
