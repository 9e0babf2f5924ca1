//! Naming rules for attribute keys.
//!
//! The codec accepts any name. These rules are for callers that create or
//! edit attributes and want to stay within what hosts accept.

/// Longest accepted name, in bytes.
pub const MAX_NAME_LEN: usize = 100;

/// Prefix reserved for names owned by the host.
pub const RESERVED_PREFIX: &str = "RBX";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name is {len} bytes long, the limit is {}", MAX_NAME_LEN)]
    TooLong { len: usize },

    #[error("invalid character {ch:?} at byte {index}")]
    InvalidChar { ch: char, index: usize },

    #[error("name is not valid UTF-8 from byte {index}")]
    NotUtf8 { index: usize },

    #[error("names starting with `{}` are reserved", RESERVED_PREFIX)]
    ReservedPrefix,
}

/// Checks `name` against the length, charset and reserved prefix rules.
pub fn validate_name<N: AsRef<[u8]>>(name: N) -> Result<(), NameError> {
    let name = name.as_ref();
    if name.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong { len: name.len() });
    }

    // Charset errors in the valid UTF-8 prefix take precedence.
    let (text, bad_utf8) = match std::str::from_utf8(name) {
        Ok(text) => (text, None),
        Err(e) => (
            std::str::from_utf8(&name[..e.valid_up_to()]).unwrap_or_default(),
            Some(e.valid_up_to()),
        ),
    };

    if let Some((index, ch)) = text
        .char_indices()
        .find(|(_, ch)| !(ch.is_ascii_alphanumeric() || *ch == '_'))
    {
        return Err(NameError::InvalidChar { ch, index });
    }

    if let Some(index) = bad_utf8 {
        return Err(NameError::NotUtf8 { index });
    }

    if name.starts_with(RESERVED_PREFIX.as_bytes()) {
        return Err(NameError::ReservedPrefix);
    }

    Ok(())
}
