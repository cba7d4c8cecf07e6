use crate::services::error::DispatchError;
use std::fmt;
use std::path::Path;

/// Exact bytes of one boxscore as they travel to the statistics service.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct EncodedFile(Vec<u8>);

impl EncodedFile {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders every byte as a `0xNN` token, two lowercase hex digits each.
    pub fn to_hex_tokens(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|b| format!("0x{}", hex::encode([*b])))
            .collect()
    }

    /// Inverse of [`EncodedFile::to_hex_tokens`]. The `0x` prefix is optional
    /// and digits may be either case; every token must hold exactly one byte.
    pub fn from_hex_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, hex::FromHexError> {
        let mut bytes = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref();
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            let mut byte = [0u8; 1];
            hex::decode_to_slice(digits, &mut byte)?;
            bytes.push(byte[0]);
        }
        Ok(Self(bytes))
    }
}

impl fmt::Debug for EncodedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_hex_tokens()).finish()
    }
}

impl From<Vec<u8>> for EncodedFile {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Reads the whole file at `path` into an [`EncodedFile`].
pub async fn encode(path: &Path) -> Result<EncodedFile, DispatchError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| DispatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(EncodedFile(bytes))
}
