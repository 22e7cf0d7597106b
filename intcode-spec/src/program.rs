//! # Program Text and Image Format
//!
//! Program text is a flat comma-separated list of signed integers, free to
//! span lines. A single trailing comma is tolerated.
//!
//! The binary image layout:
//! ```text
//! Offset  Size  Field
//! ──────────────────────────────────
//! 0x00    4     magic ("ICDE")
//! 0x04    4     version
//! 0x08    32    SHA-256 of the words (little-endian i64s)
//! 0x28    ..    bincode-encoded word list
//! ```

use logos::Logos;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, SpecError};
use crate::lexer::{position, Token};
use crate::{Word, MAGIC, VERSION};

/// Image header size in bytes
pub const HEADER_SIZE: usize = 4 + 4 + 32;

/// An Intcode program: the initial memory contents from address 0
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Program {
    words: Vec<Word>,
}

impl Program {
    pub fn from_words(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Parse comma-separated program text
    pub fn parse(source: &str) -> Result<Self> {
        let syntax_error = |offset: usize, message: &str| {
            let (line, column) = position(source, offset);
            SpecError::SyntaxError {
                line,
                column,
                message: message.to_string(),
            }
        };

        let mut words = Vec::new();
        let mut expect_number = true;
        let mut lexer = Token::lexer(source);

        while let Some(token) = lexer.next() {
            let offset = lexer.span().start;
            match token {
                Ok(Token::Number(value)) if expect_number => {
                    words.push(value);
                    expect_number = false;
                }
                Ok(Token::Number(_)) => return Err(syntax_error(offset, "expected ','")),
                Ok(Token::Comma) if !expect_number => expect_number = true,
                Ok(Token::Comma) => return Err(syntax_error(offset, "expected number")),
                Err(()) => {
                    let message = format!("invalid token '{}'", lexer.slice());
                    return Err(syntax_error(offset, &message));
                }
            }
        }

        if words.is_empty() {
            return Err(SpecError::EmptyProgram);
        }
        Ok(Self { words })
    }

    /// Read and parse program text from a stream
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Self::parse(&source)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn into_words(self) -> Vec<Word> {
        self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// SHA-256 over the words in little-endian byte order
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for word in &self.words {
            hasher.update(word.to_le_bytes());
        }
        hasher.finalize().into()
    }

    /// Check whether `bytes` start with the image magic number
    pub fn is_image(bytes: &[u8]) -> bool {
        bytes.len() >= 4 && bytes[..4] == MAGIC.to_le_bytes()
    }

    /// Serialize program to a binary image
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(&self.words)
            .map_err(|e| SpecError::InvalidFormat(e.to_string()))?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
        bytes.extend_from_slice(&MAGIC.to_le_bytes());
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(&self.hash());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Deserialize program from a binary image
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(SpecError::InvalidFormat("File too small".into()));
        }
        if !Self::is_image(bytes) {
            return Err(SpecError::InvalidFormat("Invalid magic number".into()));
        }

        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version > VERSION {
            return Err(SpecError::InvalidFormat(format!(
                "Unsupported version: {:08x}",
                version
            )));
        }

        let words: Vec<Word> = bincode::deserialize(&bytes[HEADER_SIZE..])
            .map_err(|e| SpecError::InvalidFormat(e.to_string()))?;
        let program = Self { words };

        if program.hash()[..] != bytes[8..HEADER_SIZE] {
            return Err(SpecError::InvalidFormat("Checksum mismatch".into()));
        }
        Ok(program)
    }

    /// Save program as a binary image
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Load a program file, accepting either an image or program text
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        if Self::is_image(&bytes) {
            return Self::from_bytes(&bytes);
        }
        let source = String::from_utf8(bytes)
            .map_err(|e| SpecError::InvalidFormat(e.to_string()))?;
        Self::parse(&source)
    }
}

impl From<Vec<Word>> for Program {
    fn from(words: Vec<Word>) -> Self {
        Self::from_words(words)
    }
}

impl FromStr for Program {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{word}")?;
        }
        Ok(())
    }
}
