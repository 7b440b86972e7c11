//! Loading allowlist identifiers from text
//!
//! One address per line. Blank lines and lines starting with `#` are
//! skipped; trailing `# comments` are stripped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use mintgate_primitives::Address;

use crate::error::{AllowlistError, AllowlistResult};
use crate::tree::AllowlistTree;

/// A fixed, ordered list of identifiers supplied at configuration time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowlistSource {
    addresses: Vec<Address>,
}

impl AllowlistSource {
    pub fn new(addresses: Vec<Address>) -> Self {
        Self { addresses }
    }

    /// Parse identifiers from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> AllowlistResult<Self> {
        let mut addresses = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let entry = line.split('#').next().unwrap_or("").trim();
            if entry.is_empty() {
                continue;
            }
            let address = Address::parse(entry).map_err(|reason| {
                AllowlistError::InvalidSourceLine {
                    line: line_num + 1,
                    reason,
                }
            })?;
            addresses.push(address);
        }
        Ok(Self { addresses })
    }

    /// Parse identifiers from a file
    pub fn from_file(path: impl AsRef<Path>) -> AllowlistResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Identifiers in source order (duplicates preserved)
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Build the Merkle tree for this source
    pub fn build_tree(&self) -> AllowlistTree {
        AllowlistTree::build(self.addresses.iter().copied())
    }
}
