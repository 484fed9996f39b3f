use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::CardLabel;

/// Labels of a training sheet, keyed by extraction index.
///
/// One card per line as `index rank suit`, separated by whitespace. Blank
/// lines and `#` comments are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels {
    entries: BTreeMap<usize, CardLabel>,
}

impl Labels {
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for (n, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let syntax = || Error::LabelSyntax {
                line: n + 1,
                content: line.to_string(),
            };
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            let [index, rank, suit] = fields.as_slice() else {
                return Err(syntax());
            };
            let index: usize = index.parse().map_err(|_| syntax())?;

            if entries.insert(index, CardLabel::new(*rank, *suit)).is_some() {
                return Err(Error::DuplicateLabel(index));
            }
        }

        Ok(Self { entries })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn get(&self, index: usize) -> Option<&CardLabel> {
        self.entries.get(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
