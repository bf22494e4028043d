//! Column layout of the intermediate node and link tables
//!
//! A node row is always `pmid`, then the selected informations in canonical
//! order, then `references`, whatever order the selection was requested in.

use std::fmt;
use std::str::FromStr;

/// PubMed identifier
pub type Pmid = u64;

pub const PMID_COLUMN: &str = "pmid";
pub const REFERENCES_COLUMN: &str = "references";
pub const LINK_COLUMNS: [&str; 2] = ["source", "target"];

/// One optional metadata field of a node row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Information {
    Title,
    Abstract,
    Date,
    Authors,
    Journal,
    Keywords,
}

impl Information {
    /// Canonical column order
    pub const ALL: [Information; 6] = [
        Self::Title,
        Self::Abstract,
        Self::Date,
        Self::Authors,
        Self::Journal,
        Self::Keywords,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Abstract => "abstract",
            Self::Date => "date",
            Self::Authors => "authors",
            Self::Journal => "journal",
            Self::Keywords => "keywords",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Information {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Information name not in the recognized set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInformation(pub String);

impl fmt::Display for UnknownInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown information `{}` (expected one of: title, abstract, date, authors, journal, keywords)",
            self.0
        )
    }
}

impl std::error::Error for UnknownInformation {}

impl FromStr for Information {
    type Err = UnknownInformation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|info| info.name() == s.trim())
            .ok_or_else(|| UnknownInformation(s.to_string()))
    }
}

/// Selection of informations to extract, iterated in canonical order
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InformationSet(u8);

impl InformationSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(0b11_1111)
    }

    pub fn insert(&mut self, info: Information) {
        self.0 |= info.bit();
    }

    pub fn contains(self, info: Information) -> bool {
        self.0 & info.bit() != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Information> {
        Information::ALL
            .into_iter()
            .filter(move |info| self.contains(*info))
    }

    /// Parse names such as `["title", "date"]`
    pub fn parse_names<S: AsRef<str>>(names: &[S]) -> Result<Self, UnknownInformation> {
        names
            .iter()
            .map(|name| name.as_ref().parse::<Information>())
            .collect()
    }

    /// Number of fields in a complete node row
    pub fn node_width(self) -> usize {
        self.len() + 2
    }

    /// Header of the node table: `pmid`, selected names, `references`
    pub fn node_columns(self) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(self.node_width());
        columns.push(PMID_COLUMN);
        columns.extend(self.iter().map(Information::name));
        columns.push(REFERENCES_COLUMN);
        columns
    }
}

impl FromIterator<Information> for InformationSet {
    fn from_iter<I: IntoIterator<Item = Information>>(iter: I) -> Self {
        let mut set = Self::empty();
        for info in iter {
            set.insert(info);
        }
        set
    }
}

impl From<Information> for InformationSet {
    fn from(info: Information) -> Self {
        std::iter::once(info).collect()
    }
}

impl fmt::Debug for InformationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for InformationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Information::name).collect();
        f.write_str(&names.join(", "))
    }
}
