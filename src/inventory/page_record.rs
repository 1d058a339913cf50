use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Kind of an outbound reference found on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// Anchor `href` target
    Link,
    /// Image `src`
    Image,
}

impl ReferenceKind {
    /// Short label used in presentation output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Link => "LINK",
            Self::Image => "IMG",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single recorded reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub target: String,
    pub kind: ReferenceKind,
}

/// Every outbound reference recorded for one page
///
/// Targets are unique: the first classification of a target wins and later
/// insertions of the same target are ignored. Discovery order is kept.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PageRecord {
    references: Vec<Reference>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl PageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reference unless its target is already present
    ///
    /// Returns true if the reference was added.
    pub fn insert(&mut self, target: impl Into<String>, kind: ReferenceKind) -> bool {
        let target = target.into();
        if !self.seen.insert(target.clone()) {
            return false;
        }
        self.references.push(Reference { target, kind });
        true
    }

    /// The kind recorded for a target, if any
    pub fn get(&self, target: &str) -> Option<ReferenceKind> {
        self.references
            .iter()
            .find(|r| r.target == target)
            .map(|r| r.kind)
    }

    pub fn contains(&self, target: &str) -> bool {
        self.seen.contains(target)
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// References in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter()
    }

    /// Targets of a given kind, in discovery order
    pub fn targets(&self, kind: ReferenceKind) -> impl Iterator<Item = &str> {
        self.references
            .iter()
            .filter(move |r| r.kind == kind)
            .map(|r| r.target.as_str())
    }

    pub fn count(&self, kind: ReferenceKind) -> usize {
        self.targets(kind).count()
    }
}

// Records compare as sets: discovery order is presentation only.
impl PartialEq for PageRecord {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .references
                .iter()
                .all(|r| other.get(&r.target) == Some(r.kind))
    }
}

impl Eq for PageRecord {}
