//! Inheritance ordering for profile batches.
//!
//! The slicer loads a vendor's profiles in manifest order and looks each
//! `inherits` reference up among the profiles it has already loaded, so a
//! parent must always be listed before its children. This module turns an
//! unordered batch of [`Entry`] values into such an order with Kahn's
//! algorithm, breaking ties by name so the output is reproducible.
//!
//! Entries whose parent cannot be found, or whose chain loops back on
//! itself, are never an error here. They come back in
//! [`Resolution::unresolved`] and the [`UnresolvedPolicy`] decides whether
//! they still appear in the ordered output.
//!
//! # Example
//!
//! ```
//! use profile_core::entry::{Entry, ProfileKind};
//! use profile_core::resolver::{resolve, UnresolvedPolicy};
//!
//! let entries = vec![
//!     Entry::new("C", ProfileKind::Process, "process/C.json").inheriting("B"),
//!     Entry::new("A", ProfileKind::Process, "process/A.json"),
//!     Entry::new("B", ProfileKind::Process, "process/B.json").inheriting("A"),
//! ];
//!
//! let resolution = resolve(&entries, UnresolvedPolicy::AppendAtEnd);
//! assert_eq!(resolution.names(), ["A", "B", "C"]);
//! assert!(resolution.unresolved.is_empty());
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::entry::{Entry, ManifestRecord};

/// What to do with entries whose inheritance cannot be satisfied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedPolicy {
    /// Keep every entry. Entries with a missing parent are ordered as roots;
    /// entries stuck behind a cycle go last, sorted by name.
    #[default]
    #[serde(rename = "append")]
    AppendAtEnd,
    /// Drop unresolved entries, and everything inheriting from them, from the
    /// ordered output. They are only reported.
    #[serde(rename = "exclude")]
    Exclude,
}

impl fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedPolicy::AppendAtEnd => f.write_str("append"),
            UnresolvedPolicy::Exclude => f.write_str("exclude"),
        }
    }
}

impl FromStr for UnresolvedPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(UnresolvedPolicy::AppendAtEnd),
            "exclude" => Ok(UnresolvedPolicy::Exclude),
            other => Err(Error::UnknownPolicy {
                value: other.to_string(),
            }),
        }
    }
}

/// Why an entry could not be placed after its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// The declared parent is not part of the batch.
    MissingParent { parent: String },
    /// The entry sits on an inheritance cycle. Members follow the `inherits`
    /// links, starting at the smallest name.
    Cycle { members: Vec<String> },
    /// The entry's chain runs into a cycle at `ancestor`.
    BlockedBy { ancestor: String },
    /// Dropped under [`UnresolvedPolicy::Exclude`] because `ancestor` has a
    /// missing parent.
    Excluded { ancestor: String },
}

impl UnresolvedReason {
    /// True for cycle members and entries blocked behind a cycle.
    pub fn is_cyclic(&self) -> bool {
        matches!(
            self,
            UnresolvedReason::Cycle { .. } | UnresolvedReason::BlockedBy { .. }
        )
    }
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::MissingParent { parent } => {
                write!(f, "parent '{}' not found", parent)
            }
            UnresolvedReason::Cycle { members } => {
                write!(f, "inheritance cycle: {}", members.join(" -> "))?;
                match members.first() {
                    Some(first) => write!(f, " -> {first}"),
                    None => Ok(()),
                }
            }
            UnresolvedReason::BlockedBy { ancestor } => {
                write!(f, "ancestor '{}' is part of an inheritance cycle", ancestor)
            }
            UnresolvedReason::Excluded { ancestor } => {
                write!(f, "ancestor '{}' has a missing parent", ancestor)
            }
        }
    }
}

/// An entry reported as having an unmet dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unresolved {
    pub name: String,
    pub sub_path: String,
    #[serde(flatten)]
    pub reason: UnresolvedReason,
}

/// Output of [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Entries in load order.
    pub ordered: Vec<Entry>,
    /// Entries with unmet dependencies, sorted by name.
    pub unresolved: Vec<Unresolved>,
}

impl Resolution {
    /// Names of the ordered entries.
    pub fn names(&self) -> Vec<&str> {
        self.ordered.iter().map(|e| e.name.as_str()).collect()
    }

    /// Names of the unresolved entries.
    pub fn unresolved_names(&self) -> Vec<&str> {
        self.unresolved.iter().map(|u| u.name.as_str()).collect()
    }

    /// Whether every entry was placed after its parent.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Whether any entry is on, or blocked by, an inheritance cycle.
    pub fn has_cycles(&self) -> bool {
        self.unresolved.iter().any(|u| u.reason.is_cyclic())
    }

    /// Manifest records for the ordered entries.
    pub fn records(&self) -> Vec<ManifestRecord> {
        self.ordered.iter().map(Entry::record).collect()
    }
}

/// Where following an entry's parent chain leads.
#[derive(Debug, PartialEq, Eq)]
enum ChainFate {
    /// The chain ends at a root or a missing parent.
    Open,
    /// The chain returns to the starting entry; holds the cycle's indices.
    Cycle(Vec<usize>),
    /// The chain enters a cycle that does not contain the starting entry.
    Blocked(usize),
}

/// Parent/child view over a batch of entries.
///
/// Every entry has at most one parent, so in-degrees are 0 or 1. When
/// several entries share a name, [`parent_of`](Self::parent_of) and
/// [`is_dangling`](Self::is_dangling) resolve it to the first of them in
/// input order, while ordering releases the children once, when the first
/// copy of the name is emitted.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    entries: &'a [Entry],
    by_name: HashMap<&'a str, usize>,
    children: HashMap<&'a str, Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph for a batch.
    pub fn new(entries: &'a [Entry]) -> Self {
        let mut by_name: HashMap<&str, usize> = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            by_name.entry(entry.name.as_str()).or_insert(idx);
        }

        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            if let Some(parent) = entry.inherits.as_deref() {
                if by_name.contains_key(parent) {
                    children.entry(parent).or_default().push(idx);
                }
            }
        }

        Self {
            entries,
            by_name,
            children,
        }
    }

    /// Number of entries in the batch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry `idx` inherits from, when it is in the batch.
    pub fn parent_of(&self, idx: usize) -> Option<usize> {
        let parent = self.entries[idx].inherits.as_deref()?;
        self.by_name.get(parent).copied()
    }

    /// Whether `idx` declares a parent that is not in the batch.
    pub fn is_dangling(&self, idx: usize) -> bool {
        self.entries[idx]
            .inherits
            .as_deref()
            .is_some_and(|parent| !self.by_name.contains_key(parent))
    }

    /// Indices of the entries inheriting from `name`.
    pub fn children_of(&self, name: &str) -> &[usize] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kahn's algorithm over the batch.
    ///
    /// Returns the emitted indices in order, and the indices that were never
    /// reached (cycle members and their descendants).
    fn kahn(&self) -> (Vec<usize>, Vec<usize>) {
        let mut in_degree: Vec<usize> = (0..self.len())
            .map(|idx| usize::from(self.parent_of(idx).is_some()))
            .collect();

        let mut ready: BTreeSet<(&str, usize)> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(idx, _)| (self.entries[idx].name.as_str(), idx))
            .collect();

        let mut emitted = Vec::with_capacity(self.len());
        let mut released: HashSet<&str> = HashSet::new();

        while let Some((name, idx)) = ready.pop_first() {
            emitted.push(idx);

            // Only the first emitted copy of a name releases its children
            if !released.insert(name) {
                continue;
            }
            for &child in self.children_of(name) {
                in_degree[child] = in_degree[child].saturating_sub(1);
                if in_degree[child] == 0 {
                    ready.insert((self.entries[child].name.as_str(), child));
                }
            }
        }

        let mut reached = vec![false; self.len()];
        for &idx in &emitted {
            reached[idx] = true;
        }
        let unreached = (0..self.len()).filter(|&idx| !reached[idx]).collect();

        (emitted, unreached)
    }

    /// Follow the parent chain starting at `idx`.
    fn chain_fate(&self, idx: usize) -> ChainFate {
        let mut path = vec![idx];
        let mut position: HashMap<usize, usize> = HashMap::from([(idx, 0)]);
        let mut current = idx;

        while let Some(parent) = self.parent_of(current) {
            if let Some(&at) = position.get(&parent) {
                return if at == 0 {
                    ChainFate::Cycle(path)
                } else {
                    ChainFate::Blocked(parent)
                };
            }
            position.insert(parent, path.len());
            path.push(parent);
            current = parent;
        }

        ChainFate::Open
    }

    fn unresolved(&self, idx: usize, reason: UnresolvedReason) -> Unresolved {
        Unresolved {
            name: self.entries[idx].name.clone(),
            sub_path: self.entries[idx].sub_path.clone(),
            reason,
        }
    }

    /// Classify an entry Kahn's algorithm never reached.
    fn classify_unreached(&self, idx: usize) -> UnresolvedReason {
        match self.chain_fate(idx) {
            ChainFate::Cycle(path) => {
                let mut members: Vec<String> = path
                    .iter()
                    .map(|&i| self.entries[i].name.clone())
                    .collect();
                let start = members
                    .iter()
                    .enumerate()
                    .min_by(|a, b| a.1.cmp(b.1))
                    .map_or(0, |(at, _)| at);
                members.rotate_left(start);
                UnresolvedReason::Cycle { members }
            }
            ChainFate::Blocked(ancestor) => UnresolvedReason::BlockedBy {
                ancestor: self.entries[ancestor].name.clone(),
            },
            // Only reachable with duplicate names whose first occurrence is
            // stuck; attribute it to the declared parent.
            ChainFate::Open => UnresolvedReason::BlockedBy {
                ancestor: self.entries[idx].inherits.clone().unwrap_or_default(),
            },
        }
    }
}

/// Order a batch of entries so every parent precedes its children.
///
/// Pure: the input is not modified and nothing is read or written.
pub fn resolve(entries: &[Entry], policy: UnresolvedPolicy) -> Resolution {
    let graph = DependencyGraph::new(entries);
    let (emitted, mut unreached) = graph.kahn();

    let mut ordered = Vec::with_capacity(entries.len());
    let mut unresolved = Vec::new();

    match policy {
        UnresolvedPolicy::AppendAtEnd => {
            for &idx in &emitted {
                if graph.is_dangling(idx) {
                    let parent = entries[idx].inherits.clone().unwrap_or_default();
                    let reason = UnresolvedReason::MissingParent { parent };
                    unresolved.push(graph.unresolved(idx, reason));
                }
                ordered.push(entries[idx].clone());
            }
        }
        UnresolvedPolicy::Exclude => {
            // Parents are emitted before children, so one pass sees every
            // excluded ancestor before its descendants.
            let mut excluded: HashMap<&str, &str> = HashMap::new();
            for &idx in &emitted {
                let entry = &entries[idx];
                if graph.is_dangling(idx) {
                    let parent = entry.inherits.clone().unwrap_or_default();
                    excluded.insert(entry.name.as_str(), entry.name.as_str());
                    let reason = UnresolvedReason::MissingParent { parent };
                    unresolved.push(graph.unresolved(idx, reason));
                    continue;
                }
                let blocked_by = entry
                    .inherits
                    .as_deref()
                    .and_then(|parent| excluded.get(parent).copied());
                if let Some(ancestor) = blocked_by {
                    excluded.insert(entry.name.as_str(), ancestor);
                    unresolved.push(graph.unresolved(
                        idx,
                        UnresolvedReason::Excluded {
                            ancestor: ancestor.to_string(),
                        },
                    ));
                    continue;
                }
                ordered.push(entry.clone());
            }
        }
    }

    unreached.sort_by(|&a, &b| entries[a].name.cmp(&entries[b].name).then(a.cmp(&b)));
    for &idx in &unreached {
        unresolved.push(graph.unresolved(idx, graph.classify_unreached(idx)));
        if policy == UnresolvedPolicy::AppendAtEnd {
            ordered.push(entries[idx].clone());
        }
    }

    unresolved.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.sub_path.cmp(&b.sub_path))
    });

    tracing::trace!(
        total = entries.len(),
        ordered = ordered.len(),
        unresolved = unresolved.len(),
        %policy,
        "Resolved profile batch"
    );

    Resolution {
        ordered,
        unresolved,
    }
}
