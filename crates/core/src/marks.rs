// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Value marks (sensitive, ephemeral) tracked by path
//!
//! A mark recorded at a path covers the value at that path and everything
//! below it; a mark at the root path covers the whole value. Marks only ever
//! accumulate: applying a mark never removes another one, and the only way to
//! drop a mark is an explicit [`MarkedValue::strip`].

use crate::value::{Path, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A tag that must follow a value through every derived computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mark {
    Sensitive,
    Ephemeral,
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::Sensitive => f.write_str("sensitive"),
            Mark::Ephemeral => f.write_str("ephemeral"),
        }
    }
}

/// Marks keyed by the path they were applied at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMarks(BTreeMap<Path, BTreeSet<Mark>>);

impl PathMarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, path: Path, mark: Mark) {
        self.0.entry(path).or_default().insert(mark);
    }

    /// Add every mark from `other`, keeping ours
    pub fn union(&mut self, other: &PathMarks) {
        for (path, marks) in &other.0 {
            self.0
                .entry(path.clone())
                .or_default()
                .extend(marks.iter().copied());
        }
    }

    /// Marks that apply at `path`, including those inherited from ancestors
    pub fn marks_at(&self, path: &Path) -> BTreeSet<Mark> {
        self.0
            .iter()
            .filter(|(marked, _)| marked.is_prefix_of(path))
            .flat_map(|(_, marks)| marks.iter().copied())
            .collect()
    }

    /// True if `mark` was applied anywhere
    pub fn contains(&self, mark: Mark) -> bool {
        self.0.values().any(|marks| marks.contains(&mark))
    }

    /// Paths carrying `mark` directly
    pub fn paths_with(&self, mark: Mark) -> Vec<&Path> {
        self.0
            .iter()
            .filter(|(_, marks)| marks.contains(&mark))
            .map(|(path, _)| path)
            .collect()
    }

    fn remove(&mut self, mark: Mark) {
        for marks in self.0.values_mut() {
            marks.remove(&mark);
        }
        self.0.retain(|_, marks| !marks.is_empty());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &BTreeSet<Mark>)> {
        self.0.iter()
    }
}

/// A value together with its marks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedValue {
    value: Value,
    marks: PathMarks,
}

impl MarkedValue {
    /// An unmarked value
    pub fn new(value: Value) -> Self {
        Self {
            value,
            marks: PathMarks::new(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn marks(&self) -> &PathMarks {
        &self.marks
    }

    /// Separate the value from its marks so it can cross a boundary that must
    /// never see them (the provider protocol)
    pub fn unmark_deep_with_paths(self) -> (Value, PathMarks) {
        (self.value, self.marks)
    }

    /// Reattach marks collected by [`Self::unmark_deep_with_paths`]
    ///
    /// Marks for paths that do not exist in this value are dropped.
    pub fn mark_with_paths(mut self, marks: &PathMarks) -> Self {
        for (path, set) in marks.iter() {
            if self.value.get_path(path).is_none() {
                continue;
            }
            for mark in set {
                self.marks.insert(path.clone(), *mark);
            }
        }
        self
    }

    /// Mark the whole value
    pub fn mark(mut self, mark: Mark) -> Self {
        self.marks.insert(Path::root(), mark);
        self
    }

    /// Mark the value at one path
    pub fn mark_path(mut self, path: Path, mark: Mark) -> Self {
        self.marks.insert(path, mark);
        self
    }

    /// True if `mark` applies to any part of the value
    pub fn has_mark(&self, mark: Mark) -> bool {
        self.marks.contains(mark)
    }

    /// True if `mark` covers the entire value
    pub fn is_wholly_marked(&self, mark: Mark) -> bool {
        self.marks.marks_at(&Path::root()).contains(&mark)
    }

    pub fn marks_at(&self, path: &Path) -> BTreeSet<Mark> {
        self.marks.marks_at(path)
    }

    /// Remove one kind of mark everywhere, leaving the others
    pub fn strip(mut self, mark: Mark) -> Self {
        self.marks.remove(mark);
        self
    }
}

impl From<Value> for MarkedValue {
    fn from(value: Value) -> Self {
        MarkedValue::new(value)
    }
}

#[cfg(test)]
#[path = "marks_tests.rs"]
mod tests;
