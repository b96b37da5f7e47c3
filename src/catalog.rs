//! The immutable, ordered set of quiz levels.

use std::collections::HashMap;
use std::path::Path;

use crate::data::{LoadError, load_catalog_from_json};
use crate::models::Level;

/// Levels in play order. Each level's successor is the next entry; the last has none.
#[derive(Debug, Clone)]
pub struct QuizCatalog {
    levels: Vec<Level>,
    total_possible: usize,
}

impl QuizCatalog {
    /// Build a catalog whose order is the order of `levels`.
    pub fn new(levels: Vec<Level>) -> Result<Self, LoadError> {
        Self::chained(levels.into_iter().map(|level| (level, None)).collect())
    }

    /// Build a catalog from levels carrying optional successor titles.
    ///
    /// With no successors named, document order applies. Otherwise the
    /// chain starting at the first level must visit every level once.
    pub fn chained(entries: Vec<(Level, Option<String>)>) -> Result<Self, LoadError> {
        if entries.is_empty() {
            return Err(LoadError::EmptyCatalog);
        }

        let successors = resolve_successors(&entries)?;
        if successors.iter().all(Option::is_none) {
            return Ok(Self::from_ordered(
                entries.into_iter().map(|(level, _)| level).collect(),
            ));
        }

        let mut visited = vec![false; entries.len()];
        let mut order = Vec::with_capacity(entries.len());
        let mut cursor = Some(0);
        while let Some(position) = cursor {
            if visited[position] {
                return Err(LoadError::SuccessorCycle {
                    level: entries[position].0.title().to_string(),
                });
            }
            visited[position] = true;
            order.push(position);
            cursor = successors[position];
        }

        if let Some(orphan) = visited.iter().position(|seen| !seen) {
            return Err(LoadError::UnreachableLevel {
                level: entries[orphan].0.title().to_string(),
            });
        }

        let mut slots: Vec<Option<Level>> = entries.into_iter().map(|(l, _)| Some(l)).collect();
        let levels = order
            .into_iter()
            .filter_map(|position| slots[position].take())
            .collect();
        Ok(Self::from_ordered(levels))
    }

    /// Load a catalog from a JSON file. See [`crate::parse_catalog`] for the format.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        load_catalog_from_json(path)
    }

    fn from_ordered(levels: Vec<Level>) -> Self {
        let total_possible = levels.iter().map(Level::len).sum();
        Self {
            levels,
            total_possible,
        }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level_at(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn first_level(&self) -> &Level {
        &self.levels[0]
    }

    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.levels.iter().position(|level| level.title() == title)
    }

    /// The level after `title`, or `None` for the final level or an unknown title.
    pub fn successor_of(&self, title: &str) -> Option<&Level> {
        self.index_of(title)
            .and_then(|index| self.successor_index(index))
            .map(|index| &self.levels[index])
    }

    pub fn successor_index(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.levels.len()).then_some(next)
    }

    /// Sum of question counts across every level.
    pub fn total_possible(&self) -> usize {
        self.total_possible
    }
}

/// Positions of each entry's named successor, rejecting duplicate titles and unknown names.
fn resolve_successors(
    entries: &[(Level, Option<String>)],
) -> Result<Vec<Option<usize>>, LoadError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(entries.len());
    for (position, (level, _)) in entries.iter().enumerate() {
        if index.insert(level.title(), position).is_some() {
            return Err(LoadError::DuplicateLevel {
                level: level.title().to_string(),
            });
        }
    }

    entries
        .iter()
        .map(|(level, next)| match next {
            None => Ok(None),
            Some(title) => index.get(title.as_str()).copied().map(Some).ok_or_else(|| {
                LoadError::UnknownSuccessor {
                    level: level.title().to_string(),
                    successor: title.clone(),
                }
            }),
        })
        .collect()
}
