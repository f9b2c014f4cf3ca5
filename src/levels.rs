//! Level specification parsing
//!
//! Turns free-form input such as `"4,5-7,9-12,15"` into an ordered,
//! deduplicated [`LevelSpec`]. Malformed tokens are dropped one at a time;
//! the rest of the input is still parsed.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Ordered set of difficulty levels (every element >= 1)
///
/// Serializes as a JSON array; deserializing drops zeros and duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelSpec(BTreeSet<u32>);

impl LevelSpec {
    /// Create an empty level set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of levels in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no levels were parsed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `level` is part of the set
    pub fn contains(&self, level: u32) -> bool {
        self.0.contains(&level)
    }

    /// Levels in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Levels as a vector, ascending
    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    /// Comma-joined levels, suitable for a `levels=` query parameter
    pub fn to_query_value(&self) -> String {
        self.iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Consecutive runs collapsed into ranges, e.g. `"4-7,9-12,15"`
    ///
    /// Parsing the returned string yields an equal set.
    pub fn compact(&self) -> String {
        let mut parts = Vec::new();
        let mut iter = self.iter();
        let Some(first) = iter.next() else {
            return String::new();
        };

        let (mut start, mut end) = (first, first);
        for level in iter {
            if level == end + 1 {
                end = level;
                continue;
            }
            parts.push(format_run(start, end));
            start = level;
            end = level;
        }
        parts.push(format_run(start, end));
        parts.join(",")
    }

    fn insert(&mut self, level: u32) {
        if level == 0 {
            debug!("ignoring level 0");
            return;
        }
        self.0.insert(level);
    }
}

fn format_run(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}-{}", start, end)
    }
}

impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compact())
    }
}

impl std::str::FromStr for LevelSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_levels(s))
    }
}

impl FromIterator<u32> for LevelSpec {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut spec = LevelSpec::new();
        for level in iter {
            spec.insert(level);
        }
        spec
    }
}

impl<'de> Deserialize<'de> for LevelSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<u32>::deserialize(deserializer).map(|levels| levels.into_iter().collect())
    }
}

impl IntoIterator for LevelSpec {
    type Item = u32;
    type IntoIter = std::collections::btree_set::IntoIter<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a LevelSpec {
    type Item = u32;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, u32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// Parse a level specification
///
/// Tokens are separated by commas. A token is either a single level (`"5"`)
/// or an inclusive range (`"5-7"`). A token whose number(s) fail to parse is
/// discarded on its own. A reversed range (`"9-4"`) expands to nothing.
/// Level 0 is dropped.
///
/// # Examples
///
/// ```
/// use sentence_harvest::levels::parse_levels;
///
/// let spec = parse_levels("4,5-7,9-12,15");
/// assert_eq!(spec.to_vec(), vec![4, 5, 6, 7, 9, 10, 11, 12, 15]);
///
/// assert!(parse_levels("abc").is_empty());
/// assert_eq!(parse_levels("3,abc,5").to_vec(), vec![3, 5]);
/// ```
pub fn parse_levels(input: &str) -> LevelSpec {
    let mut spec = LevelSpec::new();

    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('-') {
            Some((start, end)) => {
                let (Ok(start), Ok(end)) = (start.trim().parse::<u32>(), end.trim().parse::<u32>())
                else {
                    debug!(token, "discarding malformed level range");
                    continue;
                };
                if start > end {
                    debug!(token, "reversed level range expands to nothing");
                    continue;
                }
                for level in start..=end {
                    spec.insert(level);
                }
            }
            None => match token.parse::<u32>() {
                Ok(level) => spec.insert(level),
                Err(_) => debug!(token, "discarding malformed level"),
            },
        }
    }

    spec
}
