//! Union equivalence sets.
//!
//! When a property that only some branches of a `oneOf` require is missing,
//! the reported property may be any property required by another branch.
//! Such properties form one equivalence set; callers that compare reported
//! property names must accept any member of the set.

use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivalenceTable {
    sets: Vec<BTreeSet<String>>,
}

impl EquivalenceTable {
    /// Derive the sets from every union reachable through `properties` and `allOf`.
    pub fn from_schema(schema: &Value) -> Self {
        let mut table = Self::default();
        table.collect(schema, "");
        table
    }

    /// Add externally configured sets, merging any that overlap.
    pub fn extend<I, S>(&mut self, sets: I)
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = String>,
    {
        for set in sets {
            self.insert(set.into_iter().collect());
        }
    }

    fn insert(&mut self, set: BTreeSet<String>) {
        if set.len() < 2 {
            return;
        }
        let (overlapping, mut rest): (Vec<_>, Vec<_>) =
            self.sets.drain(..).partition(|s| !s.is_disjoint(&set));
        let merged = overlapping.into_iter().fold(set, |mut acc, s| {
            acc.extend(s);
            acc
        });
        rest.push(merged);
        self.sets = rest;
    }

    pub fn sets(&self) -> &[BTreeSet<String>] {
        &self.sets
    }

    /// Every property name that may be reported in place of `property`,
    /// `property` itself included.
    pub fn equivalents(&self, property: &str) -> BTreeSet<String> {
        self.sets
            .iter()
            .find(|s| s.contains(property))
            .cloned()
            .unwrap_or_else(|| BTreeSet::from([property.to_string()]))
    }

    pub fn is_equivalent(&self, expected: &str, reported: &str) -> bool {
        expected == reported || self.equivalents(expected).contains(reported)
    }

    fn collect(&mut self, schema: &Value, location: &str) {
        let Some(map) = schema.as_object() else {
            return;
        };

        if let Some(props) = map.get("properties").and_then(Value::as_object) {
            for (name, child) in props {
                self.collect(child, &format!("{}/{}", location, name));
            }
        }
        if let Some(members) = map.get("allOf").and_then(Value::as_array) {
            for member in members {
                self.collect(member, location);
            }
        }

        for keyword in ["oneOf", "anyOf"] {
            let Some(branches) = map.get(keyword).and_then(Value::as_array) else {
                continue;
            };
            let required: Vec<BTreeSet<String>> = branches
                .iter()
                .map(|b| branch_required(b, location))
                .collect();

            // properties required by every branch are reported deterministically
            let all: BTreeSet<String> = required.iter().flatten().cloned().collect();
            let common = required
                .iter()
                .skip(1)
                .fold(required.first().cloned().unwrap_or_default(), |acc, s| {
                    acc.intersection(s).cloned().collect()
                });
            self.insert(all.difference(&common).cloned().collect());

            for branch in branches {
                self.collect(branch, location);
            }
        }
    }
}

fn branch_required(branch: &Value, location: &str) -> BTreeSet<String> {
    let mut out: BTreeSet<String> = branch
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(|name| format!("{}/{}", location, name))
        .collect();
    if let Some(members) = branch.get("allOf").and_then(Value::as_array) {
        for member in members {
            out.extend(branch_required(member, location));
        }
    }
    out
}
