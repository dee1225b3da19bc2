use crate::schema::{AliasTable, Cell, RowSet};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

static NON_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9a-zA-Z_ ]").unwrap());

/// Normalizes a human-entered column label for comparison: lowercased,
/// stripped of everything outside `[0-9a-zA-Z_ ]`, spaces converted to
/// underscores. A label that strips down to nothing maps to the reserved
/// placeholder `"col"` rather than colliding with another empty-named column.
pub fn clean_column_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let stripped = NON_IDENTIFIER.replace_all(&lowered, "");
    let cleaned = stripped.replace(' ', "_");

    if cleaned.is_empty() {
        "col".to_string()
    } else {
        cleaned
    }
}

fn clean_all(raw_columns: &[String]) -> Vec<String> {
    raw_columns.iter().map(|c| clean_column_name(c)).collect()
}

/// Bindings from canonical field names to raw column positions, plus the set
/// of raw columns those bindings consumed. Unclaimed columns pass through
/// untouched; downstream code simply ignores them.
#[derive(Debug, Clone, Default)]
pub struct RenameMap {
    bindings: BTreeMap<&'static str, usize>,
    claimed: BTreeSet<usize>,
}

impl RenameMap {
    pub fn get(&self, canonical: &str) -> Option<usize> {
        self.bindings.get(canonical).copied()
    }

    pub fn is_claimed(&self, idx: usize) -> bool {
        self.claimed.contains(&idx)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.bindings.iter().map(|(name, idx)| (*name, *idx))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Binds canonical names to raw columns using first-match-wins precedence.
///
/// For each canonical name in declaration order, the alias list is scanned in
/// declared order and the canonical name is bound to the first raw column
/// whose cleaned label equals the alias and which no earlier binding claimed.
/// A bound canonical name is never rebound. Because every alias list declares
/// the canonical name itself first, an already-canonical column set
/// reconciles to the identity mapping.
pub fn reconcile(raw_columns: &[String], table: AliasTable) -> RenameMap {
    reconcile_cleaned(&clean_all(raw_columns), table)
}

fn reconcile_cleaned(cleaned: &[String], table: AliasTable) -> RenameMap {
    let mut map = RenameMap::default();

    for (canonical, aliases) in table {
        if map.bindings.contains_key(*canonical) {
            continue;
        }

        'aliases: for alias in *aliases {
            for (idx, name) in cleaned.iter().enumerate() {
                if name == alias && !map.claimed.contains(&idx) {
                    map.bindings.insert(*canonical, idx);
                    map.claimed.insert(idx);
                    break 'aliases;
                }
            }
        }
    }

    map
}

/// A row-set viewed through a resolved [`RenameMap`]: the first phase of the
/// pipeline resolves names once, and everything after it operates on the
/// closed canonical vocabulary.
pub struct ReconciledSheet<'a> {
    rows: &'a RowSet,
    cleaned: Vec<String>,
    map: RenameMap,
}

impl<'a> ReconciledSheet<'a> {
    pub fn new(rows: &'a RowSet, table: AliasTable) -> Self {
        let cleaned = clean_all(rows.columns());
        let map = reconcile_cleaned(&cleaned, table);
        Self { rows, cleaned, map }
    }

    /// Position of the raw column bound to a canonical name, if any.
    pub fn canonical_column(&self, canonical: &str) -> Option<usize> {
        self.map.get(canonical)
    }

    /// Position of a raw column that reconciliation left unbound, looked up
    /// by cleaned label. Used for fallback chains over pass-through columns.
    pub fn unbound_column(&self, clean_name: &str) -> Option<usize> {
        self.cleaned
            .iter()
            .enumerate()
            .find(|(idx, name)| name.as_str() == clean_name && !self.map.is_claimed(*idx))
            .map(|(idx, _)| idx)
    }

    pub fn cell(&self, row: usize, col: usize) -> &'a Cell {
        self.rows.cell(row, col)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rename_map(&self) -> &RenameMap {
        &self.map
    }

    /// The non-identity bindings as (raw label, canonical name) pairs, for
    /// diagnostic reports.
    pub fn mapped_columns(&self) -> Vec<(String, String)> {
        self.map
            .bindings()
            .filter(|(canonical, idx)| self.cleaned[*idx] != *canonical)
            .map(|(canonical, idx)| (self.rows.columns()[idx].clone(), canonical.to_string()))
            .collect()
    }
}
