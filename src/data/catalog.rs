use std::collections::BTreeSet;

use super::model::{RawDataset, TIME_COLUMN};

/// Union of column names across `datasets`, in first-seen order.
///
/// Names that differ only in case are listed once (first spelling wins),
/// the `asciitime` column and blank headers are left out.
pub fn variable_names(datasets: &[RawDataset]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();
    for ds in datasets {
        for name in ds.column_names() {
            let key = name.to_lowercase();
            if key == TIME_COLUMN || !seen.insert(key) {
                continue;
            }
            names.push(name);
        }
    }
    names
}

// ---------------------------------------------------------------------------
// Axis selection: which variables go on the left / right axis
// ---------------------------------------------------------------------------

/// Variables ticked for each axis. A variable may sit on both.
#[derive(Debug, Clone, Default)]
pub struct AxisSelection {
    left: BTreeSet<String>,
    right: BTreeSet<String>,
}

impl AxisSelection {
    pub fn is_left(&self, name: &str) -> bool {
        self.left.contains(name)
    }

    pub fn is_right(&self, name: &str) -> bool {
        self.right.contains(name)
    }

    pub fn set_left(&mut self, name: &str, on: bool) {
        toggle(&mut self.left, name, on);
    }

    pub fn set_right(&mut self, name: &str, on: bool) {
        toggle(&mut self.right, name, on);
    }

    /// Left-axis variables in catalogue order.
    pub fn left_variables(&self, catalog: &[String]) -> Vec<String> {
        in_catalog_order(&self.left, catalog)
    }

    /// Right-axis variables in catalogue order.
    pub fn right_variables(&self, catalog: &[String]) -> Vec<String> {
        in_catalog_order(&self.right, catalog)
    }

    /// Drop selections that are no longer in `catalog`.
    pub fn retain(&mut self, catalog: &[String]) {
        self.left.retain(|n| catalog.contains(n));
        self.right.retain(|n| catalog.contains(n));
    }

    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

fn toggle(set: &mut BTreeSet<String>, name: &str, on: bool) {
    if on {
        set.insert(name.to_string());
    } else {
        set.remove(name);
    }
}

fn in_catalog_order(selected: &BTreeSet<String>, catalog: &[String]) -> Vec<String> {
    catalog
        .iter()
        .filter(|n| selected.contains(*n))
        .cloned()
        .collect()
}
