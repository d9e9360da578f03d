//! Multi-value expansion of `;`-joined cells

use crate::types::MULTI_VALUE_SEPARATOR;

/// Split a cell into its atomic values.
///
/// A cell without `;` yields itself; an empty cell yields one empty string,
/// so callers check emptiness before expanding.
pub fn split(cell: &str) -> Vec<&str> {
    cell.split(MULTI_VALUE_SEPARATOR).collect()
}

/// Cartesian product of source and target atoms around a single edge.
///
/// Source atoms form the outer loop and target atoms the inner loop; this
/// order decides the step numbers of multi-valued cells.
pub fn expand_pair<'a>(
    source_cell: &'a str,
    target_cell: &'a str,
    edge: &'a str,
) -> Vec<(&'a str, &'a str, &'a str)> {
    let targets = split(target_cell);
    split(source_cell)
        .into_iter()
        .flat_map(|source| targets.iter().map(move |target| (source, edge, *target)))
        .collect()
}

/// Keep the atoms of `cell` accepted by `keep`, rejoined with `;`
pub fn retain_atoms<F>(cell: &str, mut keep: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let separator = MULTI_VALUE_SEPARATOR.to_string();
    split(cell)
        .into_iter()
        .filter(|atom| keep(*atom))
        .collect::<Vec<_>>()
        .join(separator.as_str())
}
