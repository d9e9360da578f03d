//! Cell normalizer: strips characters that must never reach a node or edge name

use crate::types::RaterTable;

/// Characters removed from every cell before conversion
const STRIPPED: [char; 3] = [' ', ',', ':'];

/// Return `cell` without spaces, commas and colons
pub fn normalize_cell(cell: &str) -> String {
    cell.chars().filter(|c| !STRIPPED.contains(c)).collect()
}

/// Normalize every cell of a table in place
pub fn normalize_table(table: &mut RaterTable) {
    for row in &mut table.rows {
        for cell in row.iter_mut() {
            if cell.contains(&STRIPPED[..]) {
                *cell = normalize_cell(cell);
            }
        }
    }
}
