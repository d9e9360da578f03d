//! Row conversion engine
//!
//! Walks one adjacency row (`source, edge, target, edge, target, ...`) and
//! emits its triples in order:
//!
//! - `start -> is -> <cell 0>` opens the row (when sentinels are on)
//! - every non-empty `(edge, target)` hop expands into the cartesian product
//!   of its source and target atoms
//! - the first hop with an empty edge or target ends the row with
//!   `<current source> -> is -> end`, even when that source is empty; a row
//!   that runs out of hops ends with its last target if it holds anything
//!
//! In EPA style, targets are filtered through a [`NodeFilter`]. A hop whose
//! targets are all filtered away emits nothing, and the following hops start
//! from the last unfiltered source (the *carried* source) with non-outcome
//! edges relabelled to `connectedTo`.

use crate::core::epa_filter::NodeFilter;
use crate::core::expand::{expand_pair, retain_atoms};
use crate::error::{GraphError, GraphResult};
use crate::types::{
    is_outcome_edge, ConversionMode, ConversionOptions, Triple, CONNECTED_TO, END_NODE,
    SENTINEL_EDGE, START_NODE,
};
use std::borrow::Cow;
use tracing::debug;

/// One `(edge, target)` column pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop<'a> {
    pub edge: &'a str,
    pub target: &'a str,
}

impl Hop<'_> {
    pub fn is_empty(&self) -> bool {
        self.edge.is_empty() || self.target.is_empty()
    }
}

/// A row split into its first source and the ordered hops after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow<'a> {
    pub first: &'a str,
    pub hops: Vec<Hop<'a>>,
}

impl<'a> ParsedRow<'a> {
    /// Pair up the cells after cell 0. A trailing edge without a target
    /// cell reads as an empty target.
    pub fn parse(cells: &'a [String]) -> Self {
        let first = cells.first().map(String::as_str).unwrap_or("");
        let hops = cells
            .get(1..)
            .unwrap_or(&[])
            .chunks(2)
            .map(|pair| Hop {
                edge: pair[0].as_str(),
                target: pair.get(1).map(String::as_str).unwrap_or(""),
            })
            .collect();
        Self { first, hops }
    }

    /// True when no cell of the row holds anything
    pub fn is_blank(&self) -> bool {
        self.first.is_empty()
            && self
                .hops
                .iter()
                .all(|hop| hop.edge.is_empty() && hop.target.is_empty())
    }
}

/// Numbers triples of one row as they are emitted
struct RowEmitter<'l> {
    row_number: u32,
    rater_label: &'l str,
    next_step: u32,
    triples: Vec<Triple>,
}

impl<'l> RowEmitter<'l> {
    fn new(row_number: u32, rater_label: &'l str) -> Self {
        Self {
            row_number,
            rater_label,
            next_step: 1,
            triples: Vec::new(),
        }
    }

    fn emit(&mut self, source_cell: &str, edge: &str, target_cell: &str) {
        for (source, edge, target) in expand_pair(source_cell, target_cell, edge) {
            self.triples.push(Triple {
                source: source.to_string(),
                edge: edge.to_string(),
                target: target.to_string(),
                row_number: self.row_number,
                sequence_number: self.next_step,
                rater_label: self.rater_label.to_string(),
            });
            self.next_step += 1;
        }
    }

    fn finish(self) -> Vec<Triple> {
        self.triples
    }
}

/// Converts rows to triples under a fixed set of [`ConversionOptions`]
#[derive(Clone, Copy)]
pub struct RowConverter<'f> {
    options: ConversionOptions,
    filter: Option<&'f dyn NodeFilter>,
}

impl<'f> RowConverter<'f> {
    /// Create a converter. Options that filter nodes require a filter.
    pub fn new(
        options: ConversionOptions,
        filter: Option<&'f dyn NodeFilter>,
    ) -> GraphResult<Self> {
        if options.epa_filter && filter.is_none() {
            return Err(GraphError::Config(
                "EPA filtering needs a node reference table".to_string(),
            ));
        }
        Ok(Self { options, filter })
    }

    pub fn for_mode(mode: ConversionMode, filter: Option<&'f dyn NodeFilter>) -> GraphResult<Self> {
        Self::new(mode.options(), filter)
    }

    pub fn options(&self) -> ConversionOptions {
        self.options
    }

    /// Convert one (already normalized) row
    pub fn convert_row(&self, cells: &[String], row_number: u32, rater_label: &str) -> Vec<Triple> {
        let row = ParsedRow::parse(cells);
        if row.is_blank() {
            debug!(row_number, "skipping blank row");
            return Vec::new();
        }

        let mut out = RowEmitter::new(row_number, rater_label);
        if self.options.sentinels {
            out.emit(START_NODE, SENTINEL_EDGE, row.first);
        }

        // `anchor` is the cell the next hop would normally start from.
        // `carried` is set while targets are being filtered away.
        let mut anchor: Cow<'_, str> = Cow::Borrowed(row.first);
        let mut carried: Option<Cow<'_, str>> = None;

        for hop in &row.hops {
            let source = carried.clone().unwrap_or_else(|| anchor.clone());
            let edge = if carried.is_some()
                && self.options.relabel_carried
                && !is_outcome_edge(hop.edge)
            {
                CONNECTED_TO
            } else {
                hop.edge
            };

            // Relabelling happens first, so a carried hop with an empty edge
            // cell continues as long as its target holds something.
            let hop = Hop { edge, target: hop.target };
            if hop.is_empty() {
                self.close(&mut out, &source);
                return out.finish();
            }

            let target = self.filter_target(edge, hop.target);
            if target.is_empty() {
                debug!(row_number, source = %source, dropped = hop.target, "all targets filtered");
                if carried.is_none() {
                    carried = Some(source);
                }
            } else {
                out.emit(&source, edge, &target);
                carried = None;
            }
            anchor = target;
        }

        // Ran out of hops. A carried source always closes the row, the final
        // cell only when it holds something.
        match carried {
            Some(source) => self.close(&mut out, &source),
            None if !anchor.is_empty() => self.close(&mut out, &anchor),
            None => {}
        }
        out.finish()
    }

    /// Apply the EPA filter to a target cell. Outcome edges bypass it.
    fn filter_target<'c>(&self, edge: &str, target: &'c str) -> Cow<'c, str> {
        if !self.options.epa_filter || is_outcome_edge(edge) {
            return Cow::Borrowed(target);
        }
        match self.filter {
            Some(filter) => Cow::Owned(retain_atoms(target, |atom| filter.is_of_interest(atom))),
            None => Cow::Borrowed(target),
        }
    }

    fn close(&self, out: &mut RowEmitter<'_>, source: &str) {
        if self.options.sentinels {
            out.emit(source, SENTINEL_EDGE, END_NODE);
        }
    }
}
