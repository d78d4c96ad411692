// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gap selection — group blank rows into runs and pick a cut point.

/// A maximal run of blank rows, relative to the start of its scan window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub start: u32,
    /// Exclusive.
    pub end: u32,
    pub size: u32,
}

impl Gap {
    fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end,
            size: end - start,
        }
    }

    /// Row in the middle of the gap (rounded towards the top).
    fn midpoint(&self) -> u32 {
        self.start + self.size / 2
    }
}

/// Collect every contiguous run of `true` rows, top to bottom.
pub fn find_gaps(rows: &[bool]) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let mut run_start: Option<u32> = None;

    for (y, &blank) in rows.iter().enumerate() {
        let y = y as u32;
        match (blank, run_start) {
            (true, None) => run_start = Some(y),
            (false, Some(start)) => {
                gaps.push(Gap::new(start, y));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        gaps.push(Gap::new(start, rows.len() as u32));
    }

    gaps
}

/// Pick the gap to cut in.
///
/// Gaps taller than `large_gap_min` are preferred. Within the chosen pool the
/// tallest gap wins, and on equal size the later (lower) gap wins.
pub fn select_gap(gaps: &[Gap], large_gap_min: u32) -> Option<Gap> {
    let large = latest_largest(gaps.iter().filter(|gap| gap.size > large_gap_min));
    large.or_else(|| latest_largest(gaps.iter())).copied()
}

fn latest_largest<'a>(gaps: impl Iterator<Item = &'a Gap>) -> Option<&'a Gap> {
    gaps.reduce(|best, candidate| if candidate.size >= best.size { candidate } else { best })
}

/// Absolute cut row for a scanned window.
///
/// `window_offset` is the absolute row of `rows[0]`. With no blank rows at all
/// the naive `boundary` is returned unchanged (a hard cut).
pub fn choose_cut(rows: &[bool], window_offset: u32, boundary: u32, large_gap_min: u32) -> u32 {
    let gaps = find_gaps(rows);
    match select_gap(&gaps, large_gap_min) {
        Some(gap) => window_offset + gap.midpoint(),
        None => boundary,
    }
}
