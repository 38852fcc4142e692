//! Interval masking
//!
//! Decides which candidate spans touch a protected region (a fenced block or an
//! inline code span) so that text substitutions never reach into code.
//!
//! Boundaries are byte offsets into the scanned string, inclusive on both ends:
//! a candidate whose last byte is a region's first byte overlaps it.
//!
//! The scan pairs every candidate with every protected region. Inputs are a
//! handful of links against a handful of code spans per note field, so there is
//! no interval tree.

/// A candidate span whose bounds can be invalidated.
///
/// A `None` bound has been masked and stays masked for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both bounds survived masking.
    pub fn is_intact(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// A protected region. `end == None` is an open region (an unterminated
/// fence) that extends to the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protected {
    pub start: usize,
    pub end: Option<usize>,
}

impl Protected {
    pub fn closed(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn open(start: usize) -> Self {
        Self { start, end: None }
    }
}

/// Invalidate the bounds of every candidate that falls inside a protected region.
///
/// - a start inside a closed region masks the start
/// - an end inside a closed region masks the end
/// - a candidate fully inside a closed region loses both bounds
/// - an open region only masks the end of a candidate that begins before the
///   region and reaches into it; candidates after the region start are left alone
///
/// Every check uses the candidate's bounds as they were on entry, so the order of
/// `protected` never changes the outcome.
pub fn mask_spans(candidates: &mut [Span], protected: &[Protected]) {
    for candidate in candidates.iter_mut() {
        let (start, end) = (candidate.start, candidate.end);
        let mut mask_start = false;
        let mut mask_end = false;

        for region in protected {
            match region.end {
                Some(region_end) => {
                    let contains = |pos: usize| region.start <= pos && pos <= region_end;
                    mask_start |= start.is_some_and(contains);
                    mask_end |= end.is_some_and(contains);
                }
                None => {
                    if let (Some(start), Some(end)) = (start, end) {
                        mask_end |= start < region.start && region.start <= end;
                    }
                }
            }
        }

        if mask_start {
            candidate.start = None;
        }
        if mask_end {
            candidate.end = None;
        }
    }
}
