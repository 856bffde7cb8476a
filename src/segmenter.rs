//! Clause segmentation.
//!
//! The text is split on blank lines, then before every line that opens with a
//! heading marker, then into sentences. A marker stays on the first sentence
//! of its section. Splitting never depends on what follows, so appending text
//! leaves the clauses before it unchanged.
//!
//! Markers are only recorded as clause headings when at least two lines open
//! with one; a lone `Section 1` is treated as ordinary text.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{AnalysisError, Clause, ListMarker, ListMarkerResolver, MarkerMatch, SentenceBoundaryResolver};

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

/// Splits contract text into an ordered sequence of clauses.
#[derive(Default)]
pub struct ClauseSegmenter {
    markers: ListMarkerResolver,
    sentences: SentenceBoundaryResolver,
}

impl ClauseSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment `text`. Blank or whitespace-only input is
    /// [`AnalysisError::EmptyDocument`].
    pub fn segment(&self, text: &str) -> Result<Vec<Clause>, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }

        let headings = self.heading_starts(text);
        let heading_mode = headings.len() >= 2;
        tracing::debug!(headings = headings.len(), heading_mode, "segmenting document");

        let mut pieces: Vec<(Range<usize>, Option<ListMarker>)> = Vec::new();
        for para in paragraphs(text, 0..text.len()) {
            for (section, marker) in sections(para, &headings) {
                let heading = marker.filter(|_| heading_mode).map(|m| m.marker.clone());
                let body_start = marker.map_or(section.start, |m| (section.start + m.len).min(section.end));

                let mut sentences = self.split_sentences(text, body_start..section.end);
                match sentences.first_mut() {
                    Some(first) => first.start = section.start,
                    None => sentences.push(section.clone()),
                }

                for (i, range) in sentences.into_iter().enumerate() {
                    let heading = if i == 0 { heading.clone() } else { None };
                    pieces.push((range, heading));
                }
            }
        }

        let clauses: Vec<Clause> = pieces
            .into_iter()
            .filter_map(|(range, heading)| trimmed(text, range).map(|r| (r, heading)))
            .enumerate()
            .map(|(index, (range, heading))| Clause::new(index, &text[range.clone()], range.start, heading))
            .collect();

        if clauses.is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }

        tracing::debug!(clauses = clauses.len(), "segmented document");
        Ok(clauses)
    }

    /// Byte offsets of line-initial heading markers.
    fn heading_starts(&self, text: &str) -> Vec<(usize, MarkerMatch)> {
        let mut starts = Vec::new();
        let mut line_start = 0;

        for line in text.split_inclusive('\n') {
            let content = line.trim_start();
            let lead = line.len() - content.len();
            if let Some(found) = self.markers.detect(content) {
                starts.push((line_start + lead, found));
            }
            line_start += line.len();
        }

        starts
    }

    fn split_sentences(&self, text: &str, range: Range<usize>) -> Vec<Range<usize>> {
        let base = range.start;
        self.sentences
            .split(&text[range])
            .into_iter()
            .map(|r| base + r.start..base + r.end)
            .collect()
    }
}

/// Split a paragraph before every heading marker inside it. Each section is
/// paired with the marker it opens with, if any.
fn sections(
    para: Range<usize>,
    headings: &[(usize, MarkerMatch)],
) -> Vec<(Range<usize>, Option<&MarkerMatch>)> {
    let inside: Vec<&(usize, MarkerMatch)> = headings
        .iter()
        .filter(|(start, _)| para.contains(start))
        .collect();

    let mut out = Vec::new();
    let mut start = para.start;
    let mut marker = None;

    for (at, found) in inside {
        if *at > start {
            out.push((start..*at, marker));
        }
        start = *at;
        marker = Some(found);
    }
    out.push((start..para.end, marker));

    out
}

/// Blank-line delimited paragraphs within `range`.
fn paragraphs(text: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let base = range.start;
    let slice = &text[range.clone()];
    let mut out = Vec::new();
    let mut start = 0;

    for sep in BLANK_LINE.find_iter(slice) {
        out.push(base + start..base + sep.start());
        start = sep.end();
    }
    out.push(base + start..range.end);

    out
}

/// Shrink `range` to exclude surrounding whitespace; `None` if nothing is left.
fn trimmed(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    let slice = &text[range.clone()];
    let start = range.start + (slice.len() - slice.trim_start().len());
    let end = range.end - (slice.len() - slice.trim_end().len());
    (start < end).then(|| start..end)
}
