//! Content heuristic for telling generated instruction text apart from
//! typed input.
//!
//! The verdict is derived from the entry content alone: no context, no
//! timestamps, no surrounding entries. Calling the classifier twice on the
//! same string always yields the same verdict.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default maximum number of line breaks before an entry is considered
/// machine-assembled. Interactive prompts are almost always short;
/// automation templates paste multi-step instructions spanning many lines.
pub const DEFAULT_MAX_LINE_BREAKS: usize = 10;

/// Default minimum entry length for the instructional-template signal.
///
/// Shorter strings never fire the template signal, even when they contain a
/// marker phrase, so a typed command quoting a template fragment stays in
/// history.
pub const DEFAULT_TEMPLATE_MIN_LEN: usize = 40;

/// Default minimum count of numbered list markers for the enumeration
/// signal.
pub const DEFAULT_MIN_NUMBERED_MARKERS: usize = 2;

/// Marker phrases known to originate from the tool's own prompt templates.
///
/// Matching is plain substring containment against this explicit set, not
/// natural-language understanding.
pub const DEFAULT_TEMPLATE_MARKERS: &[&str] = &[
    "Generate a comprehensive",
    "Follow these steps:",
    "Use the following context",
    "You must follow this exact process",
];

/// A numbered list marker (`1.` or `1)`) at the start of a line.
static NUMBERED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(\d+)[.)]\s+").expect("numbered marker pattern compiles"));

/// Decides whether a history entry was generated by the tool itself.
///
/// Three structural signals are evaluated independently and combined with
/// logical OR; any one of them firing makes the entry system-generated:
///
/// 1. Line volume above [`DEFAULT_MAX_LINE_BREAKS`]
/// 2. A known template marker phrase in an entry of substantial length
/// 3. A sequential numbered step enumeration
///
/// The thresholds are empirically tuned and overridable per instance; the
/// defaults live in the `DEFAULT_*` constants of this module.
///
/// The classifier is pure: no state, no I/O, no failure path.
#[derive(Debug, Clone)]
pub struct Classifier {
    max_line_breaks: usize,
    template_min_len: usize,
    template_markers: Vec<String>,
    min_numbered_markers: usize,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            max_line_breaks: DEFAULT_MAX_LINE_BREAKS,
            template_min_len: DEFAULT_TEMPLATE_MIN_LEN,
            template_markers: DEFAULT_TEMPLATE_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
            min_numbered_markers: DEFAULT_MIN_NUMBERED_MARKERS,
        }
    }
}

impl Classifier {
    /// Creates a classifier with the default thresholds and marker set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the line-break count above which an entry is
    /// system-generated.
    pub fn with_max_line_breaks(mut self, max_line_breaks: usize) -> Self {
        self.max_line_breaks = max_line_breaks;
        self
    }

    /// Overrides the minimum length for the instructional-template signal.
    pub fn with_template_min_len(mut self, template_min_len: usize) -> Self {
        self.template_min_len = template_min_len;
        self
    }

    /// Replaces the template marker phrase set.
    pub fn with_template_markers(mut self, template_markers: Vec<String>) -> Self {
        self.template_markers = template_markers;
        self
    }

    /// Overrides the minimum numbered-marker count for the enumeration
    /// signal.
    pub fn with_min_numbered_markers(mut self, min_numbered_markers: usize) -> Self {
        self.min_numbered_markers = min_numbered_markers;
        self
    }

    /// Returns `true` when the entry looks like text the tool injected
    /// rather than text a human typed.
    ///
    /// Signals are a disjunction; evaluation order does not affect the
    /// verdict.
    pub fn is_system_generated(&self, entry: &str) -> bool {
        self.exceeds_line_volume(entry)
            || self.matches_template_marker(entry)
            || self.has_numbered_enumeration(entry)
    }

    /// Line-volume signal: more line breaks than an interactive prompt
    /// plausibly carries.
    fn exceeds_line_volume(&self, entry: &str) -> bool {
        entry.matches('\n').count() > self.max_line_breaks
    }

    /// Instructional-template signal: substantial length combined with a
    /// phrase from the tool's own prompt construction.
    fn matches_template_marker(&self, entry: &str) -> bool {
        entry.len() >= self.template_min_len
            && self
                .template_markers
                .iter()
                .any(|marker| entry.contains(marker.as_str()))
    }

    /// Numbered-enumeration signal: enough line-leading `N.`/`N)` markers,
    /// with at least one consecutive pair. Requiring the consecutive pair
    /// keeps entries that merely mention two unrelated numbers out of the
    /// verdict.
    fn has_numbered_enumeration(&self, entry: &str) -> bool {
        let numbers: Vec<u64> = NUMBERED_MARKER
            .captures_iter(entry)
            .filter_map(|captures| captures[1].parse().ok())
            .collect();

        numbers.len() >= self.min_numbered_markers
            && numbers.windows(2).any(|pair| pair[1] == pair[0] + 1)
    }
}
