// src/specs/rollcall.rs
//! Roll-call fragment → attendance records.
//!
//! The fragment has no per-record delimiters. Its content alternates between
//! an identity entry and an emphasized vote position:
//!
//! ```text
//! Smith (R-TX), <b>Yea</b><br>Jones (D-CA), <b>Nay</b><br>…
//! ```
//!
//! [`entries`] splits the markup into plain-text and emphasized entries
//! (`<br>` and wrapper tags only separate). [`parse`] pairs each text entry
//! with the emphasized entry after it; the text must match `Name (P-ST)`.
//! Parity is checked before pairing. A bad pair is skipped with a warning, and
//! an identity with no position is skipped alone so pairing resumes on the
//! next identity.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::{html, sanitize};
use crate::members::MemberRegistry;
use crate::types::AttendanceRecord;

static IDENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z ]+?)\s*\(([A-Za-z]{1,2})-(\w+)\)").expect("identity pattern")
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Text(String),
    Emphasis(String),
}

impl Entry {
    fn text(&self) -> &str {
        match self { Entry::Text(t) | Entry::Emphasis(t) => t.as_str() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RollCallWarning {
    #[error("vote {vote}: empty roll-call fragment")]
    Empty { vote: String },

    #[error("vote {vote}: fragment has an odd number of entries ({entries})")]
    ParityAnomaly { vote: String, entries: usize },

    #[error("vote {vote}: pair {pair}: identity not recognized in {text:?}")]
    UnmatchedIdentity { vote: String, pair: usize, text: String },

    #[error("vote {vote}: pair {pair}: expected an emphasized vote position, found {found:?}")]
    MissingPosition { vote: String, pair: usize, found: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Attendance rows appended to the sink.
    pub appended: usize,
    /// Members first seen in this fragment.
    pub new_members: usize,
    pub warnings: Vec<RollCallWarning>,
}

/// Split a fragment into text runs and emphasized (`<b>`, `<strong>`) blocks.
/// Blank text between tags is dropped; an emphasized block is kept even if empty.
pub fn entries(fragment: &str) -> Vec<Entry> {
    let lc = html::to_lower(fragment);
    let mut out = Vec::new();
    let mut text = s!();
    let mut pos = 0usize;

    let flush = |text: &mut String, out: &mut Vec<Entry>| {
        let t = sanitize::normalize_ws(&sanitize::normalize_entities(text));
        if !t.is_empty() {
            out.push(Entry::Text(t));
        }
        text.clear();
    };

    while pos < fragment.len() {
        let Some(lt) = fragment[pos..].find('<').map(|i| i + pos) else {
            text.push_str(&fragment[pos..]);
            break;
        };
        text.push_str(&fragment[pos..lt]);

        let Some(gt) = fragment[lt..].find('>').map(|i| i + lt) else {
            // unterminated tag: nothing useful left
            break;
        };
        let (is_close, name) = html::tag_name(&fragment[lt + 1..gt]);
        pos = gt + 1;

        flush(&mut text, &mut out);

        if !is_close && (name == "b" || name == "strong") {
            let close = format!("</{name}>");
            let (inner_end, next) = match lc[pos..].find(&close) {
                Some(rel) => (pos + rel, pos + rel + close.len()),
                None => (fragment.len(), fragment.len()),
            };
            out.push(Entry::Emphasis(html::strip_tags(&fragment[pos..inner_end])));
            pos = next;
        }
    }
    flush(&mut text, &mut out);
    out
}

/// Parse `fragment` for `vote_number`, registering members and appending one
/// record per well-formed pair to `sink`.
pub fn parse(
    fragment: &str,
    vote_number: &str,
    registry: &mut MemberRegistry,
    sink: &mut Vec<AttendanceRecord>,
) -> ParseReport {
    let entries = entries(fragment);
    let mut report = ParseReport::default();

    if entries.is_empty() {
        report.warnings.push(RollCallWarning::Empty { vote: s!(vote_number) });
    }

    let odd = entries.len() % 2 == 1;
    if odd {
        report.warnings.push(RollCallWarning::ParityAnomaly {
            vote: s!(vote_number),
            entries: entries.len(),
        });
    }

    let mut pair = 0usize;
    let mut i = 0usize;
    while i < entries.len() {
        let Entry::Text(identity) = &entries[i] else {
            // stray position with no identity in front of it
            report.warnings.push(RollCallWarning::UnmatchedIdentity {
                vote: s!(vote_number), pair, text: s!(entries[i].text()),
            });
            pair += 1;
            i += 1;
            continue;
        };

        let position = match entries.get(i + 1) {
            Some(Entry::Emphasis(p)) => {
                i += 2;
                p
            }
            // next identity follows directly; resync on it
            Some(next @ Entry::Text(_)) => {
                report.warnings.push(RollCallWarning::MissingPosition {
                    vote: s!(vote_number), pair, found: s!(next.text()),
                });
                pair += 1;
                i += 1;
                continue;
            }
            None => {
                if !odd {
                    report.warnings.push(RollCallWarning::MissingPosition {
                        vote: s!(vote_number), pair, found: s!(),
                    });
                }
                break;
            }
        };
        let this = pair;
        pair += 1;

        let Some(c) = IDENTITY.captures(identity) else {
            report.warnings.push(RollCallWarning::UnmatchedIdentity {
                vote: s!(vote_number), pair: this, text: identity.clone(),
            });
            continue;
        };
        if position.is_empty() {
            report.warnings.push(RollCallWarning::MissingPosition {
                vote: s!(vote_number), pair: this, found: s!(),
            });
            continue;
        }

        let before = registry.len();
        let member_id = registry.resolve_or_insert(c[1].trim(), &c[2], &c[3]);
        if registry.len() > before {
            report.new_members += 1;
        }
        sink.push(AttendanceRecord { vote_number: s!(vote_number), member_id, position: position.clone() });
        report.appended += 1;
    }

    for w in &report.warnings {
        tracing::warn!("{w}");
    }
    report
}
