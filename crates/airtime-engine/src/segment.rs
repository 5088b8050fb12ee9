//! Title and description segmentation over block text.
//!
//! Schedule markup flattens to one concatenated blob per item: time range,
//! badges, title, and description run together, often with the whitespace
//! between them lost. This module cleans that blob (range and badge
//! stripping, concatenation repair) and splits what remains into a title and
//! a description using a ranked set of boundary rules. The rules are
//! best-effort pattern matching over natural language — some irreducible
//! error rate is accepted, and either output may be absent.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::range::{is_bare_time_text, TimeSlot, GENERIC_RANGE, LIVE_PREFIX};

/// Words that end a title where they appear (the title keeps them).
const CLOSING_WORDS: &[&str] = &["Show", "List", "Hits", "Radio", "Music"];

/// Phrases that open a description (the title stops before them).
const OPENING_PHRASES: &[&str] = &[
    "your favorite",
    "all the",
    "the best",
    "the biggest",
    "hosted by",
    "featuring",
    "back to back",
    "music from",
];

/// Cap on the fallback leading-capitalized-run title.
const TITLE_RUN_CAP: usize = 6;

lazy_static! {
    static ref CLOSING_GLUE: Regex =
        Regex::new(r"(Show|List|Hits|Radio|Music)([A-Z])").unwrap();
}

/// Title/description pair for one block; either side may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmented {
    pub title: Option<String>,
    pub description: Option<String>,
}

// ── Cleaning ────────────────────────────────────────────────────────────────

/// Prepare raw block text for segmentation: strip the `LIVE` badge, strip the
/// leading time range (the resolved slot's exact text plus a generic sweep
/// for variants it missed), collapse an immediately-repeated range, and undo
/// markup-driven word concatenation.
pub fn clean_block_text(text: &str, slot: Option<&TimeSlot>) -> String {
    let unbadged = LIVE_PREFIX.replace(text, "");
    let mut t: &str = unbadged.trim_start();

    if let Some(slot) = slot {
        let m = slot.matched_text();
        if !m.is_empty() {
            while let Some(rest) = t.strip_prefix(m) {
                t = rest.trim_start();
            }
        }
    }

    let mut s = t.to_string();
    loop {
        match GENERIC_RANGE.find(&s) {
            Some(m) if m.start() == 0 => s = s[m.end()..].trim_start().to_string(),
            _ => break,
        }
    }

    s = collapse_repeated_range(&s);
    s = CLOSING_GLUE.replace_all(&s, "${1} ${2}").into_owned();
    s = split_glued_words(&s);
    s.trim().to_string()
}

/// Collapse `"7 – 9 PM7 – 9 PM"` style duplication down to one occurrence.
fn collapse_repeated_range(s: &str) -> String {
    for m in GENERIC_RANGE.find_iter(s) {
        let after = &s[m.end()..];
        let trimmed = after.trim_start();
        if trimmed.starts_with(m.as_str()) {
            let dup_start = m.end() + (after.len() - trimmed.len());
            let mut out = String::with_capacity(s.len());
            out.push_str(&s[..dup_start]);
            out.push_str(&trimmed[m.as_str().len()..]);
            return out;
        }
    }
    s.to_string()
}

/// Insert a space between a lowercase letter and a following uppercase one.
fn split_glued_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut prev: Option<char> = None;
    for ch in s.chars() {
        if let Some(p) = prev {
            if p.is_lowercase() && ch.is_uppercase() {
                out.push(' ');
            }
        }
        out.push(ch);
        prev = Some(ch);
    }
    out
}

// ── Segmentation ────────────────────────────────────────────────────────────

/// Split cleaned block text into a title and a description.
///
/// Structural hints from the caller's markup traversal take precedence over
/// the text heuristics: a likely-title hint wins unless it is a bare time
/// string, and a likely-description hint wins unless it merely echoes the
/// title. Without hints the title is found by a left-to-right boundary scan,
/// falling back to a short leading run of capitalized words, and the
/// description is whatever text remains past the title.
pub fn segment(
    clean: &str,
    title_hint: Option<&str>,
    description_hint: Option<&str>,
) -> Segmented {
    let words: Vec<&str> = clean.split_whitespace().collect();

    let hinted_title = title_hint
        .map(str::trim)
        .filter(|h| !h.is_empty() && !is_bare_time_text(h));

    let (title, rest_idx) = match hinted_title {
        Some(h) => (Some(h.to_string()), skip_title_words(&words, h)),
        None => match scan_title(&words) {
            Some((t, i)) => {
                debug!(rule = "boundary-scan", title = t.as_str(), "title selected");
                (Some(t), i)
            }
            None => match leading_caps_run(&words) {
                Some((t, i)) => {
                    debug!(rule = "caps-run", title = t.as_str(), "title selected");
                    (Some(t), i)
                }
                None => (None, 0),
            },
        },
    };

    let remainder = words[rest_idx.min(words.len())..].join(" ");

    let hinted_desc = description_hint
        .map(str::trim)
        .filter(|h| !h.is_empty() && !is_bare_time_text(h))
        .filter(|h| match title.as_deref() {
            Some(t) => !is_title_echo(h, t),
            None => true,
        });

    let description_raw = match hinted_desc {
        Some(h) => h.to_string(),
        None => remainder,
    };

    let description = match title.as_deref() {
        Some(t) => strip_title_echo(&description_raw, t),
        None => description_raw.trim().to_string(),
    };

    Segmented {
        title,
        description: (!description.is_empty()).then_some(description),
    }
}

/// Scan for the first title boundary: the literal word `Show` (kept in the
/// title), another closing word (also kept), a lowercase-starting word, or a
/// description-opening phrase. Weaker boundaries are suppressed while `Show`
/// is within the next three tokens, so `Show` wins when both are near.
fn scan_title(words: &[&str]) -> Option<(String, usize)> {
    for i in 0..words.len() {
        let w = words[i];
        if is_show(w) {
            return Some((words[..=i].join(" "), i + 1));
        }
        let show_near = words[i + 1..].iter().take(3).any(|t| is_show(t));
        if show_near {
            continue;
        }
        if is_closing(w) {
            return Some((words[..=i].join(" "), i + 1));
        }
        if starts_lowercase(w) || opening_phrase_at(words, i) {
            if i == 0 {
                return None;
            }
            return Some((words[..i].join(" "), i));
        }
    }
    None
}

/// Fallback title: the leading run of capitalized words, capped short.
fn leading_caps_run(words: &[&str]) -> Option<(String, usize)> {
    let mut n = 0;
    while n < words.len() && n < TITLE_RUN_CAP && starts_uppercase(words[n]) {
        n += 1;
    }
    (n > 0).then(|| (words[..n].join(" "), n))
}

fn trim_word(w: &str) -> &str {
    w.trim_matches(|c: char| !c.is_alphanumeric())
}

fn is_show(w: &str) -> bool {
    trim_word(w) == "Show"
}

fn is_closing(w: &str) -> bool {
    CLOSING_WORDS.contains(&trim_word(w))
}

fn starts_lowercase(w: &str) -> bool {
    w.chars().next().is_some_and(|c| c.is_lowercase())
}

fn starts_uppercase(w: &str) -> bool {
    w.chars().next().is_some_and(|c| c.is_uppercase())
}

fn opening_phrase_at(words: &[&str], i: usize) -> bool {
    OPENING_PHRASES.iter().any(|p| {
        let n = p.split_whitespace().count();
        i + n <= words.len() && words[i..i + n].join(" ").to_lowercase() == *p
    })
}

/// How many leading words of the text are exactly the title, so the
/// remainder can serve as a description fallback.
fn skip_title_words(words: &[&str], title: &str) -> usize {
    let tw: Vec<&str> = title.split_whitespace().collect();
    if tw.is_empty() || words.len() < tw.len() {
        return 0;
    }
    if words[..tw.len()].iter().zip(&tw).all(|(a, b)| a == b) {
        tw.len()
    } else {
        0
    }
}

/// Whether a candidate is the title, or the title repeated back to back.
fn is_title_echo(candidate: &str, title: &str) -> bool {
    let c = candidate.trim();
    if c == title {
        return true;
    }
    match c.strip_prefix(title) {
        Some(rest) => rest.trim_start() == title,
        None => false,
    }
}

/// Strip an exact or doubled leading occurrence of the title from the
/// description, including the glued title-then-capital-letter form.
fn strip_title_echo(description: &str, title: &str) -> String {
    let mut d = description.trim();
    if title.is_empty() {
        return d.to_string();
    }

    for _ in 0..2 {
        let Some(rest) = d.strip_prefix(title) else {
            break;
        };
        if rest.is_empty() {
            d = rest;
            break;
        }
        let spaced = rest.trim_start();
        if spaced.len() < rest.len() {
            d = spaced;
            continue;
        }
        if rest.chars().next().is_some_and(|c| c.is_uppercase()) {
            d = rest;
            continue;
        }
        // A lowercase continuation means the title is a prefix of a longer
        // word; leave it alone.
        break;
    }
    d.trim().to_string()
}

// ── Tests ───────────────────────────────────────────────────────────────────
