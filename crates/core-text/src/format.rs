//! Formatting engine: run-list splitting, merging and trimming.
//!
//! Every operation takes the run list by `&mut Vec<Run>` and rebuilds it by
//! moving the untouched runs across, so runs entirely outside the affected
//! range keep their allocation. Ranges are order-independent character
//! ranges and are clamped to the paragraph length.
//!
//! Post-condition of every operation (`is_well_formed`): the list is never
//! empty and no run has empty text unless it is the sole placeholder run.
//!
//! Merging is best-effort: typed text extends a neighbouring run only when
//! its style matches (`Style::same_format`). Runs are never re-merged after a
//! later split or delete.

use crate::{Run, Style, split_at_char};
use tracing::trace;

/// Total character length of a run list.
pub fn runs_len(runs: &[Run]) -> usize {
    runs.iter().map(Run::len).sum()
}

/// Concatenated logical text.
pub fn runs_text(runs: &[Run]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// Order and clamp a raw `(a, b)` pair against `len`.
pub fn clamp_range(len: usize, a: usize, b: usize) -> (usize, usize) {
    (a.min(b).min(len), a.max(b).min(len))
}

/// True when the list satisfies the run-list invariant.
pub fn is_well_formed(runs: &[Run]) -> bool {
    match runs {
        [] => false,
        // a sole run may be the empty placeholder
        [_] => true,
        many => many.iter().all(|r| !r.is_empty()),
    }
}

fn finish(out: &mut Vec<Run>, fallback: Style) {
    out.retain(|r| !r.is_empty());
    if out.is_empty() {
        out.push(Run::placeholder(fallback));
    }
}

fn fallback_style(runs: &[Run]) -> Style {
    runs.first().map(|r| r.style.clone()).unwrap_or_default()
}

/// Apply `mutate` to the styles covering `[a, b)`.
///
/// Runs straddling a boundary are split into up to three parts and only the
/// inside part is mutated. Applying the same mutation twice yields the same
/// list as applying it once, provided `mutate` sets rather than toggles.
pub fn apply_format<F>(runs: &mut Vec<Run>, a: usize, b: usize, mutate: F)
where
    F: Fn(&mut Style),
{
    let (start, end) = clamp_range(runs_len(runs), a, b);
    if start >= end {
        return;
    }
    let fallback = fallback_style(runs);
    let old = std::mem::take(runs);
    let mut pos = 0usize;
    for mut run in old {
        let len = run.len();
        let (run_start, run_end) = (pos, pos + len);
        pos = run_end;
        if run_end <= start || run_start >= end {
            runs.push(run);
        } else if run_start >= start && run_end <= end {
            mutate(&mut run.style);
            runs.push(run);
        } else {
            let sel_start = start.saturating_sub(run_start);
            let sel_end = (end - run_start).min(len);
            let (before, rest) = split_at_char(&run.text, sel_start);
            let (inside, after) = split_at_char(rest, sel_end - sel_start);
            if !before.is_empty() {
                runs.push(run.with_text(before));
            }
            if !inside.is_empty() {
                let mut part = run.with_text(inside);
                mutate(&mut part.style);
                runs.push(part);
            }
            if !after.is_empty() {
                runs.push(run.with_text(after));
            }
        }
    }
    finish(runs, fallback);
    trace!(target: "text.format", start, end, runs = runs.len(), "apply_format");
}

/// Remove `[a, b)` and return the removed text.
///
/// The total length decreases by exactly `end - start` after clamping.
pub fn delete_range(runs: &mut Vec<Run>, a: usize, b: usize) -> String {
    let (start, end) = clamp_range(runs_len(runs), a, b);
    if start >= end {
        return String::new();
    }
    let fallback = fallback_style(runs);
    let old = std::mem::take(runs);
    let mut removed = String::new();
    let mut pos = 0usize;
    for run in old {
        let len = run.len();
        let (run_start, run_end) = (pos, pos + len);
        pos = run_end;
        if run_end <= start || run_start >= end {
            runs.push(run);
        } else if run_start >= start && run_end <= end {
            removed.push_str(&run.text);
        } else {
            let cut_start = start.saturating_sub(run_start);
            let cut_end = (end - run_start).min(len);
            let (before, rest) = split_at_char(&run.text, cut_start);
            let (inside, after) = split_at_char(rest, cut_end - cut_start);
            removed.push_str(inside);
            let kept = format!("{before}{after}");
            if !kept.is_empty() {
                runs.push(run.with_text(kept));
            }
        }
    }
    finish(runs, fallback);
    trace!(target: "text.format", start, end, removed = end - start, "delete_range");
    removed
}

/// Append `text` at the end, extending the last run when its format matches.
pub fn append_text(runs: &mut Vec<Run>, text: &str, style: &Style) {
    if text.is_empty() {
        return;
    }
    let sole_placeholder = runs.len() == 1 && runs[0].is_empty();
    if let Some(last) = runs.last_mut()
        && last.style.same_format(style)
    {
        last.text.push_str(text);
    } else if sole_placeholder {
        runs[0] = Run::new(text, style.clone());
    } else {
        runs.push(Run::new(text, style.clone()));
    }
    trace!(target: "text.format", len = text.len(), runs = runs.len(), "append_text");
}

/// Insert `text` at character `offset` (clamped).
///
/// Text joins the run it lands in (or the run ending / starting at the
/// offset) when the formats match; otherwise that run is split around a new
/// run carrying `style`.
pub fn insert_text(runs: &mut Vec<Run>, offset: usize, text: &str, style: &Style) {
    if text.is_empty() {
        return;
    }
    let total = runs_len(runs);
    if offset >= total {
        append_text(runs, text, style);
        return;
    }
    let mut pos = 0usize;
    for idx in 0..runs.len() {
        let len = runs[idx].len();
        let (run_start, run_end) = (pos, pos + len);
        pos = run_end;
        if offset > run_end {
            continue;
        }
        if offset == run_end {
            if runs[idx].style.same_format(style) {
                runs[idx].text.push_str(text);
                return;
            }
            continue;
        }
        // run_start <= offset < run_end
        let local = offset - run_start;
        if runs[idx].style.same_format(style) {
            let byte = crate::char_to_byte(&runs[idx].text, local);
            runs[idx].text.insert_str(byte, text);
        } else if local == 0 {
            runs.insert(idx, Run::new(text, style.clone()));
        } else {
            let (before, after) = split_at_char(&runs[idx].text, local);
            let (before, after) = (before.to_string(), after.to_string());
            let tail = runs[idx].with_text(after);
            runs[idx].text = before;
            runs.insert(idx + 1, Run::new(text, style.clone()));
            runs.insert(idx + 2, tail);
        }
        trace!(target: "text.format", offset, len = text.len(), runs = runs.len(), "insert_text");
        return;
    }
}

/// Remove the final grapheme cluster of the last run. Returns the removed
/// text, or `None` when the list holds only the empty placeholder.
pub fn remove_last_grapheme(runs: &mut Vec<Run>) -> Option<String> {
    let last = runs.last_mut()?;
    if last.is_empty() {
        return None;
    }
    let cut = crate::grapheme::prev_boundary(&last.text, last.text.len());
    let removed = last.text.split_off(cut);
    if last.is_empty() && runs.len() > 1 {
        runs.pop();
    }
    Some(removed)
}

/// Text between two character offsets (order-independent, clamped).
pub fn slice_text(runs: &[Run], a: usize, b: usize) -> String {
    let (start, end) = clamp_range(runs_len(runs), a, b);
    let mut out = String::new();
    let mut pos = 0usize;
    for run in runs {
        let len = run.len();
        let (run_start, run_end) = (pos, pos + len);
        pos = run_end;
        if run_end <= start || run_start >= end {
            continue;
        }
        let from = start.saturating_sub(run_start);
        let to = (end - run_start).min(len);
        out.push_str(crate::char_slice(&run.text, from, to));
    }
    out
}
