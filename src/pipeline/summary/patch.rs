//! Structure-preserving inline replacement.
//!
//! Applies `replace` proposals to a canonical summary while guaranteeing
//! that lines are never merged, split or reordered and that heading and
//! section-title lines are left untouched.

use std::ops::Range;

use super::markdown::is_structural_line;
use super::spans::char_span_to_bytes;
use super::types::{ModificationProposal, ProposalKind};

/// A resolved edit in byte coordinates of the original summary.
#[derive(Debug)]
struct Edit<'a> {
    range: Range<usize>,
    replacement: &'a str,
}

/// Apply the safe subset of `proposals` to `summary`.
///
/// Eligible proposals are `replace` proposals with a non-empty
/// `original_text` and no line break in either text. Each is located by
/// its explicit character span when that span is valid, otherwise by the
/// first literal occurrence of `original_text`. Spans touching a structural
/// line are dropped. Remaining spans are applied right to left; a span
/// overlapping one already applied is skipped.
pub fn apply_inline_replacements(summary: &str, proposals: &[ModificationProposal]) -> String {
    let protected = protected_ranges(summary);

    let mut edits: Vec<Edit<'_>> = proposals
        .iter()
        .filter(|p| is_eligible(p))
        .filter_map(|p| {
            let range = locate(summary, p)?;
            if protected.iter().any(|line| overlaps(line, &range)) {
                tracing::debug!(start = range.start, "Skipping edit on structural line");
                return None;
            }
            Some(Edit {
                range,
                replacement: p.correct_text.as_str(),
            })
        })
        .collect();

    if edits.is_empty() {
        return summary.to_string();
    }

    // Stable: equal starts keep input order, so the earlier proposal wins.
    edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    let mut patched = summary.to_string();
    let mut frontier = usize::MAX;
    let mut applied = 0usize;
    for edit in edits {
        if edit.range.end > frontier {
            continue;
        }
        if summary[edit.range.clone()].contains('\n') {
            continue;
        }
        patched.replace_range(edit.range.clone(), edit.replacement);
        frontier = edit.range.start;
        applied += 1;
    }

    tracing::debug!(
        proposal_count = proposals.len(),
        applied_count = applied,
        "Inline replacements applied"
    );
    patched
}

fn is_eligible(p: &ModificationProposal) -> bool {
    p.kind == ProposalKind::Replace
        && !p.original_text.is_empty()
        && !p.original_text.contains('\n')
        && !p.correct_text.contains('\n')
}

/// Byte range of the proposal's target in `summary`.
fn locate(summary: &str, p: &ModificationProposal) -> Option<Range<usize>> {
    if let (Some(start), Some(end)) = (p.start, p.end) {
        if let Some((s, e)) = char_span_to_bytes(summary, start, end) {
            return Some(s..e);
        }
    }
    let start = summary.find(p.original_text.as_str())?;
    Some(start..start + p.original_text.len())
}

/// Byte ranges (terminator included) of structural lines.
fn protected_ranges(summary: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut offset = 0;
    for line in summary.split_inclusive('\n') {
        let end = offset + line.len();
        if is_structural_line(line) {
            ranges.push(offset..end);
        }
        offset = end;
    }
    ranges
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::summary::types::ProposalSeverity;
    use proptest::prelude::*;

    const SUMMARY: &str = "## 看診重點摘要\n\n**看診原因**\n\n喉嚨痛三天，體溫 38 度\n\n**治療計畫**\n\n多喝水，休息三天";

    fn replace(original: &str, correct: &str) -> ModificationProposal {
        ModificationProposal {
            kind: ProposalKind::Replace,
            title: "修正".into(),
            description: String::new(),
            original_text: original.into(),
            correct_text: correct.into(),
            reason: String::new(),
            severity: ProposalSeverity::Medium,
            category: "fact_error".into(),
            start: None,
            end: None,
        }
    }

    fn at(mut p: ModificationProposal, start: usize, end: usize) -> ModificationProposal {
        p.start = Some(start);
        p.end = Some(end);
        p
    }

    #[test]
    fn no_proposals_returns_input() {
        assert_eq!(apply_inline_replacements(SUMMARY, &[]), SUMMARY);
    }

    #[test]
    fn literal_first_match_replaced() {
        let out = apply_inline_replacements(SUMMARY, &[replace("三天", "兩天")]);
        assert!(out.contains("喉嚨痛兩天"));
        assert!(out.ends_with("休息三天"));
    }

    #[test]
    fn right_to_left_application() {
        let text = "0123456789012345678901234567890";
        let out = apply_inline_replacements(
            text,
            &[at(replace("x", "AA"), 5, 10), at(replace("y", "BB"), 20, 25)],
        );
        assert_eq!(out, "01234AA0123456789BB567890");
    }

    #[test]
    fn explicit_offsets_are_char_offsets() {
        let text = "喉嚨痛三天，體溫 38 度";
        let out = apply_inline_replacements(text, &[at(replace("38", "39"), 9, 11)]);
        assert_eq!(out, "喉嚨痛三天，體溫 39 度");
    }

    #[test]
    fn invalid_explicit_offsets_fall_back_to_literal() {
        let text = "體溫 38 度";
        for (start, end) in [(5, 3), (4, 4), (10, 200)] {
            let out = apply_inline_replacements(text, &[at(replace("38", "39"), start, end)]);
            assert_eq!(out, "體溫 39 度", "span {start}..{end}");
        }
    }

    #[test]
    fn proposals_with_newlines_leave_text_unchanged() {
        let proposals = [
            replace("喉嚨痛\n", "喉嚨痛"),
            replace("三天", "兩天\n"),
            replace("\n\n", " "),
        ];
        assert_eq!(apply_inline_replacements(SUMMARY, &proposals), SUMMARY);
    }

    #[test]
    fn structural_lines_untouched() {
        let proposals = [
            replace("看診重點摘要", "摘要"),
            replace("**看診原因**", "看診原因"),
            replace("治療計畫", "治療"),
            replace("## ", ""),
        ];
        assert_eq!(apply_inline_replacements(SUMMARY, &proposals), SUMMARY);
    }

    #[test]
    fn span_straddling_into_structural_line_skipped() {
        let text = "內容A\n**看診原因**";
        // "A\n**" crosses the line break into the title line.
        let out = apply_inline_replacements(text, &[at(replace("A", "B"), 2, 6)]);
        assert_eq!(out, text);
    }

    #[test]
    fn explicit_span_over_line_break_rejected_at_apply_time() {
        let text = "第一行\n第二行";
        let out = apply_inline_replacements(text, &[at(replace("行", "列"), 2, 5)]);
        assert_eq!(out, text);
    }

    #[test]
    fn non_replace_kinds_ignored() {
        let mut highlight = replace("三天", "兩天");
        highlight.kind = ProposalKind::Highlight;
        let mut remove = replace("喉嚨痛", "");
        remove.kind = ProposalKind::Remove;
        assert_eq!(apply_inline_replacements(SUMMARY, &[highlight, remove]), SUMMARY);
    }

    #[test]
    fn empty_original_ignored_and_missing_text_skipped() {
        let proposals = [replace("", "X"), replace("不存在的文字", "X")];
        assert_eq!(apply_inline_replacements(SUMMARY, &proposals), SUMMARY);
    }

    #[test]
    fn overlapping_spans_first_applied_wins() {
        let text = "abcdefghij";
        let out = apply_inline_replacements(
            text,
            &[at(replace("a", "X"), 2, 6), at(replace("b", "Y"), 4, 8)],
        );
        // (4,8) starts further right so it is applied first; (2,6) overlaps it.
        assert_eq!(out, "abcdYij");
    }

    #[test]
    fn equal_starts_keep_input_order() {
        let text = "abcdefghij";
        let out = apply_inline_replacements(
            text,
            &[at(replace("a", "FIRST"), 3, 5), at(replace("b", "SECOND"), 3, 4)],
        );
        assert_eq!(out, "abcFIRSTfghij");
    }

    #[test]
    fn adjacent_spans_both_apply() {
        let text = "abcdef";
        let out = apply_inline_replacements(
            text,
            &[at(replace("a", "1"), 0, 3), at(replace("b", "2"), 3, 6)],
        );
        assert_eq!(out, "12");
    }

    #[test]
    fn empty_replacement_deletes_inline() {
        let out = apply_inline_replacements("多喝水，休息三天", &[replace("，休息三天", "")]);
        assert_eq!(out, "多喝水");
    }

    fn proposal_strategy() -> impl Strategy<Value = ModificationProposal> {
        let texts = prop_oneof![
            Just("三天".to_string()),
            Just("看診原因".to_string()),
            Just("治療計畫".to_string()),
            Just("**".to_string()),
            Just("\n".to_string()),
            Just("38".to_string()),
            Just("喝水".to_string()),
            "[a-z一二三]{0,3}",
        ];
        (
            texts.clone(),
            texts,
            prop::option::of(0usize..60),
            prop::option::of(0usize..60),
        )
            .prop_map(|(original, correct, start, end)| ModificationProposal {
                start,
                end,
                ..replace(&original, &correct)
            })
    }

    proptest! {
        #[test]
        fn line_structure_is_preserved(proposals in prop::collection::vec(proposal_strategy(), 0..8)) {
            let out = apply_inline_replacements(SUMMARY, &proposals);
            let before: Vec<&str> = SUMMARY.split('\n').collect();
            let after: Vec<&str> = out.split('\n').collect();
            prop_assert_eq!(before.len(), after.len());
            for (b, a) in before.iter().zip(&after) {
                if is_structural_line(b) || b.is_empty() {
                    prop_assert_eq!(b, a);
                }
            }
        }
    }
}
