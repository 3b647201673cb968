//! Canonical Markdown layout for visit summaries.
//!
//! The model is asked for a fixed structure but routinely drifts: missing or
//! duplicated headings, plain-text section titles, CRLF endings, literal
//! `\n` sequences from JSON transport. The normalizer forces the layout
//! without touching the content lines themselves.

/// Top-level heading text, without Markdown markers.
pub const SUMMARY_HEADING: &str = "看診重點摘要";

/// The heading as emitted in canonical output.
pub const SUMMARY_HEADING_LINE: &str = "## 看診重點摘要";

/// Section titles, in their canonical order.
pub const SECTION_TITLES: [&str; 4] = ["看診原因", "診斷結果", "治療計畫", "注意事項"];

/// Force `text` into the canonical summary layout.
///
/// - the first line is always `## 看診重點摘要` followed by a blank line, and
///   any other variant of that heading is dropped;
/// - lines naming a section become `**section**` surrounded by single blank
///   lines;
/// - other lines keep their content with trailing whitespace trimmed;
/// - blank-line runs collapse to one and trailing blank lines are removed.
///
/// Empty input returns empty output.
pub fn normalize_summary_markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = normalize_line_endings(text);
    let mut lines = text.split('\n').peekable();
    let mut out: Vec<String> = vec![SUMMARY_HEADING_LINE.to_string(), String::new()];

    while let Some(raw) = lines.next() {
        if raw.trim().is_empty() {
            push_blank_once(&mut out);
            continue;
        }

        let bare = strip_markers(raw);
        if bare == SUMMARY_HEADING {
            continue;
        }

        if let Some(title) = SECTION_TITLES.iter().find(|t| **t == bare) {
            push_blank_once(&mut out);
            out.push(format!("**{title}**"));
            out.push(String::new());
            while lines.peek().is_some_and(|next| next.trim().is_empty()) {
                lines.next();
            }
            continue;
        }

        out.push(raw.trim_end().to_string());
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    out.join("\n")
}

/// Whether `line` is a heading or bold section-title line, i.e. a line whose
/// text must survive any automated edit untouched.
pub fn is_structural_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with("**")
}

/// CRLF/CR → LF. Text carrying many literal `\n` escapes and at most one
/// real line break was escaped in transport; unescape it.
fn normalize_line_endings(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let literal = text.matches("\\n").count();
    let real = text.matches('\n').count();
    if literal >= 3 && real <= 1 {
        text.replace("\\n", "\n")
    } else {
        text
    }
}

/// Strip leading `#`/`*`/whitespace and trailing `*`/whitespace/colons.
fn strip_markers(line: &str) -> &str {
    line.trim_start_matches(|c: char| c == '#' || c == '*' || c.is_whitespace())
        .trim_end_matches(|c: char| c == '*' || c == ':' || c == '：' || c.is_whitespace())
}

fn push_blank_once(out: &mut Vec<String>) {
    if out.last().is_some_and(|l| !l.is_empty()) {
        out.push(String::new());
    }
}
