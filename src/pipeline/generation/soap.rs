//! SOAP note generation with a keyword-based text fallback.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::prompt::build_soap_prompt;
use super::retry::RetryPolicy;
use crate::pipeline::llm::LlmClient;
use crate::pipeline::summary::response::extract_json_object;
use crate::pipeline::summary::SummaryError;

pub const DEFAULT_SUBJECTIVE: &str = "無主觀症狀描述";
pub const DEFAULT_OBJECTIVE: &str = "無客觀發現";
pub const DEFAULT_ASSESSMENT: &str = "無評估結果";
pub const DEFAULT_PLAN: &str = "無治療計畫";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoapNote {
    pub subjective: String,
    pub objective: String,
    pub assessment: String,
    pub plan: String,
}

impl Default for SoapNote {
    fn default() -> Self {
        Self {
            subjective: DEFAULT_SUBJECTIVE.to_string(),
            objective: DEFAULT_OBJECTIVE.to_string(),
            assessment: DEFAULT_ASSESSMENT.to_string(),
            plan: DEFAULT_PLAN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SoapSection {
    Subjective,
    Objective,
    Assessment,
    Plan,
}

/// Header keywords per section, matched case-insensitively at line start.
/// Compound labels come before their prefixes so `治療計畫：` is read as one
/// keyword followed by a colon.
const SECTION_KEYWORDS: [(SoapSection, &[&str]); 4] = [
    (SoapSection::Subjective, &["subjective", "主觀陳述", "主觀症狀", "主觀", "s:", "症狀"]),
    (SoapSection::Objective, &["objective", "客觀檢查", "客觀發現", "客觀", "o:", "發現"]),
    (SoapSection::Assessment, &["assessment", "評估結果", "評估", "a:", "診斷結果", "診斷"]),
    (SoapSection::Plan, &["plan", "治療計畫", "計畫", "p:", "治療"]),
];

/// Generate a SOAP note from a transcript.
pub async fn generate_soap_note(
    llm: &dyn LlmClient,
    retry: &RetryPolicy,
    transcript: &str,
) -> Result<SoapNote, SummaryError> {
    if transcript.trim().is_empty() {
        return Err(SummaryError::EmptyTranscript);
    }

    let prompt = build_soap_prompt(transcript);
    let raw = retry.run("soap_note", || llm.generate(&prompt)).await?;

    let note = match extract_json_object(&raw) {
        Ok(Value::Object(map)) => note_from_json(&map),
        Ok(_) | Err(_) => {
            tracing::warn!(response_len = raw.len(), "SOAP response not JSON, using text parser");
            parse_soap_text(&raw)
        }
    };
    tracing::info!(transcript_len = transcript.len(), "SOAP note generated");
    Ok(note)
}

fn note_from_json(map: &serde_json::Map<String, Value>) -> SoapNote {
    let field = |key: &str, default: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
            .to_string()
    };
    SoapNote {
        subjective: field("subjective", DEFAULT_SUBJECTIVE),
        objective: field("objective", DEFAULT_OBJECTIVE),
        assessment: field("assessment", DEFAULT_ASSESSMENT),
        plan: field("plan", DEFAULT_PLAN),
    }
}

/// Best-effort grouping of free text under SOAP headers.
///
/// A header is a line that, after leading list/heading markers, starts with
/// a section keyword, optionally followed by a parenthetical, and then
/// either ends or continues with a colon (text after it is content). A
/// colon further into the line does not make it a header. Lines before the
/// first header are dropped. Sections without content keep their default.
pub fn parse_soap_text(text: &str) -> SoapNote {
    let mut sections: [Vec<String>; 4] = Default::default();
    let mut current: Option<SoapSection> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((section, inline)) = parse_header(line) {
            current = Some(section);
            if !inline.is_empty() {
                sections[section as usize].push(inline);
            }
            continue;
        }
        if let Some(section) = current {
            sections[section as usize].push(line.to_string());
        }
    }

    let take = |idx: usize, default: &str| {
        if sections[idx].is_empty() {
            default.to_string()
        } else {
            sections[idx].join("\n")
        }
    };
    SoapNote {
        subjective: take(SoapSection::Subjective as usize, DEFAULT_SUBJECTIVE),
        objective: take(SoapSection::Objective as usize, DEFAULT_OBJECTIVE),
        assessment: take(SoapSection::Assessment as usize, DEFAULT_ASSESSMENT),
        plan: take(SoapSection::Plan as usize, DEFAULT_PLAN),
    }
}

/// Section and inline content of a header line, if `line` is one.
fn parse_header(line: &str) -> Option<(SoapSection, String)> {
    let bare = line
        .trim_start_matches(|c: char| matches!(c, '#' | '*' | '-') || c.is_whitespace())
        .trim_end_matches(|c: char| c == '*' || c.is_whitespace());
    let lower = bare.to_lowercase();

    let (section, keyword) = SECTION_KEYWORDS.iter().find_map(|(section, keywords)| {
        keywords
            .iter()
            .find(|k| lower.starts_with(**k))
            .map(|k| (*section, *k))
    })?;

    // Keywords are ASCII or CJK with identical lowercase byte length.
    let rest = bare.get(keyword.len()..)?;
    if keyword.ends_with(':') {
        return Some((section, trim_inline(rest)));
    }

    let rest = skip_parenthetical(rest.trim_start_matches(|c: char| c == '*' || c.is_whitespace()));
    let rest = rest.trim_start_matches(|c: char| c == '*' || c.is_whitespace());
    if let Some(inline) = rest.strip_prefix(':').or_else(|| rest.strip_prefix('：')) {
        Some((section, trim_inline(inline)))
    } else if rest.is_empty() {
        Some((section, String::new()))
    } else {
        None
    }
}

/// `"(主觀) tail"` → `" tail"`; text without a leading parenthetical is
/// returned as is.
fn skip_parenthetical(text: &str) -> &str {
    if !(text.starts_with('(') || text.starts_with('（')) {
        return text;
    }
    match text.find([')', '）']) {
        Some(idx) => {
            let close_len = text[idx..].chars().next().map_or(1, char::len_utf8);
            &text[idx + close_len..]
        }
        None => text,
    }
}

fn trim_inline(text: &str) -> String {
    text.trim_matches(|c: char| c == '*' || c.is_whitespace()).to_string()
}
