//! Deterministic out-of-range detection for vitals and lab values.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::spans::byte_to_char;
use super::types::{AnomalyFinding, AnomalySeverity};

static BLOOD_PRESSURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"血壓[：:]?\s*(\d+)/(\d+)").expect("valid regex"));
static HEART_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"心率[：:]?\s*(\d+)").expect("valid regex"));
static TEMPERATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"體溫[：:]?\s*(\d+\.?\d*)").expect("valid regex"));
static BLOOD_SUGAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"血糖[：:]?\s*(\d+\.?\d*)").expect("valid regex"));

/// Inclusive normal range and critical band for one vital.
#[derive(Debug, Clone, Copy)]
struct VitalBand {
    normal: (f64, f64),
    critical: (f64, f64),
    display: &'static str,
    suggestion: &'static str,
}

impl VitalBand {
    /// `None` when the value is within the normal range.
    fn classify(&self, value: f64) -> Option<AnomalySeverity> {
        if (self.normal.0..=self.normal.1).contains(&value) {
            None
        } else if (self.critical.0..=self.critical.1).contains(&value) {
            Some(AnomalySeverity::Medium)
        } else {
            Some(AnomalySeverity::High)
        }
    }
}

const BLOOD_PRESSURE_BAND: VitalBand = VitalBand {
    normal: (90.0, 140.0),
    critical: (60.0, 180.0),
    display: "90-140/60-90",
    suggestion: "請確認血壓數值是否正確",
};

const HEART_RATE_BAND: VitalBand = VitalBand {
    normal: (60.0, 100.0),
    critical: (40.0, 150.0),
    display: "60-100",
    suggestion: "請確認心率數值是否正確",
};

const TEMPERATURE_BAND: VitalBand = VitalBand {
    normal: (36.0, 37.5),
    critical: (35.0, 40.0),
    display: "36.0-37.5°C",
    suggestion: "請確認體溫數值是否正確",
};

const BLOOD_SUGAR_BAND: VitalBand = VitalBand {
    normal: (70.0, 140.0),
    critical: (50.0, 300.0),
    display: "70-140 mg/dL",
    suggestion: "請確認血糖數值是否正確",
};

/// Scan `summary` for vitals outside their normal range.
///
/// Findings are grouped by vital (blood pressure, heart rate, temperature,
/// blood sugar) and ordered by position within each group. Blood pressure
/// is judged on the systolic value only. Fullwidth digits are read like
/// ASCII ones; numbers that still fail to parse (for example digit runs too
/// long for the target type) are skipped.
pub fn scan_anomalies(summary: &str) -> Vec<AnomalyFinding> {
    let mut findings = Vec::new();

    for caps in BLOOD_PRESSURE.captures_iter(summary) {
        let Some(systolic) = parse_folded::<u32>(&caps[1]) else {
            continue;
        };
        if parse_folded::<u32>(&caps[2]).is_none() {
            continue;
        }
        let value = format!("{}/{}", &caps[1], &caps[2]);
        push_finding(&mut findings, summary, &caps, value, systolic.into(), &BLOOD_PRESSURE_BAND);
    }

    for caps in HEART_RATE.captures_iter(summary) {
        let Some(rate) = parse_folded::<u32>(&caps[1]) else {
            continue;
        };
        let value = caps[1].to_string();
        push_finding(&mut findings, summary, &caps, value, rate.into(), &HEART_RATE_BAND);
    }

    scan_decimal(summary, &TEMPERATURE, &TEMPERATURE_BAND, &mut findings);
    scan_decimal(summary, &BLOOD_SUGAR, &BLOOD_SUGAR_BAND, &mut findings);

    findings
}

fn scan_decimal(summary: &str, pattern: &Regex, band: &VitalBand, findings: &mut Vec<AnomalyFinding>) {
    for caps in pattern.captures_iter(summary) {
        let raw = &caps[1];
        let Some(number) = parse_folded::<f64>(raw) else {
            continue;
        };
        if !number.is_finite() {
            continue;
        }
        push_finding(findings, summary, &caps, raw.to_string(), number, band);
    }
}

/// Parse a captured number after folding its digits to ASCII.
///
/// `\d` in the patterns matches any Unicode decimal digit, so the capture
/// may hold fullwidth digits (`１６０`). Digits with no ASCII mapping make
/// the whole number unparseable.
fn parse_folded<T: std::str::FromStr>(raw: &str) -> Option<T> {
    let folded: Option<String> = raw.chars().map(fold_digit).collect();
    folded?.parse().ok()
}

fn fold_digit(c: char) -> Option<char> {
    match c {
        '.' => Some('.'),
        '\u{FF10}'..='\u{FF19}' => char::from_digit(c as u32 - 0xFF10, 10),
        _ => c.to_digit(10).and_then(|d| char::from_digit(d, 10)),
    }
}

fn push_finding(
    findings: &mut Vec<AnomalyFinding>,
    summary: &str,
    caps: &Captures<'_>,
    value: String,
    number: f64,
    band: &VitalBand,
) {
    let Some(severity) = band.classify(number) else {
        return;
    };
    let Some(whole) = caps.get(0) else {
        return;
    };
    findings.push(AnomalyFinding {
        value,
        normal_range: band.display.to_string(),
        severity,
        suggestion: band.suggestion.to_string(),
        position: (byte_to_char(summary, whole.start()), byte_to_char(summary, whole.end())),
    });
}
