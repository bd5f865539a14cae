//! Heuristic parser for interview-question model output.
//!
//! The model is asked for numbered questions with `- Tips:` lines, but its
//! output format is not contractually guaranteed. Parsing therefore degrades
//! through three tiers — numbered-line scan, paragraph scan, synthetic
//! fallback — and never returns an error or an empty result.

use serde::{Deserialize, Serialize};

const MAX_QUESTIONS: usize = 10;
const MAX_TIPS: usize = 5;

/// Tip payload delimiters, tried in priority order. The first delimiter
/// present in the payload wins and is split on all its occurrences.
const TIP_DELIMITERS: [&str; 4] = [", ", "; ", "\n- ", " \u{2022} "];

/// Substituted into any record that ends up with no parseable tips.
const DEFAULT_TIPS: [&str; 3] = [
    "Prepare specific examples from your experience.",
    "Be concise and clear in your response.",
    "Highlight relevant skills and accomplishments.",
];

/// Tips for the synthetic record emitted when no structure is found at all.
const SYNTHETIC_TIPS: [&str; 4] = [
    "Research the company and the responsibilities of the role beforehand.",
    "Prepare specific examples from your experience.",
    "Be concise and clear in your response.",
    "Highlight relevant skills and accomplishments.",
];

/// One interview question with 1..=5 answer tips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub tips: Vec<String>,
}

/// Parses free-form model text into question records.
///
/// Always returns at least one record with a non-empty question and at
/// least one tip; `role` seeds the synthetic fallback when the text carries
/// no recognizable structure.
pub fn parse_questions_and_tips(raw_text: &str, role: &str) -> Vec<QuestionRecord> {
    let mut records = scan_numbered_lines(raw_text);
    if records.is_empty() {
        records = scan_paragraphs(raw_text);
    }
    if records.is_empty() {
        records = vec![synthetic_record(role)];
    }
    postprocess(records)
}

/// Tier 1: scan for `N.` / `N)` question lines and `- Tips:` payloads.
fn scan_numbered_lines(raw_text: &str) -> Vec<QuestionRecord> {
    let lines: Vec<&str> = raw_text.lines().collect();
    let mut records = Vec::new();
    let mut current: Option<QuestionRecord> = None;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }

        if let Some(question) = match_question_line(line) {
            flush(&mut records, current.take());
            current = Some(QuestionRecord {
                question: question.to_string(),
                tips: Vec::new(),
            });
            i += 1;
            continue;
        }

        if let Some(record) = current.as_mut() {
            if let Some(payload) = match_tips_line(line) {
                record.tips.extend(split_tips(payload));

                // Subsequent non-question lines may each carry one more
                // bulleted tip for the same record.
                let mut j = i + 1;
                while j < lines.len() && match_question_line(lines[j].trim()).is_none() {
                    if let Some(tip) = bullet_tip(lines[j].trim()) {
                        record.tips.push(tip);
                    }
                    j += 1;
                }
                i = j;
                continue;
            }

            if let Some(tip) = bullet_tip(line) {
                record.tips.push(tip);
            }
        }
        i += 1;
    }

    flush(&mut records, current.take());
    records
}

/// Tier 2: split on blank-line boundaries and treat each paragraph's first
/// line as a candidate question.
fn scan_paragraphs(raw_text: &str) -> Vec<QuestionRecord> {
    let mut records = Vec::new();
    for paragraph in raw_text.split("\n\n") {
        let mut lines = paragraph.trim().lines();
        let Some(first) = lines.next() else { continue };
        let first = first.trim();
        if !is_candidate_question(first) {
            continue;
        }
        let question = strip_leading_numbering(first).to_string();

        let mut tips = Vec::new();
        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let lower = line.to_lowercase();
            if lower.starts_with("question") || lower.starts_with("interview") {
                continue;
            }
            let tip = line
                .strip_prefix(['-', '\u{2022}', '*'])
                .unwrap_or(line)
                .trim_start();
            if !tip.is_empty() {
                tips.push(tip.to_string());
            }
        }

        if !question.is_empty() && !tips.is_empty() {
            records.push(QuestionRecord { question, tips });
        }
    }
    records
}

/// Tier 3: one generated record referencing the requested role.
fn synthetic_record(role: &str) -> QuestionRecord {
    QuestionRecord {
        question: format!("What experience do you have that prepares you for a {role} position?"),
        tips: SYNTHETIC_TIPS.iter().map(|t| t.to_string()).collect(),
    }
}

/// Caps the result set at 10 records, backfills tip-less records with the
/// generic tip set, and caps each tip list at 5 entries.
fn postprocess(mut records: Vec<QuestionRecord>) -> Vec<QuestionRecord> {
    records.truncate(MAX_QUESTIONS);
    for record in &mut records {
        if record.tips.is_empty() {
            record.tips = DEFAULT_TIPS.iter().map(|t| t.to_string()).collect();
        }
        record.tips.truncate(MAX_TIPS);
    }
    records
}

fn flush(records: &mut Vec<QuestionRecord>, current: Option<QuestionRecord>) {
    if let Some(record) = current {
        if !record.question.is_empty() && !record.tips.is_empty() {
            records.push(record);
        }
    }
}

/// Matches `N. text` or `N) text`, returning the text with numbering dropped.
fn match_question_line(line: &str) -> Option<&str> {
    let rest = line.trim_start();
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &rest[digits..];
    let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

/// Matches a tips line: optional bullet, optional case-insensitive "tips",
/// optional colon, then a non-empty payload.
fn match_tips_line(line: &str) -> Option<&str> {
    let mut rest = line.trim_start();
    rest = rest
        .strip_prefix(['-', '\u{2022}', '*'])
        .unwrap_or(rest)
        .trim_start();
    if let Some(prefix) = rest.get(..4) {
        if prefix.eq_ignore_ascii_case("tips") {
            rest = &rest[4..];
        }
    }
    rest = rest.strip_prefix(':').unwrap_or(rest);
    let payload = rest.trim();
    (!payload.is_empty()).then_some(payload)
}

/// Splits a tips payload on the first matching delimiter, discarding empty
/// fragments; a payload with no delimiter is one tip.
fn split_tips(payload: &str) -> Vec<String> {
    for delimiter in TIP_DELIMITERS {
        if payload.contains(delimiter) {
            let parts: Vec<String> = payload
                .split(delimiter)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if !parts.is_empty() {
                return parts;
            }
        }
    }
    vec![payload.to_string()]
}

/// A line starting with a bullet character, stripped of its bullets.
fn bullet_tip(line: &str) -> Option<String> {
    if !line.starts_with(['-', '\u{2022}', '*']) {
        return None;
    }
    let tip = line.trim_start_matches(['-', '\u{2022}', '*']).trim();
    (!tip.is_empty()).then(|| tip.to_string())
}

fn is_candidate_question(line: &str) -> bool {
    if has_numbered_prefix(line) {
        return true;
    }
    let lower = line.to_lowercase();
    lower.contains("question") || lower.contains("interview")
}

fn has_numbered_prefix(line: &str) -> bool {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with(['.', ')'])
}

fn strip_leading_numbering(line: &str) -> &str {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return line;
    }
    let rest = &line[digits..];
    rest.strip_prefix(['.', ')']).unwrap_or(rest).trim_start()
}
