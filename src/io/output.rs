use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::error::Result;
use crate::models::{CallVerdict, PaceVerdict, SentimentEntry, WordVerdict};
use crate::rubrics::{PassSummary, SentimentReport};

/// Machine-readable report for one rubric run
#[derive(Debug, Clone, Serialize)]
pub struct ReportEnvelope<P, S, V> {
    pub run_id: String,
    /// RFC 3339 UTC timestamp
    pub generated_at: String,
    pub rubric: String,
    pub parameters: P,
    pub summary: S,
    pub verdicts: V,
}

impl<P: Serialize, S: Serialize, V: Serialize> ReportEnvelope<P, S, V> {
    pub fn new(rubric: impl Into<String>, parameters: P, summary: S, verdicts: V) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now().to_rfc3339(),
            rubric: rubric.into(),
            parameters,
            summary,
            verdicts,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Field separator for delimited export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }
}

/// A verdict that can be exported as one row of a table
pub trait TabularVerdict {
    fn header() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

fn pass_label(pass: bool) -> String {
    let label = if pass { "pass" } else { "fail" };
    label.to_string()
}

impl TabularVerdict for WordVerdict {
    fn header() -> &'static [&'static str] {
        &["contact_id", "rubric", "result", "matched_words", "match_count"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.contact_id.clone(),
            self.rubric.to_string(),
            pass_label(self.pass),
            self.matched_words.join(", "),
            self.match_count.to_string(),
        ]
    }
}

impl TabularVerdict for PaceVerdict {
    fn header() -> &'static [&'static str] {
        &[
            "contact_id",
            "result",
            "max_pace",
            "sentence_word_count",
            "sentence_text",
            "start_ms",
            "end_ms",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.contact_id.clone(),
            pass_label(self.pass),
            format!("{:.2}", self.max_pace),
            self.sentence_word_count.to_string(),
            self.sentence_text.clone(),
            self.start_ms.to_string(),
            self.end_ms.to_string(),
        ]
    }
}

impl TabularVerdict for SentimentEntry {
    fn header() -> &'static [&'static str] {
        &["contact_id", "extension", "bucket", "polarity_score", "text"]
    }

    fn row(&self) -> Vec<String> {
        let bucket = serde_json::to_value(self.bucket)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        vec![
            self.contact_id.clone(),
            self.extension.clone(),
            bucket,
            self.polarity_score.to_string(),
            self.text.clone(),
        ]
    }
}

/// Quote a field when it contains the delimiter, a quote, or a line break
fn escape_field(field: &str, delimiter: char) -> String {
    let needs_quotes = field.contains(delimiter)
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r');
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row(out: &mut String, fields: &[String], delimiter: char) {
    let line: Vec<String> = fields.iter().map(|f| escape_field(f, delimiter)).collect();
    out.push_str(&line.join(&delimiter.to_string()));
    out.push('\n');
}

/// Render per-call verdicts as delimited text with a header row
///
/// Skipped calls keep their source and reason with empty score columns.
pub fn verdicts_to_delimited<T: TabularVerdict>(
    verdicts: &[CallVerdict<T>],
    delimiter: Delimiter,
) -> String {
    let delimiter = delimiter.as_char();
    let columns = T::header();
    let mut out = String::new();

    let mut header = vec!["source".to_string(), "status".to_string()];
    header.extend(columns.iter().map(|c| c.to_string()));
    header.push("reason".to_string());
    push_row(&mut out, &header, delimiter);

    for verdict in verdicts {
        let mut fields = vec![verdict.source().display().to_string()];
        match verdict {
            CallVerdict::Scored { verdict, .. } => {
                fields.push("scored".to_string());
                fields.extend(verdict.row());
                fields.push(String::new());
            }
            CallVerdict::Skipped { reason, .. } => {
                fields.push("skipped".to_string());
                fields.extend(std::iter::repeat_n(String::new(), columns.len()));
                fields.push(reason.clone());
            }
        }
        push_row(&mut out, &fields, delimiter);
    }

    out
}

/// Render a sentiment report as delimited text: scored calls first, then skipped ones
pub fn sentiment_to_delimited(report: &SentimentReport, delimiter: Delimiter) -> String {
    let delimiter = delimiter.as_char();
    let columns = SentimentEntry::header();
    let mut out = String::new();

    let mut header = vec!["status".to_string(), "call".to_string()];
    header.extend(columns.iter().map(|c| c.to_string()));
    header.push("reason".to_string());
    push_row(&mut out, &header, delimiter);

    for (key, entry) in &report.all_calls {
        let mut fields = vec!["scored".to_string(), key.clone()];
        fields.extend(entry.row());
        fields.push(String::new());
        push_row(&mut out, &fields, delimiter);
    }

    for (key, reason) in &report.skipped {
        let mut fields = vec!["skipped".to_string(), key.clone()];
        fields.extend(std::iter::repeat_n(String::new(), columns.len()));
        fields.push(reason.clone());
        push_row(&mut out, &fields, delimiter);
    }

    out
}

/// Write delimited text to a file
pub fn write_delimited(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)?;
    Ok(())
}

/// Human-readable pass/fail table
pub fn format_pass_table(rubric: &str, summary: &PassSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("Results: {}\n", rubric));
    output.push_str(&format!("{}\n", "=".repeat(9 + rubric.len())));
    output.push_str(&format!("Passed:  {}\n", summary.passed));
    output.push_str(&format!("Failed:  {}\n", summary.failed));
    output.push_str(&format!("Total:   {}\n", summary.total));
    output.push_str(&format!("Pass rate: {:.1}%\n", summary.pass_rate() * 100.0));
    if summary.skipped > 0 {
        output.push_str(&format!("Skipped: {}\n", summary.skipped));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SentimentBucket, WordRubric};

    fn word_verdicts() -> Vec<CallVerdict<WordVerdict>> {
        vec![
            CallVerdict::Scored {
                source: "calls/a.json".into(),
                verdict: WordVerdict {
                    contact_id: "c-1".to_string(),
                    rubric: WordRubric::Greeting,
                    matched_words: vec!["您好".to_string(), "大金".to_string()],
                    match_count: 2,
                    pass: true,
                },
            },
            CallVerdict::Skipped {
                source: "calls/b.json".into(),
                reason: "missing field `metadata`".to_string(),
            },
        ]
    }

    #[test]
    fn test_word_verdicts_csv() {
        let csv = verdicts_to_delimited(&word_verdicts(), Delimiter::Comma);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "source,status,contact_id,rubric,result,matched_words,match_count,reason"
        );
        assert_eq!(lines[1], "calls/a.json,scored,c-1,greeting,pass,\"您好, 大金\",2,");
        assert_eq!(lines[2], "calls/b.json,skipped,,,,,,missing field `metadata`");
    }

    #[test]
    fn test_tab_delimiter_leaves_commas_unquoted() {
        let tsv = verdicts_to_delimited(&word_verdicts(), Delimiter::Tab);
        let row = tsv.lines().nth(1).unwrap();
        assert_eq!(row.split('\t').nth(5), Some("您好, 大金"));
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain", ','), "plain");
        assert_eq!(escape_field("say \"hi\"", ','), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("a\nb", '\t'), "\"a\nb\"");
    }

    #[test]
    fn test_pace_row_formats_two_decimals() {
        let verdict = PaceVerdict {
            contact_id: "c-1".to_string(),
            max_pace: 12.0,
            sentence_text: "您好".to_string(),
            sentence_word_count: 12,
            start_ms: 1000,
            end_ms: 2000,
            zero_duration_sentences: 0,
            pass: false,
        };
        assert_eq!(
            verdict.row(),
            vec!["c-1", "fail", "12.00", "12", "您好", "1000", "2000"]
        );
    }

    #[test]
    fn test_sentiment_csv() {
        let mut report = SentimentReport::default();
        report.all_calls.insert(
            "20230501-c-1".to_string(),
            SentimentEntry {
                contact_id: "c-1".to_string(),
                extension: "8012".to_string(),
                polarity_score: -1,
                text: "空调坏了".to_string(),
                bucket: SentimentBucket::Short,
            },
        );
        report
            .skipped
            .insert("c-2".to_string(), "classifier down".to_string());

        let csv = sentiment_to_delimited(&report, Delimiter::Comma);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "status,call,contact_id,extension,bucket,polarity_score,text,reason"
        );
        assert_eq!(lines[1], "scored,20230501-c-1,c-1,8012,short,-1,空调坏了,");
        assert_eq!(lines[2], "skipped,c-2,,,,,,classifier down");
    }

    #[test]
    fn test_write_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let verdicts = word_verdicts();
        let summary = PassSummary::from_verdicts(&verdicts);

        ReportEnvelope::new("greeting", serde_json::json!({"window": 20}), summary, &verdicts)
            .write_json(&path)
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["rubric"], "greeting");
        assert_eq!(written["summary"]["passed"], 1);
        assert_eq!(written["summary"]["skipped"], 1);
        assert_eq!(written["verdicts"][0]["status"], "scored");
        assert_eq!(written["verdicts"][0]["verdict"]["match_count"], 2);
        assert_eq!(written["verdicts"][1]["status"], "skipped");
        assert_eq!(written["run_id"].as_str().unwrap().len(), 36);
    }

    #[test]
    fn test_format_pass_table() {
        let table = format_pass_table(
            "pace",
            &PassSummary {
                passed: 3,
                failed: 1,
                skipped: 0,
                total: 4,
            },
        );
        assert!(table.contains("Passed:  3"));
        assert!(table.contains("Pass rate: 75.0%"));
        assert!(!table.contains("Skipped"));
    }
}
