use anyhow::{Context, Result, bail};

use crate::args::Cli;
use spfcheck_lib::SpfIssue;
#[cfg(feature = "with-dns")]
use spfcheck_lib::{DomainSpfReport, SpfError};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct OutputRow {
    pub input: String,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub domain: Option<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub record: Option<String>,
    pub valid: bool,
    pub issues: Vec<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub codes: Vec<&'static str>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

impl OutputRow {
    pub fn from_record(spf: &str, issues: &[SpfIssue]) -> Self {
        let record = if spf.is_empty() {
            None
        } else {
            Some(spf.to_string())
        };
        Self::with_issues(spf.to_string(), None, record, issues)
    }

    #[cfg(feature = "with-dns")]
    pub fn from_report(input: &str, report: DomainSpfReport) -> Self {
        let DomainSpfReport {
            domain,
            record,
            issues,
        } = report;
        Self::with_issues(input.to_string(), Some(domain), record, &issues)
    }

    #[cfg(feature = "with-dns")]
    pub fn from_error(input: &str, error: &SpfError) -> Self {
        Self {
            input: input.to_string(),
            domain: None,
            record: None,
            valid: false,
            issues: Vec::new(),
            codes: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    fn with_issues(
        input: String,
        domain: Option<String>,
        record: Option<String>,
        issues: &[SpfIssue],
    ) -> Self {
        Self {
            input,
            domain,
            record,
            valid: issues.is_empty(),
            issues: issues.iter().map(ToString::to_string).collect(),
            codes: issues.iter().map(SpfIssue::code).collect(),
            error: None,
        }
    }

    pub fn human_line(&self) -> String {
        if let Some(error) = &self.error {
            return format!("[ERROR]   {} :: {error}", self.input);
        }
        if self.valid {
            match &self.record {
                Some(record) if record != &self.input => {
                    format!("[OK]      {} :: {record}", self.input)
                }
                _ => format!("[OK]      {}", self.input),
            }
        } else {
            format!("[INVALID] {} :: {}", self.input, self.issues.join("; "))
        }
    }
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows, cli),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

pub fn any_failed(rows: &[OutputRow]) -> bool {
    rows.iter().any(|row| !row.valid)
}

fn write_human(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let text = human_report(rows);
    if let Some(path) = &cli.out {
        write_all_atomically(path, text.as_bytes())?;
    } else {
        print!("{text}");
    }
    Ok(())
}

fn human_report(rows: &[OutputRow]) -> String {
    let mut text = String::new();
    for row in rows {
        text.push_str(&row.human_line());
        text.push('\n');
        if !row.valid && row.error.is_none() {
            if let Some(record) = &row.record {
                text.push_str(&format!("          record: {record}\n"));
            }
        }
    }
    text
}

#[cfg(feature = "with-serde")]
fn write_json(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=ndjson nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

#[cfg(feature = "with-csv")]
fn csv_record(row: &OutputRow) -> Vec<String> {
    vec![
        row.input.clone(),
        row.domain.clone().unwrap_or_default(),
        row.record.clone().unwrap_or_default(),
        if row.valid {
            "true".to_string()
        } else {
            "false".to_string()
        },
        row.codes.join("|"),
        row.issues.join("|"),
        row.error.clone().unwrap_or_default(),
    ]
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}
