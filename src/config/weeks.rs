use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate};
use indexmap::IndexMap;
use log::warn;

use super::read_config_file;
use crate::error::{AuditError, Result};

/// Inclusive submission window, both bounds in the configured local offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekWindow {
    pub label: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl WeekWindow {
    pub fn new(label: &str, start: NaiveDate, end: NaiveDate, offset: FixedOffset) -> Result<Self> {
        let start = localize(start, 0, 0, 0, offset)?;
        let end = localize(end, 23, 59, 59, offset)?;

        Ok(Self {
            label: label.to_string(),
            start,
            end,
        })
    }

    pub fn offset(&self) -> FixedOffset {
        *self.start.offset()
    }

    pub fn contains(&self, at: DateTime<FixedOffset>) -> bool {
        self.start <= at && at <= self.end
    }
}

fn localize(
    date: NaiveDate,
    hour: u32,
    min: u32,
    sec: u32,
    offset: FixedOffset,
) -> Result<DateTime<FixedOffset>> {
    date.and_hms_opt(hour, min, sec)
        .ok_or_else(|| AuditError::Config(format!("invalid time of day for {date}")))?
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| AuditError::Config(format!("ambiguous local time for {date}")))
}

/// Week windows keyed by label, in file order.
#[derive(Debug, Default)]
pub struct WeekTable {
    windows: IndexMap<String, WeekWindow>,
}

impl WeekTable {
    pub fn labels(&self) -> Vec<&str> {
        self.windows.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, label: &str) -> Result<&WeekWindow> {
        self.windows
            .get(label)
            .ok_or_else(|| AuditError::Config(format!("no week window for label '{label}'")))
    }
}

pub fn load_weeks(path: &Path, offset: FixedOffset) -> Result<WeekTable> {
    let content = read_config_file(path, "week table file")?;
    Ok(parse_weeks(&content, offset))
}

pub fn parse_weeks(content: &str, offset: FixedOffset) -> WeekTable {
    let mut windows = IndexMap::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_week_line(line, offset) {
            Ok(window) => {
                windows.insert(window.label.clone(), window);
            }
            Err(e) => warn!("Skipping week table line {}: '{line}' ({e})", index + 1),
        }
    }

    WeekTable { windows }
}

fn parse_week_line(line: &str, offset: FixedOffset) -> Result<WeekWindow> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [label, start, end] = fields.as_slice() else {
        return Err(AuditError::Config(format!(
            "expected 'label,start_date,end_date', found {} fields",
            fields.len()
        )));
    };

    if label.is_empty() {
        return Err(AuditError::Config("empty week label".to_string()));
    }

    let start = parse_date(start)?;
    let end = parse_date(end)?;
    WeekWindow::new(label, start, end, offset)
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AuditError::Config(format!("invalid date '{value}': {e}")))
}
