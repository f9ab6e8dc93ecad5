//! Layout of the fundraising report spreadsheet.
//!
//! The sheet has three header rows followed by one row per closed project:
//!
//! | A                 | B                  | C           |
//! |-------------------|--------------------|-------------|
//! | Report from       | 2024/01/15 10:00:00|             |
//! | Top projects by fundraising speed      |             |
//! | Project name      | Fundraising time   | Description |
//! | Shelter           | 2 days, 3:04:05    | Roof repair |

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

const DATE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const SHEET_TITLE: &str = "Sheet1";
const HEADER_ROWS: usize = 3;
const COLUMN_COUNT: usize = 3;

/// One closed project in the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub fundraising_time: Duration,
    pub description: String,
}

impl ReportRow {
    pub fn new(
        name: impl Into<String>,
        fundraising_time: Duration,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            fundraising_time,
            description: description.into(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format_elapsed(self.fundraising_time),
            self.description.clone(),
        ]
    }
}

/// Formats a duration as `"<d> day(s), H:MM:SS"`, or `"H:MM:SS"` under a day.
///
/// Negative durations are shown as zero.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    let clock = format!("{hours}:{minutes:02}:{seconds:02}");

    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        _ => format!("{days} days, {clock}"),
    }
}

/// Shape of one report spreadsheet.
///
/// Built for a single export and never modified afterwards: the timestamp,
/// the grid size and the locale are fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportTemplate {
    generated_at: DateTime<Utc>,
    data_rows: usize,
    locale: String,
}

impl ReportTemplate {
    pub fn new(generated_at: DateTime<Utc>, data_rows: usize, locale: impl Into<String>) -> Self {
        Self {
            generated_at,
            data_rows,
            locale: locale.into(),
        }
    }

    pub fn generated_at(&self) -> String {
        self.generated_at.format(DATE_TIME_FORMAT).to_string()
    }

    pub fn title(&self) -> String {
        format!("Report from {}", self.generated_at())
    }

    pub fn row_count(&self) -> usize {
        HEADER_ROWS + self.data_rows
    }

    pub fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    pub fn data_rows(&self) -> usize {
        self.data_rows
    }

    /// The A1 range covering the whole table, e.g. `A1:C5`.
    pub fn table_range(&self) -> String {
        format!("A1:{}{}", column_letter(self.column_count()), self.row_count())
    }

    pub fn header(&self) -> Vec<Vec<String>> {
        vec![
            vec!["Report from".to_string(), self.generated_at()],
            vec!["Top projects by fundraising speed".to_string()],
            vec![
                "Project name".to_string(),
                "Fundraising time".to_string(),
                "Description".to_string(),
            ],
        ]
    }

    /// Body of `spreadsheets.create`.
    pub fn spreadsheet_body(&self) -> Value {
        json!({
            "properties": {
                "title": self.title(),
                "locale": self.locale,
            },
            "sheets": [{
                "properties": {
                    "sheetType": "GRID",
                    "sheetId": 0,
                    "title": SHEET_TITLE,
                    "gridProperties": {
                        "rowCount": self.row_count(),
                        "columnCount": self.column_count(),
                    },
                },
            }],
        })
    }

    /// Body of `spreadsheets.values.update`: the header followed by `rows`.
    pub fn update_body(&self, rows: &[ReportRow]) -> Value {
        let mut values = self.header();
        values.extend(rows.iter().map(ReportRow::cells));
        json!({
            "majorDimension": "ROWS",
            "values": values,
        })
    }
}

fn column_letter(column: usize) -> char {
    debug_assert!((1..=26).contains(&column));
    char::from(b'A' + (column - 1) as u8)
}
