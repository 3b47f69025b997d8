use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use schoolscout_lib::transform::columns;
use schoolscout_lib::{DisplayRecord, FieldMapping};

/// Extra column added to ranking output.
pub const US_NEWS_LINK: &str = "US News Link";

const US_NEWS_BASE: &str = "https://www.usnews.com/best-colleges";

// -- CSV output --

/// Column layout of a CSV file: the mapping's display names followed by any
/// extra columns.
#[derive(Debug, Clone)]
pub struct CsvLayout {
    headers: Vec<String>,
    hyperlink_names: bool,
}

impl CsvLayout {
    /// With `hyperlink_names`, the Website column is folded into the Name
    /// column as a spreadsheet `HYPERLINK` formula.
    pub fn new(mapping: &FieldMapping, extra_fields: &[&str], hyperlink_names: bool) -> Self {
        let headers = mapping
            .display_names()
            .chain(extra_fields.iter().copied())
            .filter(|h| !(hyperlink_names && *h == columns::WEBSITE))
            .map(str::to_string)
            .collect();
        Self {
            headers,
            hyperlink_names,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn row(&self, record: &DisplayRecord) -> Vec<String> {
        self.headers
            .iter()
            .map(|header| {
                if self.hyperlink_names && header == columns::NAME {
                    return name_cell(record);
                }
                record.get(header).unwrap_or_default().to_string()
            })
            .collect()
    }
}

fn name_cell(record: &DisplayRecord) -> String {
    let name = record.get(columns::NAME).unwrap_or_default();
    match record.get(columns::WEBSITE) {
        Some(url) => hyperlink(url, name),
        None => name.to_string(),
    }
}

/// Spreadsheet formula linking `text` to `url`. Embedded quotes are doubled.
pub fn hyperlink(url: &str, text: &str) -> String {
    format!(
        "=HYPERLINK(\"{}\", \"{}\")",
        url.replace('"', "\"\""),
        text.replace('"', "\"\"")
    )
}

pub fn write_csv<W: Write>(writer: W, layout: &CsvLayout, records: &[DisplayRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(layout.headers())?;
    for record in records {
        wtr.write_record(layout.row(record))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_csv(path: &Path, layout: &CsvLayout, records: &[DisplayRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(file, layout, records).with_context(|| format!("failed to write {}", path.display()))
}

// -- Listing output --

pub fn render_schools(records: &[DisplayRecord]) -> String {
    let mut out = format!("Total schools: {}\n\n\n", records.len());
    for record in records {
        out.push_str(record.get(columns::NAME).unwrap_or_default());
        out.push('\n');
        for (key, value) in record.iter() {
            out.push_str(&format!("{}: {}\n", key, value.unwrap_or("")));
        }
        out.push_str(&"=".repeat(80));
        out.push_str(" \n\n");
    }
    out
}

pub fn print_schools(records: &[DisplayRecord]) {
    print!("{}", render_schools(records));
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Ranking input --

/// One row of the ranking list: a school name and its US News identifier.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct RankingEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "US N&W ID")]
    pub us_news_id: String,
}

impl RankingEntry {
    pub fn us_news_link(&self) -> String {
        format!("{}/{}", US_NEWS_BASE, self.us_news_id.trim())
    }
}

pub fn read_ranking_list<R: std::io::Read>(reader: R) -> Result<Vec<RankingEntry>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();
    for row in rdr.deserialize() {
        entries.push(row.context("malformed ranking list row")?);
    }
    Ok(entries)
}

pub fn load_ranking_list(path: &Path) -> Result<Vec<RankingEntry>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_ranking_list(file).with_context(|| format!("failed to read {}", path.display()))
}
