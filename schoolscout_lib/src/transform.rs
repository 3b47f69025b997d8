//! Projection of raw API fields onto display columns, plus unit formatting.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::ScoutError;
use crate::school::{fields, School};

/// Display column names produced by the default mapping.
pub mod columns {
    pub const NAME: &str = "Name";
    pub const WEBSITE: &str = "Website";
    pub const ADMISSION_RATE: &str = "Admission Rate";
    pub const MEDIAN_SALARY: &str = "6-year Median Salary";
    pub const CS_DEGREE_PERCENT: &str = "CS Degree %";
    pub const UNDERGRAD_SIZE: &str = "Undergrad Size";
    pub const TUITION_IN_STATE: &str = "In-state Tuition";
    pub const TUITION_OUT_OF_STATE: &str = "Out-of-state Tuition";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const SETTING: &str = "Setting";
    pub const SAT_AVERAGE: &str = "SAT Average";
}

/// Default raw-key to display-name mapping, in output column order.
pub const DEFAULT_MAPPING: &[(&str, &str)] = &[
    (fields::NAME, columns::NAME),
    (fields::SCHOOL_URL, columns::WEBSITE),
    (fields::ADMISSION_RATE, columns::ADMISSION_RATE),
    (fields::MEDIAN_EARNINGS_6YR, columns::MEDIAN_SALARY),
    (fields::CS_PROGRAM_PERCENTAGE, columns::CS_DEGREE_PERCENT),
    (fields::STUDENT_SIZE, columns::UNDERGRAD_SIZE),
    (fields::TUITION_IN_STATE, columns::TUITION_IN_STATE),
    (fields::TUITION_OUT_OF_STATE, columns::TUITION_OUT_OF_STATE),
    (fields::CITY, columns::CITY),
    (fields::STATE, columns::STATE),
    (fields::LOCALE, columns::SETTING),
    (
        "latest.admissions.sat_scores.25th_percentile.critical_reading",
        "SAT 25th % Critical Reading",
    ),
    (
        "latest.admissions.sat_scores.75th_percentile.critical_reading",
        "SAT 75th % Critical Reading",
    ),
    ("latest.admissions.sat_scores.25th_percentile.math", "SAT 25th % Math"),
    ("latest.admissions.sat_scores.75th_percentile.math", "SAT 75th % Math"),
    ("latest.admissions.sat_scores.25th_percentile.writing", "SAT 25th % Writing"),
    ("latest.admissions.sat_scores.75th_percentile.writing", "SAT 75th % Writing"),
    (fields::SAT_AVERAGE, columns::SAT_AVERAGE),
];

const LOCALE_LABELS: [&str; 4] = ["city", "suburb", "town", "rural"];

/// Ordered mapping from raw field name to display column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    entries: Vec<(String, String)>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::new(DEFAULT_MAPPING.iter().copied())
    }
}

impl FieldMapping {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Display column names in output order.
    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, display)| display.as_str())
    }

    pub fn display_for(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, display)| display.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What to do with a mapping entry whose source field is not in the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Leave the column out of the record.
    #[default]
    Permissive,
    /// Emit the column with a null value.
    NullPlaceholder,
    /// Fail with [`ScoutError::MissingField`].
    Strict,
}

/// One display row: column name to formatted value, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayRecord {
    fields: Vec<(String, Option<String>)>,
}

impl DisplayRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column, keeping its position if it already exists.
    pub fn set(&mut self, key: &str, value: Option<String>) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    /// Value of a column; `None` when the column is absent or null.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for DisplayRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Turns typed schools into display rows.
///
/// Columns are projected from the school's raw record in mapping order.
/// Locale, website, currency and percentage sources are re-derived from the
/// typed fields, whatever display name the mapping gives them. A null input
/// always yields a null column.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    mapping: FieldMapping,
    mode: ProjectionMode,
}

impl Transformer {
    pub fn new(mapping: FieldMapping, mode: ProjectionMode) -> Self {
        Self { mapping, mode }
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn transform(&self, school: &School) -> Result<DisplayRecord, ScoutError> {
        let raw = school.raw();
        let mut record = DisplayRecord::new();

        for (source, display) in self.mapping.entries() {
            match raw.get(source) {
                Some(value) => record.set(display, derive(source, school, value)?),
                None => match self.mode {
                    ProjectionMode::Permissive => {}
                    ProjectionMode::NullPlaceholder => record.set(display, None),
                    ProjectionMode::Strict => {
                        return Err(ScoutError::MissingField(source.clone()))
                    }
                },
            }
        }

        Ok(record)
    }

    pub fn transform_all(&self, schools: &[School]) -> Result<Vec<DisplayRecord>, ScoutError> {
        schools.iter().map(|s| self.transform(s)).collect()
    }
}

/// Maps a locale code to its category: 1x city, 2x suburb, 3x town, 4x rural.
pub fn locale_label(code: i64) -> Result<&'static str, ScoutError> {
    usize::try_from(code.div_euclid(10) - 1)
        .ok()
        .and_then(|idx| LOCALE_LABELS.get(idx))
        .copied()
        .ok_or(ScoutError::InvalidLocaleCode(code))
}

pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

pub fn format_currency(amount: f64) -> String {
    format!("${}", amount)
}

/// Renders a 0.0–1.0 fraction as a percentage rounded to two decimals,
/// printed in its shortest form (`0.5` is `"50.0%"`).
pub fn format_percentage(fraction: f64) -> String {
    format!("{:?}%", (fraction * 10_000.0).round() / 100.0)
}

/// Formats one present source value. Sources with a unit are formatted from
/// the typed field; everything else is rendered as-is.
fn derive(source: &str, school: &School, value: &Value) -> Result<Option<String>, ScoutError> {
    let formatted = match source {
        fields::LOCALE => school
            .locale
            .map(locale_label)
            .transpose()?
            .map(str::to_string),
        fields::SCHOOL_URL => school.website.as_deref().map(normalize_url),
        fields::TUITION_IN_STATE => school.tuition_in_state.map(format_currency),
        fields::TUITION_OUT_OF_STATE => school.tuition_out_of_state.map(format_currency),
        fields::MEDIAN_EARNINGS_6YR => school.median_earnings_6yr.map(format_currency),
        fields::ADMISSION_RATE => school.admission_rate.map(format_percentage),
        fields::CS_PROGRAM_PERCENTAGE => school.cs_program_percentage.map(format_percentage),
        _ => render_scalar(value),
    };
    Ok(formatted)
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use scorecard_api::types::RawRecord;
    use serde_json::json;

    use super::*;

    fn school(pairs: &[(&str, Value)]) -> School {
        let raw: RawRecord = pairs.iter().map(|(k, v)| (*k, v.clone())).collect();
        School::from_raw(raw).unwrap()
    }

    fn full_school() -> School {
        school(&[
            (fields::NAME, json!("Carnegie Mellon University")),
            (fields::SCHOOL_URL, json!("www.cmu.edu/")),
            (fields::ADMISSION_RATE, json!(0.1135)),
            (fields::MEDIAN_EARNINGS_6YR, json!(97130)),
            (fields::CS_PROGRAM_PERCENTAGE, json!(0.4567)),
            (fields::STUDENT_SIZE, json!(6982)),
            (fields::TUITION_IN_STATE, json!(58924)),
            (fields::TUITION_OUT_OF_STATE, json!(null)),
            (fields::CITY, json!("Pittsburgh")),
            (fields::STATE, json!("PA")),
            (fields::LOCALE, json!(11)),
            (fields::SAT_AVERAGE, json!(1513)),
            (fields::ONLINE_ONLY, json!(0)),
            ("latest.admissions.sat_scores.25th_percentile.math", json!(770)),
        ])
    }

    #[test]
    fn locale_labels() {
        assert_eq!(locale_label(11).unwrap(), "city");
        assert_eq!(locale_label(13).unwrap(), "city");
        assert_eq!(locale_label(21).unwrap(), "suburb");
        assert_eq!(locale_label(31).unwrap(), "town");
        assert_eq!(locale_label(41).unwrap(), "rural");
        assert_eq!(locale_label(43).unwrap(), "rural");
    }

    #[test]
    fn locale_out_of_range() {
        for code in [99, 50, 9, 0, -3] {
            assert!(matches!(
                locale_label(code),
                Err(ScoutError::InvalidLocaleCode(c)) if c == code
            ));
        }
    }

    #[test]
    fn currency_and_percentage_formatting() {
        assert_eq!(format_currency(55000.0), "$55000");
        assert_eq!(format_currency(58924.5), "$58924.5");
        assert_eq!(format_percentage(0.4567), "45.67%");
        assert_eq!(format_percentage(0.1135), "11.35%");
        assert_eq!(format_percentage(0.5), "50.0%");
        assert_eq!(format_percentage(0.08), "8.0%");
        assert_eq!(format_percentage(1.0), "100.0%");
        assert_eq!(format_percentage(0.0), "0.0%");
    }

    #[test]
    fn url_scheme_added_once() {
        assert_eq!(normalize_url("www.cmu.edu/"), "https://www.cmu.edu/");
        assert_eq!(normalize_url("http://reed.edu"), "http://reed.edu");
        assert_eq!(normalize_url("https://rice.edu"), "https://rice.edu");
    }

    #[test]
    fn transform_renames_and_formats() {
        let record = Transformer::default().transform(&full_school()).unwrap();

        assert_eq!(record.get("Name"), Some("Carnegie Mellon University"));
        assert_eq!(record.get("Website"), Some("https://www.cmu.edu/"));
        assert_eq!(record.get("Admission Rate"), Some("11.35%"));
        assert_eq!(record.get("6-year Median Salary"), Some("$97130"));
        assert_eq!(record.get("CS Degree %"), Some("45.67%"));
        assert_eq!(record.get("Undergrad Size"), Some("6982"));
        assert_eq!(record.get("In-state Tuition"), Some("$58924"));
        assert!(record.contains("Out-of-state Tuition"));
        assert_eq!(record.get("Out-of-state Tuition"), None);
        assert_eq!(record.get("Setting"), Some("city"));
        assert_eq!(record.get("SAT Average"), Some("1513"));
        assert_eq!(record.get("SAT 25th % Math"), Some("770"));
        // unmapped keys are dropped
        assert!(!record.contains(fields::ONLINE_ONLY));
        assert!(!record.keys().any(|k| k.contains('.')));
    }

    #[test]
    fn transform_keeps_mapping_order() {
        let record = Transformer::default().transform(&full_school()).unwrap();
        let mapping = FieldMapping::default();
        let expected: Vec<&str> = mapping
            .display_names()
            .filter(|name| record.contains(name))
            .collect();
        assert_eq!(record.keys().collect::<Vec<_>>(), expected);
        assert_eq!(record.keys().next(), Some("Name"));
    }

    #[test]
    fn transform_is_deterministic() {
        let transformer = Transformer::default();
        let school = full_school();
        assert_eq!(
            transformer.transform(&school).unwrap(),
            transformer.transform(&school).unwrap()
        );
    }

    #[test]
    fn nulls_stay_null() {
        let record = Transformer::default()
            .transform(&school(&[
                (fields::NAME, json!("Sparse College")),
                (fields::LOCALE, json!(null)),
                (fields::SCHOOL_URL, json!(null)),
                (fields::ADMISSION_RATE, json!(null)),
                (fields::TUITION_IN_STATE, json!(null)),
            ]))
            .unwrap();
        for column in ["Setting", "Website", "Admission Rate", "In-state Tuition"] {
            assert!(record.contains(column));
            assert_eq!(record.get(column), None);
        }
    }

    #[test]
    fn invalid_locale_is_fatal() {
        let result = Transformer::default().transform(&school(&[(fields::LOCALE, json!(99))]));
        assert!(matches!(result, Err(ScoutError::InvalidLocaleCode(99))));
    }

    #[test]
    fn projection_modes_for_missing_fields() {
        let sparse = school(&[(fields::NAME, json!("Sparse College"))]);

        let permissive = Transformer::default().transform(&sparse).unwrap();
        assert_eq!(permissive.len(), 1);

        let placeholder = Transformer::new(FieldMapping::default(), ProjectionMode::NullPlaceholder)
            .transform(&sparse)
            .unwrap();
        assert_eq!(placeholder.len(), DEFAULT_MAPPING.len());
        assert_eq!(placeholder.get("Setting"), None);

        let strict = Transformer::new(FieldMapping::default(), ProjectionMode::Strict)
            .transform(&sparse);
        match strict {
            Err(ScoutError::MissingField(field)) => assert_eq!(field, fields::SCHOOL_URL),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn custom_mapping() {
        let transformer = Transformer::new(
            FieldMapping::new([(fields::NAME, "School"), (fields::STATE, "ST")]),
            ProjectionMode::Permissive,
        );
        let record = transformer.transform(&full_school()).unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["School", "ST"]);
        assert_eq!(record.get("ST"), Some("PA"));
    }

    #[test]
    fn formatting_follows_source_field() {
        let transformer = Transformer::new(
            FieldMapping::new([
                (fields::TUITION_IN_STATE, "Resident Cost"),
                (fields::ADMISSION_RATE, "Accepted"),
                (fields::LOCALE, "Area"),
                (fields::CITY, columns::SETTING),
                (fields::STATE, columns::WEBSITE),
            ]),
            ProjectionMode::Permissive,
        );
        let record = transformer.transform(&full_school()).unwrap();
        assert_eq!(record.get("Resident Cost"), Some("$58924"));
        assert_eq!(record.get("Accepted"), Some("11.35%"));
        assert_eq!(record.get("Area"), Some("city"));
        assert_eq!(record.get(columns::SETTING), Some("Pittsburgh"));
        assert_eq!(record.get(columns::WEBSITE), Some("PA"));
    }

    #[test]
    fn display_record_set_keeps_position() {
        let mut record = DisplayRecord::new();
        record.set("A", Some("1".to_string()));
        record.set("B", None);
        record.set("A", Some("2".to_string()));
        assert_eq!(
            record.iter().collect::<Vec<_>>(),
            vec![("A", Some("2")), ("B", None)]
        );
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"A":"2","B":null}"#
        );
    }
}
