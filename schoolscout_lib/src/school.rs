//! Typed view of a raw Scorecard record.

use scorecard_api::types::RawRecord;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ScoutError;

/// Dotted API field names read by the pipeline.
pub mod fields {
    pub const NAME: &str = "school.name";
    pub const CITY: &str = "school.city";
    pub const STATE: &str = "school.state";
    pub const SCHOOL_URL: &str = "school.school_url";
    pub const TYPE: &str = "school.type";
    pub const LOCALE: &str = "school.locale";
    pub const ONLINE_ONLY: &str = "school.online_only";
    pub const MAIN_CAMPUS: &str = "school.main_campus";
    pub const OPERATING: &str = "school.operating";
    pub const TUITION_IN_STATE: &str = "latest.cost.tuition.in_state";
    pub const TUITION_OUT_OF_STATE: &str = "latest.cost.tuition.out_of_state";
    pub const STUDENT_SIZE: &str = "latest.student.size";
    pub const STUDENT_SIZE_RANGE: &str = "latest.student.size__range";
    pub const MEDIAN_EARNINGS_6YR: &str = "latest.earnings.6_yrs_after_entry.median";
    pub const TEST_REQUIREMENTS: &str = "latest.admissions.test_requirements";
    pub const ADMISSION_RATE: &str = "latest.admissions.admission_rate.consumer_rate";
    pub const SAT_SCORES: &str = "latest.admissions.sat_scores";
    pub const SAT_AVERAGE: &str = "latest.admissions.sat_scores.average.overall";
    pub const CS_DEGREE: &str = "latest.academics.program.degree.computer";
    pub const CS_PROGRAM_PERCENTAGE: &str = "latest.academics.program_percentage.computer";
}

/// Fields requested by every school query.
pub const DEFAULT_FIELDS: &[&str] = &[
    fields::NAME,
    fields::CITY,
    fields::STATE,
    fields::SCHOOL_URL,
    fields::TYPE,
    fields::LOCALE,
    fields::ONLINE_ONLY,
    fields::MAIN_CAMPUS,
    fields::TUITION_IN_STATE,
    fields::TUITION_OUT_OF_STATE,
    fields::STUDENT_SIZE,
    fields::MEDIAN_EARNINGS_6YR,
    fields::TEST_REQUIREMENTS,
    fields::ADMISSION_RATE,
    // expands to every SAT sub-field
    fields::SAT_SCORES,
    fields::CS_DEGREE,
    fields::CS_PROGRAM_PERCENTAGE,
];

/// One school as the filter and transform stages see it.
///
/// Every field is optional: the API returns `null` for unreported data and
/// omits fields that were not requested. The originating [`RawRecord`] is kept
/// for projection into display columns.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct School {
    #[serde(rename = "school.name")]
    pub name: Option<String>,
    #[serde(rename = "school.city")]
    pub city: Option<String>,
    #[serde(rename = "school.state")]
    pub state: Option<String>,
    #[serde(rename = "school.school_url")]
    pub website: Option<String>,
    #[serde(rename = "school.locale")]
    pub locale: Option<i64>,
    #[serde(rename = "school.online_only", default, deserialize_with = "flag")]
    pub online_only: Option<bool>,
    #[serde(rename = "school.main_campus", default, deserialize_with = "flag")]
    pub main_campus: Option<bool>,
    #[serde(rename = "latest.cost.tuition.in_state")]
    pub tuition_in_state: Option<f64>,
    #[serde(rename = "latest.cost.tuition.out_of_state")]
    pub tuition_out_of_state: Option<f64>,
    #[serde(rename = "latest.student.size")]
    pub undergrad_size: Option<f64>,
    #[serde(rename = "latest.earnings.6_yrs_after_entry.median")]
    pub median_earnings_6yr: Option<f64>,
    #[serde(rename = "latest.admissions.admission_rate.consumer_rate")]
    pub admission_rate: Option<f64>,
    #[serde(rename = "latest.admissions.sat_scores.average.overall")]
    pub sat_average: Option<f64>,
    #[serde(rename = "latest.academics.program_percentage.computer")]
    pub cs_program_percentage: Option<f64>,
    #[serde(skip)]
    pub(crate) raw: RawRecord,
}

impl School {
    /// Converts a raw API record, checking the type of every field the
    /// pipeline reads.
    pub fn from_raw(raw: RawRecord) -> Result<Self, ScoutError> {
        let mut school: School = serde_json::from_value(Value::Object(raw.as_map().clone()))
            .map_err(|e| ScoutError::InvalidRecord {
                name: raw.str_field(fields::NAME).unwrap_or("<unnamed>").to_string(),
                reason: e.to_string(),
            })?;
        school.raw = raw;
        Ok(school)
    }

    pub fn raw(&self) -> &RawRecord {
        &self.raw
    }

    /// Name for log lines and error messages.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Converts a page of raw records, failing on the first bad one.
pub fn from_raw_records(records: Vec<RawRecord>) -> Result<Vec<School>, ScoutError> {
    records.into_iter().map(School::from_raw).collect()
}

/// The API reports flags as `0`/`1`; booleans are accepted too.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(x) => Ok(Some(x != 0.0)),
            None => Err(D::Error::custom(format!("invalid flag {}", n))),
        },
        Some(other) => Err(D::Error::custom(format!("expected 0/1 flag, got {}", other))),
    }
}
