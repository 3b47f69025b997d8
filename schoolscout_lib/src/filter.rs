//! Threshold filters the API cannot express as query parameters.

use std::fmt;

use crate::school::School;

/// Salary cutoff applied when no setting overrides it.
pub const DEFAULT_SALARY_CUTOFF: f64 = 60_000.0;

/// SAT average cutoff applied when no setting overrides it.
pub const DEFAULT_SAT_CUTOFF: f64 = 1_300.0;

/// Cutoffs and optional rules for [`FilterEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Minimum 6-year median earnings.
    pub salary_cutoff: f64,
    /// Minimum average SAT score. Schools without a reported average pass.
    pub sat_cutoff: f64,
    /// Drop schools flagged as online-only.
    pub exclude_online_only: bool,
    /// Drop schools not flagged as a main campus.
    pub require_main_campus: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            salary_cutoff: DEFAULT_SALARY_CUTOFF,
            sat_cutoff: DEFAULT_SAT_CUTOFF,
            exclude_online_only: true,
            require_main_campus: true,
        }
    }
}

/// Why a school was dropped. Variants are listed in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    NoCsProgram,
    OnlineOnly,
    BranchCampus,
    MissingEarnings,
    LowEarnings { earnings: f64, cutoff: f64 },
    LowSat { score: f64, cutoff: f64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoCsProgram => write!(f, "no Bachelors program for CS"),
            Rejection::OnlineOnly => write!(f, "online only"),
            Rejection::BranchCampus => write!(f, "not main campus"),
            Rejection::MissingEarnings => write!(f, "no median earnings data"),
            Rejection::LowEarnings { earnings, cutoff } => write!(
                f,
                "median earnings 6 years after entry (${}) is < ${}",
                earnings, cutoff
            ),
            Rejection::LowSat { score, cutoff } => {
                write!(f, "SAT average ({}) is < {}", score, cutoff)
            }
        }
    }
}

/// Applies the rule sequence to each school independently.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    config: FilterConfig,
}

impl FilterEngine {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Returns the first rule the school fails, or `None` if it passes all.
    pub fn evaluate(&self, school: &School) -> Option<Rejection> {
        let cfg = &self.config;

        if school.cs_program_percentage == Some(0.0) {
            return Some(Rejection::NoCsProgram);
        }
        if cfg.exclude_online_only && school.online_only == Some(true) {
            return Some(Rejection::OnlineOnly);
        }
        if cfg.require_main_campus && school.main_campus == Some(false) {
            return Some(Rejection::BranchCampus);
        }

        let earnings = match school.median_earnings_6yr {
            Some(earnings) => earnings,
            None => return Some(Rejection::MissingEarnings),
        };
        if earnings < cfg.salary_cutoff {
            return Some(Rejection::LowEarnings {
                earnings,
                cutoff: cfg.salary_cutoff,
            });
        }

        match school.sat_average {
            Some(score) if score < cfg.sat_cutoff => Some(Rejection::LowSat {
                score,
                cutoff: cfg.sat_cutoff,
            }),
            _ => None,
        }
    }

    /// Keeps the schools that pass every rule, in their original order.
    pub fn filter(&self, schools: Vec<School>) -> Vec<School> {
        let total = schools.len();
        let kept: Vec<School> = schools
            .into_iter()
            .filter(|school| match self.evaluate(school) {
                Some(reason) => {
                    tracing::debug!("Filtered {}: {}", school.display_name(), reason);
                    false
                }
                None => true,
            })
            .collect();
        tracing::info!("Kept {} of {} schools", kept.len(), total);
        kept
    }
}
