use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days-in-year convention used for day-count interest accrual.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DaysInYearConvention {
    Fixed360,
    #[default]
    Fixed365,
    /// 365 or 366 depending on the year.
    Actual,
}

/// Institution-level settings consumed by the calculation engine. Constructed
/// explicitly by the caller and passed by reference — there is no ambient
/// global configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    pub days_in_year: DaysInYearConvention,
    pub interest_rate_decimal_places: u32,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        ApplicationSettings {
            days_in_year: DaysInYearConvention::Fixed365,
            interest_rate_decimal_places: 2,
        }
    }
}

impl ApplicationSettings {
    pub fn days_in_a_year(&self, year: i32) -> u32 {
        match self.days_in_year {
            DaysInYearConvention::Fixed360 => 360,
            DaysInYearConvention::Fixed365 => 365,
            DaysInYearConvention::Actual => {
                if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                    366
                } else {
                    365
                }
            }
        }
    }
}

/// Dates on which the institution does not operate (holidays, weekends
/// already expanded by the caller). Passed through to the late-repayment
/// scheduler; this engine never interprets them itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonWorkingDates {
    pub dates: BTreeSet<NaiveDate>,
}

impl NonWorkingDates {
    pub fn is_non_working(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

impl FromIterator<NaiveDate> for NonWorkingDates {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        NonWorkingDates {
            dates: iter.into_iter().collect(),
        }
    }
}

/// Opaque session identity, threaded through to collaborators unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub user_name: String,
}
