//! Billing period detection.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{BILLING_DATES, PERIOD_BIMONTHLY, PERIOD_QUARTERLY};
use crate::models::extraction::BillingPeriod;

/// Month count for each explicit cycle cue, checked in order.
fn period_cues() -> [(&'static Regex, u32); 2] {
    [(&*PERIOD_BIMONTHLY, 2), (&*PERIOD_QUARTERLY, 3)]
}

/// Billing cycle length in months; 1 unless the text says otherwise.
pub fn extract_period_months(text: &str) -> u32 {
    period_cues()
        .into_iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, months)| months)
        .unwrap_or(1)
}

/// Explicit start and end dates of the billed period, if printed.
pub fn extract_billing_period(text: &str) -> Option<BillingPeriod> {
    let caps = BILLING_DATES.captures(text)?;

    let start = date_from_parts(&caps[1], &caps[2], &caps[3])?;
    let end = date_from_parts(&caps[4], &caps[5], &caps[6])?;

    (end >= start).then_some(BillingPeriod { start, end })
}

fn date_from_parts(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(parse_year(year), month.parse().ok()?, day.parse().ok()?)
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        2000 + year
    } else {
        year
    }
}
