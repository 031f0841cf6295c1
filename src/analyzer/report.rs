use crate::errors::{AppError, AppResult};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

/// Prices above this are reported as lease rates.
pub const LEASE_RATE_FLOOR: u64 = 1000;
pub const MAX_LEASE_RATES_SHOWN: usize = 10;

const RULE: &str = "======================================================================";

/// Compiled regex set for scanning a listing page snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotAnalyzer {
    price: Regex,
    studio: Regex,
    one_bed: Regex,
    two_bed: Regex,
    twelve_month: Regex,
}

/// What the scans found in one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    pub html_chars: usize,
    /// Distinct `$` amounts as written in the page, ascending by value.
    pub unique_prices: Vec<String>,
    /// The subset of `unique_prices` above [`LEASE_RATE_FLOOR`].
    pub lease_rates: Vec<String>,
    pub studios: usize,
    pub one_beds: usize,
    pub two_beds: usize,
    pub twelve_month_mentions: usize,
}

fn compile(pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| AppError::SnapshotError(format!("Invalid pattern {pattern}: {e}")))
}

// "2,445" -> 2445
fn price_value(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

impl SnapshotAnalyzer {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            price: compile(r"\$([0-9,]+)")?,
            studio: compile(r"(?i)studio")?,
            one_bed: compile(r"(?i)1[- ]bed")?,
            two_bed: compile(r"(?i)2[- ]bed")?,
            twelve_month: compile(r"(?i)12[- ]?month")?,
        })
    }

    pub fn analyze(&self, html: &str) -> SnapshotReport {
        let distinct: HashSet<&str> = self
            .price
            .captures_iter(html)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect();

        let mut priced: Vec<(u64, &str)> = distinct
            .into_iter()
            .filter_map(|p| price_value(p).map(|v| (v, p)))
            .collect();
        priced.sort_unstable();

        let lease_rates = priced
            .iter()
            .filter(|(v, _)| *v > LEASE_RATE_FLOOR)
            .map(|(_, p)| p.to_string())
            .collect();

        SnapshotReport {
            html_chars: html.chars().count(),
            unique_prices: priced.into_iter().map(|(_, p)| p.to_string()).collect(),
            lease_rates,
            studios: self.studio.find_iter(html).count(),
            one_beds: self.one_bed.find_iter(html).count(),
            two_beds: self.two_bed.find_iter(html).count(),
            twelve_month_mentions: self.twelve_month.find_iter(html).count(),
        }
    }
}

impl fmt::Display for SnapshotReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "SNAPSHOT ANALYSIS - RESULTS SUMMARY")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "   HTML size: {} chars", self.html_chars)?;

        writeln!(f, "\n💰 PRICES FOUND IN HTML:")?;
        writeln!(f, "   Total: {} unique price points", self.unique_prices.len())?;
        writeln!(f, "\n   Apartment lease rates detected:")?;
        for rate in self.lease_rates.iter().take(MAX_LEASE_RATES_SHOWN) {
            writeln!(f, "   • ${rate}")?;
        }

        writeln!(f, "\n📍 UNIT DETAILS FOUND:")?;
        writeln!(f, "   Studios: {} mentions", self.studios)?;
        writeln!(f, "   1 Bedrooms: {} mentions", self.one_beds)?;
        writeln!(f, "   2 Bedrooms: {} mentions", self.two_beds)?;

        writeln!(f, "\n❓ 12-MONTH LEASE RATE SEARCH:")?;
        writeln!(
            f,
            "   '12 month' found: {} times",
            self.twelve_month_mentions
        )?;

        if self.twelve_month_mentions == 0 {
            writeln!(f, "\n   ⚠️  12-month lease terms NOT in static HTML")?;
            writeln!(f, "   💡 Likely reasons:")?;
            writeln!(f, "      1. Site uses a third-party leasing API")?;
            writeln!(f, "      2. Pricing loads via AJAX after page load")?;
            writeln!(f, "      3. Need to click into individual units")?;
            writeln!(f, "      4. May need full browser automation (not just fetch)")?;
        }

        write!(f, "\n{RULE}")
    }
}
