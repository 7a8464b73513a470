//! Relative date ranges used by the admin list filters.

use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};

/// A relative date range selectable in the admin sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    Any,
    Today,
    Past7Days,
    ThisMonth,
    ThisYear,
}

impl DateFilter {
    /// Every filter in sidebar order.
    pub const ALL: [DateFilter; 5] = [
        DateFilter::Any,
        DateFilter::Today,
        DateFilter::Past7Days,
        DateFilter::ThisMonth,
        DateFilter::ThisYear,
    ];

    /// Query-string value for this filter.
    pub fn slug(self) -> &'static str {
        match self {
            DateFilter::Any => "any",
            DateFilter::Today => "today",
            DateFilter::Past7Days => "past_7_days",
            DateFilter::ThisMonth => "this_month",
            DateFilter::ThisYear => "this_year",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateFilter::Any => "Any date",
            DateFilter::Today => "Today",
            DateFilter::Past7Days => "Past 7 days",
            DateFilter::ThisMonth => "This month",
            DateFilter::ThisYear => "This year",
        }
    }

    /// Half-open `[start, end)` date range relative to `today`, or `None`
    /// for [`DateFilter::Any`].
    pub fn range(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let tomorrow = today.checked_add_days(Days::new(1))?;
        match self {
            DateFilter::Any => None,
            DateFilter::Today => Some((today, tomorrow)),
            DateFilter::Past7Days => Some((today.checked_sub_days(Days::new(7))?, tomorrow)),
            DateFilter::ThisMonth => {
                let start = today.with_day(1)?;
                let end = if today.month() == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)?
                };
                Some((start, end))
            }
            DateFilter::ThisYear => Some((
                NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
                NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?,
            )),
        }
    }
}

/// Returned when a query value names no [`DateFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDateFilter(pub String);

impl FromStr for DateFilter {
    type Err = UnknownDateFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateFilter::ALL
            .into_iter()
            .find(|filter| filter.slug() == s)
            .ok_or_else(|| UnknownDateFilter(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn any_has_no_range() {
        assert_eq!(DateFilter::Any.range(date(2024, 5, 10)), None);
    }

    #[test]
    fn today_covers_a_single_day() {
        assert_eq!(
            DateFilter::Today.range(date(2024, 5, 10)),
            Some((date(2024, 5, 10), date(2024, 5, 11)))
        );
    }

    #[test]
    fn past_seven_days_includes_today() {
        assert_eq!(
            DateFilter::Past7Days.range(date(2024, 3, 2)),
            Some((date(2024, 2, 24), date(2024, 3, 3)))
        );
    }

    #[test]
    fn this_month_rolls_over_december() {
        assert_eq!(
            DateFilter::ThisMonth.range(date(2023, 12, 31)),
            Some((date(2023, 12, 1), date(2024, 1, 1)))
        );
        assert_eq!(
            DateFilter::ThisMonth.range(date(2024, 2, 15)),
            Some((date(2024, 2, 1), date(2024, 3, 1)))
        );
    }

    #[test]
    fn this_year_spans_january_to_january() {
        assert_eq!(
            DateFilter::ThisYear.range(date(2024, 7, 4)),
            Some((date(2024, 1, 1), date(2025, 1, 1)))
        );
    }

    #[test]
    fn parses_its_own_slugs() {
        for filter in DateFilter::ALL {
            assert_eq!(filter.slug().parse::<DateFilter>(), Ok(filter));
        }
        assert_matches!("bogus".parse::<DateFilter>(), Err(UnknownDateFilter(ref v)) if v == "bogus");
        assert_matches!("".parse::<DateFilter>(), Err(_));
    }

    #[test]
    fn slugs_are_unique() {
        let mut slugs: Vec<_> = DateFilter::ALL.iter().map(|f| f.slug()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), DateFilter::ALL.len());
    }
}
