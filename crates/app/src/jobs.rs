use chrono::{Datelike, NaiveDate};
use tracing::warn;

use pulse_core::{Period, ReportPage};
use pulse_db::Db;
use report_client::{HandlerError, ReportQuery, ReportSource};

use crate::config::MetricSets;
use crate::error::Result;

/// Fixed operator hint attached to every swallowed job failure.
pub const CONFIG_HINT: &str =
    "check the sitepulse configuration for credentials and metric definitions";

/// The three host schedules differ only in how they resolve a date window
/// and label the resulting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleClass {
    Monthly,
    Daily,
    Today,
}

impl ScheduleClass {
    pub fn attributes_key(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Daily => "daily",
            Self::Today => "today",
        }
    }

    /// Inclusive date window relative to the wall-clock date at trigger
    /// time: the previous full calendar month, yesterday, or today.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Monthly => {
                let first_of_this_month = today.with_day(1).unwrap_or(today);
                let last_of_prev = first_of_this_month.pred_opt().unwrap_or(first_of_this_month);
                let first_of_prev = last_of_prev.with_day(1).unwrap_or(last_of_prev);
                (first_of_prev, last_of_prev)
            }
            Self::Daily => {
                let yesterday = today.pred_opt().unwrap_or(today);
                (yesterday, yesterday)
            }
            Self::Today => (today, today),
        }
    }

    pub fn period(&self, window_start: NaiveDate) -> Period {
        match self {
            Self::Monthly => Period::Month {
                year: window_start.year(),
                month: window_start.month(),
            },
            Self::Daily => Period::Day(window_start),
            Self::Today => Period::Today,
        }
    }
}

/// One fetch invocation: stream every configured metric set for the
/// schedule's window into the store. Stateless between runs.
#[derive(Debug, Clone, Copy)]
pub struct FetchJob {
    pub schedule: ScheduleClass,
}

impl FetchJob {
    pub fn new(schedule: ScheduleClass) -> Self {
        Self { schedule }
    }

    pub fn run(
        &self,
        today: NaiveDate,
        sets: &MetricSets,
        source: &dyn ReportSource,
        db: &mut Db,
    ) -> Result<()> {
        let (start, end) = self.schedule.window(today);
        let period = self.schedule.period(start);
        for (name, spec) in sets {
            let query = ReportQuery::from_spec(spec, start, end);
            source.for_each_page(
                &query,
                &mut |page: &ReportPage| -> std::result::Result<(), HandlerError> {
                    db.ensure_schema(name, page)?;
                    db.replace_period(name, &period, page)?;
                    Ok(())
                },
            )?;
        }
        Ok(())
    }

    /// Job boundary: any failure aborts the whole invocation, is reported to
    /// the operator log and swallowed. The host scheduler's next trigger is
    /// the only retry mechanism.
    pub fn run_logged(
        &self,
        today: NaiveDate,
        sets: &MetricSets,
        source: &dyn ReportSource,
        db: &mut Db,
    ) {
        if let Err(err) = self.run(today, sets, source, db) {
            warn!("{CONFIG_HINT}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn monthly_window_is_the_previous_full_month() {
        let (start, end) = ScheduleClass::Monthly.window(date(2024, 3, 15));
        assert_eq!(start, date(2024, 2, 1));
        assert_eq!(end, date(2024, 2, 29));
        assert_eq!(
            ScheduleClass::Monthly.period(start).key(),
            "month_2024_02"
        );
    }

    #[test]
    fn monthly_window_crosses_year_boundaries() {
        let (start, end) = ScheduleClass::Monthly.window(date(2024, 1, 1));
        assert_eq!(start, date(2023, 12, 1));
        assert_eq!(end, date(2023, 12, 31));
        assert_eq!(
            ScheduleClass::Monthly.period(start).key(),
            "month_2023_12"
        );
    }

    #[test]
    fn daily_window_is_yesterday() {
        let (start, end) = ScheduleClass::Daily.window(date(2024, 3, 1));
        assert_eq!(start, date(2024, 2, 29));
        assert_eq!(end, date(2024, 2, 29));
        assert_eq!(
            ScheduleClass::Daily.period(start).key(),
            "daily_2024_02_29"
        );
    }

    #[test]
    fn today_window_is_today() {
        let today = date(2024, 3, 5);
        let (start, end) = ScheduleClass::Today.window(today);
        assert_eq!((start, end), (today, today));
        assert_eq!(ScheduleClass::Today.period(start).key(), "today");
    }
}
