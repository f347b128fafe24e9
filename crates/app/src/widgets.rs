use chrono::{DateTime, Local, NaiveDate, Timelike};
use serde_json::json;

use pulse_db::Db;

use crate::error::Result;
use crate::jobs::ScheduleClass;

/// Host-provided display channel. Publication is fire-and-forget: no
/// acknowledgment and no retry.
pub trait DisplayBus {
    fn publish(&self, event: &str, payload: serde_json::Value);
}

/// Share of last month's users that were new, as a percentage.
pub struct NewUsersPrevMonth;

impl NewUsersPrevMonth {
    pub fn run(&self, db: &Db, bus: &dyn DisplayBus, today: NaiveDate) -> Result<()> {
        let (start, _) = ScheduleClass::Monthly.window(today);
        let key = ScheduleClass::Monthly.period(start).key();
        let value = db.query_value(
            "SELECT ROUND(1.0 * SUM(newUsers) / SUM(users) * 100, 1) \
             FROM visits_count WHERE period = ?1",
            &[&key],
        )?;
        bus.publish("ga_new_users_prev_month", json!({ "value": value }));
        Ok(())
    }
}

/// Today's session total, with the previous cycle's total for a delta.
/// The previous value lives in memory only and resets with the process;
/// it is cosmetic, not authoritative.
pub struct SessionsToday {
    previous: f64,
}

impl SessionsToday {
    pub fn new() -> Self {
        Self { previous: 0.0 }
    }

    pub fn run(&mut self, db: &Db, bus: &dyn DisplayBus) -> Result<()> {
        let current = db
            .query_value(
                "SELECT SUM(sessions) FROM visits_by_visitor_type WHERE period = 'today'",
                &[],
            )?
            .unwrap_or(0.0);
        bus.publish(
            "ga_today_sessions",
            json!({ "current": current, "last": self.previous }),
        );
        self.previous = current;
        Ok(())
    }
}

impl Default for SessionsToday {
    fn default() -> Self {
        Self::new()
    }
}

/// Sessions recorded for the current hour, as graph points.
pub struct SessionsTodayGraph;

impl SessionsTodayGraph {
    pub fn run(&self, db: &Db, bus: &dyn DisplayBus, now: DateTime<Local>) -> Result<()> {
        let hour = now.hour() as i64;
        let sessions = db.query_rows(
            "SELECT sessions FROM sessions_by_hour \
             WHERE period = 'today' AND CAST(hour AS INTEGER) = ?1",
            &[&hour],
            |row| row.get::<_, f64>(0),
        )?;
        let timestamp = now.timestamp();
        let points: Vec<_> = sessions
            .into_iter()
            .map(|value| json!({ "x": timestamp, "y": value }))
            .collect();
        bus.publish("ga_sessions_today_graph", json!({ "points": points }));
        Ok(())
    }
}
