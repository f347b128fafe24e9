use chrono::Local;
use tracing::warn;

use pulse_db::Db;
use report_client::{ReportClient, ReportSource, ServiceAccountKey};

use crate::config::{self, GaSettings, GlobalConfig};
use crate::error::{AppError, Result};
use crate::jobs::{CONFIG_HINT, FetchJob, ScheduleClass};
use crate::widgets::{DisplayBus, NewUsersPrevMonth, SessionsToday, SessionsTodayGraph};

/// Owns the store handle and the widget state for one process. The report
/// client is built separately because only fetch triggers need credentials.
pub struct App {
    pub settings: GaSettings,
    pub db: Db,
    sessions_today: SessionsToday,
}

impl App {
    pub fn new(config: GlobalConfig) -> Result<Self> {
        let settings = config.google_analytics;
        let db = Db::open(&settings.db_path)?;
        Ok(Self {
            settings,
            db,
            sessions_today: SessionsToday::new(),
        })
    }

    /// Authenticate against the reporting API. Credential failures here are
    /// fatal for the invocation; there is no recovery.
    pub fn connect(&self) -> Result<ReportClient> {
        let key = ServiceAccountKey::load(
            &self.settings.service_account_email,
            &self.settings.key_file,
        )?;
        let application = match (
            &self.settings.application_name,
            &self.settings.application_version,
        ) {
            (Some(name), Some(version)) => Some(format!("{name}/{version}")),
            (Some(name), None) => Some(name.clone()),
            _ => None,
        };
        Ok(ReportClient::new(
            &key,
            self.settings.profile_id,
            application.as_deref(),
        )?)
    }

    /// Run one fetch trigger to completion. All failures, including a
    /// missing or malformed metric definition file, end at the job boundary:
    /// logged with the fixed hint, then swallowed.
    pub fn fetch(&mut self, class: ScheduleClass, source: &dyn ReportSource) {
        let sets = match self.metric_sets(class) {
            Ok(sets) => sets,
            Err(err) => {
                warn!("{CONFIG_HINT}: {err}");
                return;
            }
        };
        let today = Local::now().date_naive();
        FetchJob::new(class).run_logged(today, &sets, source, &mut self.db);
    }

    /// Run the three widgets against the store. No error boundary here;
    /// a query failure propagates to the host trigger.
    pub fn refresh_widgets(&mut self, bus: &dyn DisplayBus) -> Result<()> {
        let now = Local::now();
        NewUsersPrevMonth.run(&self.db, bus, now.date_naive())?;
        self.sessions_today.run(&self.db, bus)?;
        SessionsTodayGraph.run(&self.db, bus, now)?;
        Ok(())
    }

    fn metric_sets(&self, class: ScheduleClass) -> Result<config::MetricSets> {
        let path = self
            .settings
            .attributes
            .get(class.attributes_key())
            .ok_or(AppError::MissingSchedule(class.attributes_key()))?;
        config::load_metric_sets(path)
    }
}
