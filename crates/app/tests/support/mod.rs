#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use pulse_app::{App, DisplayBus, GaSettings, GlobalConfig};
use pulse_core::{ColumnRole, ReportColumn, ReportDataType, ReportPage};
use report_client::{ClientError, HandlerError, ReportQuery, ReportSource};

pub struct TestApp {
    pub _dir: TempDir,
    pub app: App,
    pub dir_path: PathBuf,
}

pub fn setup_app(attributes: BTreeMap<String, PathBuf>) -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let dir_path = dir.path().to_path_buf();
    let settings = GaSettings {
        application_name: Some("sitepulse-tests".to_string()),
        application_version: None,
        service_account_email: "reporter@project.iam.gserviceaccount.com".to_string(),
        key_file: dir_path.join("reporter.pem"),
        key_secret: None,
        profile_id: 12345678,
        db_path: dir_path.join("metrics.db"),
        attributes,
    };
    let app = App::new(GlobalConfig {
        google_analytics: settings,
    })
    .expect("app");
    TestApp {
        _dir: dir,
        app,
        dir_path,
    }
}

pub fn write_metric_sets(dir: &Path, file_name: &str, contents: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, contents).expect("write metric sets");
    path
}

pub fn column(name: &str, role: ColumnRole, data_type: ReportDataType) -> ReportColumn {
    ReportColumn {
        name: name.to_string(),
        role,
        data_type,
    }
}

pub fn page(columns: Vec<ReportColumn>, rows: &[&[&str]], has_more: bool) -> ReportPage {
    ReportPage {
        columns,
        rows: rows
            .iter()
            .map(|row| row.iter().map(|value| value.to_string()).collect())
            .collect(),
        items_per_page: 1000,
        has_more,
    }
}

/// Replays a fixed page sequence for every query and records the queries.
pub struct FakeSource {
    pub pages: Vec<ReportPage>,
    pub queries: RefCell<Vec<ReportQuery>>,
}

impl FakeSource {
    pub fn new(pages: Vec<ReportPage>) -> Self {
        Self {
            pages,
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl ReportSource for FakeSource {
    fn for_each_page(
        &self,
        query: &ReportQuery,
        handler: &mut dyn FnMut(&ReportPage) -> Result<(), HandlerError>,
    ) -> report_client::Result<()> {
        self.queries.borrow_mut().push(query.clone());
        for page in &self.pages {
            handler(page).map_err(ClientError::Handler)?;
        }
        Ok(())
    }
}

/// Fails every query with a remote domain error.
pub struct FailingSource;

impl ReportSource for FailingSource {
    fn for_each_page(
        &self,
        _query: &ReportQuery,
        _handler: &mut dyn FnMut(&ReportPage) -> Result<(), HandlerError>,
    ) -> report_client::Result<()> {
        Err(ClientError::Api {
            code: 403,
            message: "permission denied".to_string(),
        })
    }
}

#[derive(Default)]
pub struct RecordingBus {
    pub events: RefCell<Vec<(String, serde_json::Value)>>,
}

impl DisplayBus for RecordingBus {
    fn publish(&self, event: &str, payload: serde_json::Value) {
        self.events.borrow_mut().push((event.to_string(), payload));
    }
}
