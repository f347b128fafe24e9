#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use pulse_core::{ColumnRole, ReportColumn, ReportDataType, ReportPage};
use pulse_db::Db;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("metrics.db");
    let db = Db::open(&path).expect("open db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn column(name: &str, role: ColumnRole, data_type: ReportDataType) -> ReportColumn {
    ReportColumn {
        name: name.to_string(),
        role,
        data_type,
    }
}

pub fn page(columns: Vec<ReportColumn>, rows: &[&[&str]]) -> ReportPage {
    ReportPage {
        columns,
        rows: rows
            .iter()
            .map(|row| row.iter().map(|value| value.to_string()).collect())
            .collect(),
        items_per_page: 1000,
        has_more: false,
    }
}

pub fn country_sessions_page(rows: &[&[&str]]) -> ReportPage {
    page(
        vec![
            column("ga:country", ColumnRole::Dimension, ReportDataType::String),
            column("ga:sessions", ColumnRole::Metric, ReportDataType::Integer),
        ],
        rows,
    )
}
