mod support;

use std::collections::BTreeMap;

use chrono::Local;
use serde_json::json;

use pulse_app::{App, ScheduleClass};
use pulse_core::{ColumnRole, Period, ReportDataType, ReportPage};
use support::{RecordingBus, column, page, setup_app};

fn visits_page(rows: &[&[&str]]) -> ReportPage {
    page(
        vec![
            column("ga:date", ColumnRole::Dimension, ReportDataType::String),
            column("ga:newUsers", ColumnRole::Metric, ReportDataType::Integer),
            column("ga:users", ColumnRole::Metric, ReportDataType::Integer),
        ],
        rows,
        false,
    )
}

fn visitor_type_page(rows: &[&[&str]]) -> ReportPage {
    page(
        vec![
            column("ga:visitorType", ColumnRole::Dimension, ReportDataType::String),
            column("ga:sessions", ColumnRole::Metric, ReportDataType::Integer),
        ],
        rows,
        false,
    )
}

fn hourly_page(sessions: &str) -> ReportPage {
    let mut result = page(
        vec![
            column("ga:hour", ColumnRole::Dimension, ReportDataType::String),
            column("ga:sessions", ColumnRole::Metric, ReportDataType::Integer),
        ],
        &[],
        false,
    );
    result.rows = (0..24)
        .map(|hour| vec![format!("{hour:02}"), sessions.to_string()])
        .collect();
    result
}

fn prev_month_period() -> Period {
    let today = Local::now().date_naive();
    let (start, _) = ScheduleClass::Monthly.window(today);
    ScheduleClass::Monthly.period(start)
}

fn seed(app: &mut App, table: &str, period: &Period, page: &ReportPage) {
    app.db.ensure_schema(table, page).expect("schema");
    app.db.replace_period(table, period, page).expect("seed");
}

fn seed_all(app: &mut App) {
    seed(
        app,
        "visits_count",
        &prev_month_period(),
        &visits_page(&[&["20240201", "30", "120"]]),
    );
    seed(
        app,
        "visits_by_visitor_type",
        &Period::Today,
        &visitor_type_page(&[&["New Visitor", "70"], &["Returning Visitor", "50"]]),
    );
    seed(app, "sessions_by_hour", &Period::Today, &hourly_page("42"));
}

#[test]
fn widgets_publish_their_events_in_order() {
    let mut test_app = setup_app(BTreeMap::new());
    seed_all(&mut test_app.app);

    let bus = RecordingBus::default();
    test_app.app.refresh_widgets(&bus).expect("widgets");

    let events = bus.events.borrow();
    let names: Vec<&str> = events.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "ga_new_users_prev_month",
            "ga_today_sessions",
            "ga_sessions_today_graph",
        ]
    );

    assert_eq!(events[0].1["value"], json!(25.0));
    assert_eq!(events[1].1["current"], json!(120.0));
    assert_eq!(events[1].1["last"], json!(0.0));

    let points = events[2].1["points"].as_array().expect("points");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0]["y"], json!(42.0));
}

#[test]
fn sessions_today_reports_the_previous_cycle_as_delta_baseline() {
    let mut test_app = setup_app(BTreeMap::new());
    seed_all(&mut test_app.app);

    let bus = RecordingBus::default();
    test_app.app.refresh_widgets(&bus).expect("first refresh");

    seed(
        &mut test_app.app,
        "visits_by_visitor_type",
        &Period::Today,
        &visitor_type_page(&[&["New Visitor", "80"], &["Returning Visitor", "50"]]),
    );
    test_app.app.refresh_widgets(&bus).expect("second refresh");

    let events = bus.events.borrow();
    let sessions: Vec<&serde_json::Value> = events
        .iter()
        .filter(|(name, _)| name == "ga_today_sessions")
        .map(|(_, payload)| payload)
        .collect();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["current"], json!(120.0));
    assert_eq!(sessions[0]["last"], json!(0.0));
    assert_eq!(sessions[1]["current"], json!(130.0));
    assert_eq!(sessions[1]["last"], json!(120.0));
}

#[test]
fn missing_periods_publish_null_values_rather_than_failing() {
    let mut test_app = setup_app(BTreeMap::new());
    // Tables exist but hold no rows for the queried periods.
    seed(
        &mut test_app.app,
        "visits_count",
        &prev_month_period(),
        &visits_page(&[]),
    );
    seed(
        &mut test_app.app,
        "visits_by_visitor_type",
        &Period::Today,
        &visitor_type_page(&[]),
    );
    let mut empty_hours = hourly_page("42");
    empty_hours.rows.clear();
    seed(
        &mut test_app.app,
        "sessions_by_hour",
        &Period::Today,
        &empty_hours,
    );

    let bus = RecordingBus::default();
    test_app.app.refresh_widgets(&bus).expect("widgets");

    let events = bus.events.borrow();
    assert_eq!(events[0].1["value"], json!(null));
    assert_eq!(events[1].1["current"], json!(0.0));
    assert!(events[2].1["points"].as_array().expect("points").is_empty());
}
