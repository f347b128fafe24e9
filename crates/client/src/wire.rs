use serde::Deserialize;

use pulse_core::{ColumnRole, ReportColumn, ReportDataType, ReportPage};

use crate::error::{ClientError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReport {
    #[serde(default)]
    column_headers: Vec<WireColumn>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
    #[serde(default = "default_items_per_page")]
    items_per_page: u32,
    #[serde(default)]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireColumn {
    name: String,
    column_type: String,
    data_type: String,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    code: i64,
    message: String,
}

fn default_items_per_page() -> u32 {
    1000
}

/// The endpoint reports failure inside the body rather than through the
/// transport, so the error object is checked before anything else.
pub(crate) fn parse_report_body(body: serde_json::Value) -> Result<ReportPage> {
    if let Some(error) = body.get("error") {
        let error: WireErrorBody = serde_json::from_value(error.clone())?;
        return Err(ClientError::Api {
            code: error.code,
            message: error.message,
        });
    }
    let report: WireReport = serde_json::from_value(body)?;
    Ok(ReportPage {
        columns: report
            .column_headers
            .into_iter()
            .map(|column| ReportColumn {
                name: column.name,
                role: ColumnRole::from_wire(&column.column_type),
                data_type: ReportDataType::from_wire(&column.data_type),
            })
            .collect(),
        rows: report.rows,
        items_per_page: report.items_per_page,
        has_more: report.next_link.is_some(),
    })
}
