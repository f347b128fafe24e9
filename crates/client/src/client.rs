use chrono::NaiveDate;
use tracing::debug;

use pulse_core::{MetricSpec, ReportPage};

use crate::auth::{self, ServiceAccountKey};
use crate::discovery;
use crate::error::{HandlerError, Result};
use crate::pagination::{self, PageCursor};
use crate::wire;

/// Transport failures are retried this many times before surfacing.
const TRANSPORT_RETRIES: u32 = 5;

/// One report query: an inclusive date window plus the metric set to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub metrics: Vec<String>,
    pub dimensions: Vec<String>,
    pub sort: Vec<String>,
}

impl ReportQuery {
    pub fn from_spec(spec: &MetricSpec, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            metrics: spec.metric.clone(),
            dimensions: spec.dimension.clone(),
            sort: spec.sort.clone(),
        }
    }
}

/// Anything that can stream report pages for a query. The production
/// implementation is [`ReportClient`]; orchestration tests substitute fakes.
pub trait ReportSource {
    fn for_each_page(
        &self,
        query: &ReportQuery,
        handler: &mut dyn FnMut(&ReportPage) -> std::result::Result<(), HandlerError>,
    ) -> Result<()>;
}

/// Client for the remote reporting endpoint. Authenticates once at
/// construction and holds the bearer token for its lifetime.
pub struct ReportClient {
    http: reqwest::blocking::Client,
    token: String,
    profile_id: u64,
    endpoint: String,
}

impl ReportClient {
    pub fn new(
        key: &ServiceAccountKey,
        profile_id: u64,
        application: Option<&str>,
    ) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(application) = application {
            builder = builder.user_agent(application.to_string());
        }
        let http = builder.build()?;
        let token = auth::fetch_access_token(&http, key)?;
        let doc = discovery::load(&http, &discovery::cache_path(discovery::API_VERSION))?;
        Ok(Self {
            http,
            token,
            profile_id,
            endpoint: doc.report_endpoint(),
        })
    }

    fn fetch_page(&self, query: &ReportQuery, cursor: Option<PageCursor>) -> Result<ReportPage> {
        let mut params: Vec<(&str, String)> = vec![
            ("ids", format!("ga:{}", self.profile_id)),
            ("start-date", query.start_date.format("%Y-%m-%d").to_string()),
            ("end-date", query.end_date.format("%Y-%m-%d").to_string()),
            ("metrics", query.metrics.join(",")),
        ];
        if !query.dimensions.is_empty() {
            params.push(("dimensions", query.dimensions.join(",")));
        }
        if !query.sort.is_empty() {
            params.push(("sort", query.sort.join(",")));
        }
        if let Some(cursor) = cursor {
            params.push(("start-index", cursor.start_index.to_string()));
            params.push(("max-results", cursor.max_results.to_string()));
        }
        let body = self.execute(&params)?;
        wire::parse_report_body(body)
    }

    fn execute(&self, params: &[(&str, String)]) -> Result<serde_json::Value> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = self
                .http
                .get(&self.endpoint)
                .bearer_auth(&self.token)
                .query(params)
                .send();
            match result {
                Ok(response) => return Ok(response.json()?),
                Err(err) if attempt < TRANSPORT_RETRIES => {
                    debug!(attempt, "transport error, retrying: {err}");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl ReportSource for ReportClient {
    fn for_each_page(
        &self,
        query: &ReportQuery,
        handler: &mut dyn FnMut(&ReportPage) -> std::result::Result<(), HandlerError>,
    ) -> Result<()> {
        pagination::paginate(|cursor| self.fetch_page(query, cursor), handler)
    }
}
