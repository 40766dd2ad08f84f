use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use thiserror::Error;

use super::model::{Dataset, PlanetRecord};
use crate::config::ArchiveSettings;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A fetch that produced no usable dataset.
///
/// The caller keeps whatever dataset it already had; a manual refresh is the
/// retry mechanism.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("exoplanet data unavailable: {cause}")]
    DataUnavailable { cause: String },
}

impl ArchiveError {
    fn unavailable(cause: impl Into<String>) -> Self {
        ArchiveError::DataUnavailable {
            cause: cause.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Columns and query
// ---------------------------------------------------------------------------

/// Columns of the archive's `ps` (Planetary Systems) table that we read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveColumn {
    Identifier,
    DiscoveryYear,
    DiscoveryMethod,
    OrbitalDistance,
    PlanetRadius,
    StarTemperature,
    HostName,
    PlanetMass,
    SystemDistance,
    StarRadius,
}

impl ArchiveColumn {
    /// Always selected: the normalized schema needs them.
    pub const REQUIRED: [ArchiveColumn; 6] = [
        ArchiveColumn::Identifier,
        ArchiveColumn::DiscoveryYear,
        ArchiveColumn::DiscoveryMethod,
        ArchiveColumn::OrbitalDistance,
        ArchiveColumn::PlanetRadius,
        ArchiveColumn::StarTemperature,
    ];

    /// Selected on request; all of them by default.
    pub const OPTIONAL: [ArchiveColumn; 4] = [
        ArchiveColumn::HostName,
        ArchiveColumn::PlanetMass,
        ArchiveColumn::SystemDistance,
        ArchiveColumn::StarRadius,
    ];

    /// Archive column name.
    pub fn name(self) -> &'static str {
        match self {
            ArchiveColumn::Identifier => "pl_name",
            ArchiveColumn::DiscoveryYear => "disc_year",
            ArchiveColumn::DiscoveryMethod => "discoverymethod",
            ArchiveColumn::OrbitalDistance => "pl_orbsmax",
            ArchiveColumn::PlanetRadius => "pl_rade",
            ArchiveColumn::StarTemperature => "st_teff",
            ArchiveColumn::HostName => "hostname",
            ArchiveColumn::PlanetMass => "pl_masse",
            ArchiveColumn::SystemDistance => "sy_dist",
            ArchiveColumn::StarRadius => "st_rad",
        }
    }
}

/// An ADQL query against the confirmed-planets table.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveQuery {
    table: &'static str,
    columns: Vec<ArchiveColumn>,
    conditions: Vec<String>,
}

impl ArchiveQuery {
    /// Default-parameter-set rows of `ps` with a known discovery year.
    ///
    /// `extra` picks optional columns; `None` selects all of them.
    /// `default_flag = 1` keeps one row per planet even when the archive
    /// holds several published solutions.
    pub fn confirmed_planets(extra: Option<&[ArchiveColumn]>) -> Self {
        let mut columns = ArchiveColumn::REQUIRED.to_vec();
        for col in extra.unwrap_or(&ArchiveColumn::OPTIONAL) {
            if !columns.contains(col) {
                columns.push(*col);
            }
        }
        ArchiveQuery {
            table: "ps",
            columns,
            conditions: vec![
                "default_flag = 1".to_string(),
                "disc_year IS NOT NULL".to_string(),
            ],
        }
    }

    /// Append an ADQL condition, joined with `AND`.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn columns(&self) -> &[ArchiveColumn] {
        &self.columns
    }

    pub fn to_adql(&self) -> String {
        let cols: Vec<&str> = self.columns.iter().map(|c| c.name()).collect();
        let mut adql = format!("SELECT {} FROM {}", cols.join(", "), self.table);
        if !self.conditions.is_empty() {
            adql.push_str(" WHERE ");
            adql.push_str(&self.conditions.join(" AND "));
        }
        adql
    }

    /// TAP sync request parameters.
    fn params(&self) -> [(&'static str, String); 4] {
        [
            ("REQUEST", "doQuery".to_string()),
            ("LANG", "ADQL".to_string()),
            ("FORMAT", "csv".to_string()),
            ("QUERY", self.to_adql()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Counts gathered while normalizing a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeReport {
    pub rows_read: usize,
    pub malformed: usize,
    pub duplicates: usize,
}

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub dataset: Dataset,
    pub report: NormalizeReport,
}

/// Cause text for a request that never produced a response.
fn transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else {
        format!("network error: {e}")
    }
}

/// Blocking client for the archive's TAP sync endpoint.
///
/// Holds no data: every fetch goes to the network.
#[derive(Clone)]
pub struct ArchiveClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    max_url_len: usize,
}

impl ArchiveClient {
    pub fn new(settings: &ArchiveSettings) -> Result<Self, ArchiveError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("exoplanet-explorer/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ArchiveError::unavailable(format!("cannot create HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: settings.url.clone(),
            max_url_len: settings.max_url_len,
        })
    }

    /// Fetch a fresh snapshot of confirmed planets.
    pub fn fetch_dataset(
        &self,
        columns: Option<&[ArchiveColumn]>,
    ) -> Result<FetchOutcome, ArchiveError> {
        self.run_query(&ArchiveQuery::confirmed_planets(columns))
    }

    /// Issue one request for `query` and normalize the CSV response.
    pub fn run_query(&self, query: &ArchiveQuery) -> Result<FetchOutcome, ArchiveError> {
        let params = query.params();
        log::debug!("Archive query: {}", params[3].1);

        let get = self
            .http
            .get(&self.endpoint)
            .query(&params)
            .build()
            .map_err(|e| ArchiveError::unavailable(format!("invalid request: {e}")))?;

        let request = if get.url().as_str().len() > self.max_url_len {
            log::debug!("Query URL exceeds {} bytes, using POST", self.max_url_len);
            self.http
                .post(&self.endpoint)
                .form(&params)
                .build()
                .map_err(|e| ArchiveError::unavailable(format!("invalid request: {e}")))?
        } else {
            get
        };

        log::info!("Fetching exoplanets from {}", self.endpoint);
        let response = self
            .http
            .execute(request)
            .map_err(|e| ArchiveError::unavailable(transport_error(&e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(ArchiveError::unavailable(format!(
                "archive returned HTTP {}: {}",
                status.as_u16(),
                snippet.trim()
            )));
        }

        let body = response
            .text()
            .map_err(|e| ArchiveError::unavailable(format!("reading response body: {e}")))?;

        let outcome = normalize_csv(&body)?;
        log::info!(
            "Fetched {} planets ({} rows read, {} malformed, {} duplicates)",
            outcome.dataset.len(),
            outcome.report.rows_read,
            outcome.report.malformed,
            outcome.report.duplicates
        );
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Cell values the archive uses for "no value".
const SENTINELS: [&str; 6] = ["", "null", "NULL", "NaN", "nan", "--"];

/// One CSV row as text. Optional columns may be absent from the header.
#[derive(Debug, Deserialize)]
struct RawRow {
    pl_name: Option<String>,
    disc_year: Option<String>,
    discoverymethod: Option<String>,
    pl_orbsmax: Option<String>,
    pl_rade: Option<String>,
    st_teff: Option<String>,
    hostname: Option<String>,
    pl_masse: Option<String>,
    sy_dist: Option<String>,
    st_rad: Option<String>,
}

impl RawRow {
    fn into_record(self) -> Result<PlanetRecord, String> {
        let identifier = present(self.pl_name).ok_or("missing pl_name")?;
        let discovery_method = present(self.discoverymethod).ok_or("missing discoverymethod")?;
        let discovery_year = parse_year(present(self.disc_year))?;

        Ok(PlanetRecord {
            identifier,
            discovery_year,
            discovery_method,
            orbital_distance_au: measurement(self.pl_orbsmax, "pl_orbsmax")?,
            planet_radius_earth: measurement(self.pl_rade, "pl_rade")?,
            host_star_temperature_k: measurement(self.st_teff, "st_teff")?,
            host_name: present(self.hostname),
            planet_mass_earth: measurement(self.pl_masse, "pl_masse")?,
            system_distance_pc: measurement(self.sy_dist, "sy_dist")?,
            star_radius_solar: measurement(self.st_rad, "st_rad")?,
        })
    }
}

/// Trimmed value, or `None` for a sentinel.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !SENTINELS.contains(&v.as_str()))
}

fn parse_year(value: Option<String>) -> Result<i32, String> {
    let text = value.ok_or("missing disc_year")?;
    if let Ok(year) = text.parse::<i32>() {
        return Ok(year);
    }
    match text.parse::<f64>() {
        Ok(y) if y.fract() == 0.0 && y >= i32::MIN as f64 && y <= i32::MAX as f64 => Ok(y as i32),
        _ => Err(format!("disc_year '{text}' is not an integer")),
    }
}

/// A strictly positive finite measurement, `None` when unknown.
fn measurement(value: Option<String>, column: &str) -> Result<Option<f64>, String> {
    let Some(text) = present(value) else {
        return Ok(None);
    };
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(Some(v)),
        Ok(v) => Err(format!("{column} value {v} is not a positive measurement")),
        Err(_) => Err(format!("{column} value '{text}' is not a number")),
    }
}

/// Turn an archive CSV body into a [`Dataset`].
///
/// Malformed rows are skipped and counted. Fails when required header
/// columns are missing or no valid row remains.
pub fn normalize_csv(body: &str) -> Result<FetchOutcome, ArchiveError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ArchiveError::unavailable(format!("malformed response: {e}")))?
        .clone();
    for col in ArchiveColumn::REQUIRED {
        if !headers.iter().any(|h| h == col.name()) {
            return Err(ArchiveError::unavailable(format!(
                "malformed response: missing column '{}'",
                col.name()
            )));
        }
    }

    let mut report = NormalizeReport::default();
    let mut records = Vec::new();

    for (row_no, result) in reader.deserialize::<RawRow>().enumerate() {
        report.rows_read += 1;
        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(RawRow::into_record);
        match parsed {
            Ok(rec) => records.push(rec),
            Err(reason) => {
                log::debug!("Skipping row {row_no}: {reason}");
                report.malformed += 1;
            }
        }
    }

    let (dataset, duplicates) = Dataset::from_records(records);
    report.duplicates = duplicates;

    if report.malformed > 0 {
        log::warn!("Skipped {} malformed rows", report.malformed);
    }
    if duplicates > 0 {
        log::warn!("Dropped {duplicates} duplicate planets");
    }
    if dataset.is_empty() {
        return Err(ArchiveError::unavailable(
            "archive returned no usable rows",
        ));
    }

    Ok(FetchOutcome { dataset, report })
}
