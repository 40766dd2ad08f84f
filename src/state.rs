use crate::color::ColorMap;
use crate::config::Config;
use crate::data::archive::{ArchiveClient, ArchiveError, FetchOutcome, NormalizeReport};
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::model::{Dataset, PlanetRecord};
use crate::data::stats::{habitable_candidates, SummaryStats};
use crate::jobs::{Job, JobStatus};
use crate::summary::{build_prompt, SummaryClient, SummaryError};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Which records the AI summary describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryTarget {
    #[default]
    AllFiltered,
    HabitableOnly,
}

impl SummaryTarget {
    pub fn label(self) -> &'static str {
        match self {
            SummaryTarget::AllFiltered => "All filtered results",
            SummaryTarget::HabitableOnly => "Habitable zone candidates only",
        }
    }
}

/// What the summary section shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SummaryState {
    #[default]
    Idle,
    Ready(String),
    /// Non-blocking notice shown instead of the summary.
    Unavailable(String),
}

/// The whole session, independent of rendering.
///
/// The dataset is replaced only by a successful fetch and never edited;
/// every criteria change recomputes `visible_indices` from it.
pub struct AppState {
    pub config: Config,

    /// Active dataset (None until the first successful fetch).
    pub dataset: Option<Dataset>,

    /// Counts from the fetch that produced `dataset`.
    pub report: Option<NormalizeReport>,

    pub criteria: FilterCriteria,

    /// Indices of records passing the current criteria (cached).
    pub visible_indices: Vec<usize>,

    /// Colour per discovery method.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    pub summary: SummaryState,
    pub summary_target: SummaryTarget,

    fetch_job: Option<Job<Result<FetchOutcome, ArchiveError>>>,
    summary_job: Option<Job<Result<String, SummaryError>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dataset: None,
            report: None,
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
            color_map: None,
            status_message: None,
            summary: SummaryState::Idle,
            summary_target: SummaryTarget::default(),
            fetch_job: None,
            summary_job: None,
        }
    }

    /// Whether a fetch is in flight.
    pub fn loading(&self) -> bool {
        self.fetch_job.is_some()
    }

    /// Whether a summary request is in flight.
    pub fn summarizing(&self) -> bool {
        self.summary_job.is_some()
    }

    /// Start a fetch unless one is already running. Returns whether a fetch
    /// was started.
    pub fn request_refresh(&mut self) -> bool {
        if self.fetch_job.is_some() {
            return false;
        }
        let settings = self.config.archive.clone();
        self.fetch_job = Some(Job::spawn("archive-fetch", move || {
            ArchiveClient::new(&settings).and_then(|client| client.fetch_dataset(None))
        }));
        true
    }

    /// Collect finished background work. Returns `true` if anything changed.
    pub fn poll_jobs(&mut self) -> bool {
        let mut changed = false;

        if let Some(job) = &self.fetch_job {
            match job.poll() {
                JobStatus::Pending => {}
                JobStatus::Done(Ok(outcome)) => {
                    self.fetch_job = None;
                    self.set_dataset(outcome);
                    changed = true;
                }
                JobStatus::Done(Err(e)) => {
                    self.fetch_job = None;
                    log::error!("Fetch failed: {e}");
                    self.status_message = Some(self.fetch_failure_message(&e.to_string()));
                    changed = true;
                }
                JobStatus::Lost => {
                    self.fetch_job = None;
                    log::error!("Fetch worker stopped without a result");
                    self.status_message =
                        Some(self.fetch_failure_message("fetch stopped unexpectedly"));
                    changed = true;
                }
            }
        }

        if let Some(job) = &self.summary_job {
            match job.poll() {
                JobStatus::Pending => {}
                JobStatus::Done(Ok(text)) => {
                    self.summary_job = None;
                    log::info!("Summary received ({} chars)", text.len());
                    self.summary = SummaryState::Ready(text);
                    changed = true;
                }
                JobStatus::Done(Err(e)) => {
                    self.summary_job = None;
                    log::error!("{e}");
                    self.summary = SummaryState::Unavailable(e.to_string());
                    changed = true;
                }
                JobStatus::Lost => {
                    self.summary_job = None;
                    self.summary = SummaryState::Unavailable(
                        "AI summary unavailable: request stopped unexpectedly".to_string(),
                    );
                    changed = true;
                }
            }
        }

        changed
    }

    fn fetch_failure_message(&self, cause: &str) -> String {
        if self.dataset.is_some() {
            format!("Error: {cause} (showing previously loaded data)")
        } else {
            format!("Error: {cause}")
        }
    }

    /// Install a freshly fetched dataset and reset the criteria to cover it.
    pub fn set_dataset(&mut self, outcome: FetchOutcome) {
        let FetchOutcome { dataset, report } = outcome;

        self.criteria = FilterCriteria::for_dataset(&dataset);
        self.color_map = Some(ColorMap::new(&dataset.methods));
        self.dataset = Some(dataset);
        self.report = Some(report);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` after a criteria change.
    ///
    /// A summary describes one view, so any shown or pending summary is
    /// dropped. A worker still running sends into a closed channel.
    pub fn refilter(&mut self) {
        self.visible_indices = match &self.dataset {
            Some(ds) => filtered_indices(ds, &self.criteria),
            None => Vec::new(),
        };
        self.summary_job = None;
        self.summary = SummaryState::Idle;
    }

    /// Records of the current view, in dataset order.
    pub fn visible_records(&self) -> Vec<&PlanetRecord> {
        match &self.dataset {
            Some(ds) => self
                .visible_indices
                .iter()
                .filter_map(|&i| ds.records().get(i))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether `method` is currently shown. An empty selection shows all.
    pub fn method_selected(&self, method: &str) -> bool {
        self.criteria.discovery_methods.is_empty()
            || self.criteria.discovery_methods.contains(method)
    }

    /// Whether the method checkboxes can change the view. A dataset with a
    /// single method has nothing else to select.
    pub fn methods_toggleable(&self) -> bool {
        self.dataset.as_ref().is_some_and(|ds| ds.methods.len() > 1)
    }

    /// Toggle a single discovery method.
    ///
    /// Starting from "all", unchecking one method selects every other one.
    /// A selection covering every method, or none, collapses to "all".
    pub fn toggle_method(&mut self, method: &str) {
        if !self.methods_toggleable() {
            return;
        }
        let Some(ds) = &self.dataset else {
            return;
        };
        let selected = &mut self.criteria.discovery_methods;

        if selected.is_empty() {
            *selected = ds.methods.iter().filter(|m| *m != method).cloned().collect();
        } else if !selected.remove(method) {
            selected.insert(method.to_string());
        }
        if selected.len() == ds.methods.len() {
            selected.clear();
        }
        self.refilter();
    }

    /// Clear the method selection (show all methods).
    pub fn select_all_methods(&mut self) {
        self.criteria.discovery_methods.clear();
        self.refilter();
    }

    /// Restore the criteria a fresh fetch starts with.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = FilterCriteria::for_dataset(ds);
            self.refilter();
        }
    }

    /// Start a summary request for the current view unless one is running.
    pub fn request_summary(&mut self) -> bool {
        if self.summary_job.is_some() || self.dataset.is_none() {
            return false;
        }

        let prompt = self.summary_prompt();
        let settings = self.config.summary.clone();
        self.summary_job = Some(Job::spawn("ai-summary", move || {
            SummaryClient::new(&settings).and_then(|client| client.summarize(&prompt))
        }));
        true
    }

    /// Prompt describing the current view and summary target.
    pub fn summary_prompt(&self) -> String {
        let visible = self.visible_records();
        let habitable = habitable_candidates(&visible);
        let target = match self.summary_target {
            SummaryTarget::AllFiltered => &visible,
            SummaryTarget::HabitableOnly => &habitable,
        };

        let stats = SummaryStats::compute(target, &self.criteria, habitable.len());
        let samples: Vec<&PlanetRecord> = target
            .iter()
            .copied()
            .take(self.config.summary.sample_records)
            .collect();
        build_prompt(&stats, &self.criteria, &samples)
    }
}
