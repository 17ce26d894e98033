use crate::{JobState, ResultView, Surface, Target};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub name: String,
    pub size_label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressView {
    pub percent: f64,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub job_state: JobState,
    /// The single surface that is visible for `job_state`.
    pub surface: Surface,
    pub file: Option<FileSummary>,
    /// Target options and the Compress button.
    pub controls_visible: bool,
    pub target: Target,
    pub target_hint: &'static str,
    pub intake_notice: Option<String>,
    pub progress: ProgressView,
    pub result: Option<ResultView>,
    pub error: Option<String>,
    pub download_status: Option<String>,
    pub dirty: bool,
}
