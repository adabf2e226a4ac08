use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SubActProgress {
    pub(crate) name: String,
    pub(crate) short: String,
    pub(crate) length: u64,
    pub(crate) progress: f64,
    pub(crate) complete: bool,
    pub(crate) label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ActProgress {
    pub(crate) name: String,
    pub(crate) short: String,
    pub(crate) length: u64,
    pub(crate) progress: f64,
    pub(crate) complete: bool,
    pub(crate) label: String,
    /// Width of this act's segment in the stacked overall bar.
    pub(crate) share: f64,
    /// Abbreviation once the act is complete, otherwise the percentage label.
    pub(crate) bar_label: String,
    pub(crate) sub: Vec<SubActProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ProgressReport {
    pub(crate) page: i64,
    pub(crate) total_length: u64,
    pub(crate) overall: f64,
    pub(crate) acts: Vec<ActProgress>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressResponse<'a> {
    pub(crate) generated_at: String,
    pub(crate) source: String,
    #[serde(flatten)]
    pub(crate) report: &'a ProgressReport,
}

#[derive(Debug, Serialize)]
pub(crate) struct TableSummary {
    pub(crate) acts: usize,
    pub(crate) sub_acts: usize,
    pub(crate) total_length: u64,
}
