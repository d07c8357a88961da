//! Per-candidate metadata a completion source attaches to its results
//! (spec §3).

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateMeta {
    pub source_name: String,
    /// When set, promoting replaces this prefix of the buffer instead of
    /// appending the candidate.
    pub replace_prompt: Option<String>,
    /// Promoting this candidate should immediately submit the command.
    pub exec_on_prom: bool,
    /// Strip leading whitespace from the candidate before promoting.
    pub trim_promotion: bool,
    /// Collapse internal whitespace runs before promoting.
    pub reduce_spaces: bool,
}
