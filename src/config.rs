/// Settings for a single walk.
///
/// The default runs the walk on rayon's global thread pool. Setting
/// `num_threads` or `thread_name` runs it on a dedicated pool built for that
/// walk.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct WalkConfig {
    /// Worker count of a dedicated pool. `None` lets rayon pick it, or uses the
    /// global pool when `thread_name` is unset too.
    pub num_threads: Option<usize>,
    /// Name prefix for dedicated pool threads (`"<prefix>-<index>"`).
    pub thread_name: Option<String>,
}

impl WalkConfig {
    /// Configuration using rayon's global pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run walks on a dedicated pool with `num_threads` workers.
    ///
    /// Zero lets rayon pick the worker count.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Name dedicated pool threads `"<prefix>-<index>"`.
    ///
    /// Global pool threads cannot be renamed, so this alone is enough to get a
    /// dedicated pool sized by rayon.
    pub fn with_thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = Some(prefix.into());
        self
    }

    #[cfg(not(feature = "loom"))]
    pub(crate) fn build_pool(&self) -> Result<Option<rayon::ThreadPool>, rayon::ThreadPoolBuildError> {
        if self.num_threads.is_none() && self.thread_name.is_none() {
            return Ok(None);
        }
        let mut builder =
            rayon::ThreadPoolBuilder::new().num_threads(self.num_threads.unwrap_or_default());
        if let Some(prefix) = self.thread_name.clone() {
            builder = builder.thread_name(move |idx| format!("{prefix}-{idx}"));
        }
        builder.build().map(Some)
    }
}
