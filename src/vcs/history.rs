//! History listing and diffs for the commit browser.

use super::{CommitRecord, Git, GitError};

/// One page of commits plus the total page count.
#[derive(Debug, Clone, Default)]
pub struct HistoryPage {
    pub records: Vec<CommitRecord>,
    pub total_pages: usize,
}

/// Answers history requests against the docroot repository.
///
/// Nothing is cached; every call runs git afresh.
#[derive(Debug, Clone)]
pub struct HistoryExtractor {
    git: Git,
}

impl HistoryExtractor {
    pub fn new(git: Git) -> Self {
        Self { git }
    }

    /// `limit` commits after skipping `skip`, newest first.
    ///
    /// The page count rounds `count / limit` to nearest, so a short last
    /// page below half a page is not counted.
    pub fn get_history(&self, limit: usize, skip: usize) -> Result<HistoryPage, GitError> {
        if limit == 0 {
            return Err(GitError::InvalidPageSize);
        }
        let count = self.git.commit_count()?;
        let records = self.git.log(limit, skip)?;
        let total_pages = round_half_away(count as f64 / limit as f64).max(0) as usize;
        Ok(HistoryPage {
            records,
            total_pages,
        })
    }

    pub fn get_diff(&self, first: &str, second: &str) -> Result<String, GitError> {
        self.git.diff(first, second)
    }
}

/// Round to nearest with halves away from zero, except that the whole
/// interval `[-0.5, 0.5]` maps to 0.
pub fn round_half_away(f: f64) -> i64 {
    if f < -0.5 {
        (f - 0.5) as i64
    } else if f > 0.5 {
        (f + 0.5) as i64
    } else {
        0
    }
}
