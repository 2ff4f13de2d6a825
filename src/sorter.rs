use std::cmp::Reverse;

use crate::types::Job;

/// Sort matched jobs newest-first and keep at most `max_total`.
///
/// Ordering is descending by the `(posted, title)` pair using plain string
/// comparison; `posted` is a source-formatted prefix, not a parsed date. The
/// sort is stable, so jobs with identical pairs keep their input order.
pub fn rank(mut jobs: Vec<Job>, max_total: usize) -> Vec<Job> {
    jobs.sort_by_key(|job| Reverse((job.posted.clone(), job.title.clone())));
    jobs.truncate(max_total);
    jobs
}
