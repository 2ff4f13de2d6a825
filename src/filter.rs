use crate::types::Job;

/// Return the keywords found as case-insensitive substrings of `text`, in the
/// order they appear in the configured list. Empty keywords are ignored.
///
/// Matching is plain substring, not word-boundary: a short keyword can match
/// inside an unrelated word. That is the intended behavior.
pub fn matches_keywords(text: &str, keywords: &[String]) -> Vec<String> {
    let haystack = text.to_lowercase();
    keywords
        .iter()
        .filter(|kw| {
            let kw = kw.trim().to_lowercase();
            !kw.is_empty() && haystack.contains(&kw)
        })
        .cloned()
        .collect()
}

/// Run the matcher over every job's searchable text (title + company + notes)
/// and keep only the jobs with at least one hit, recording the hits on the
/// record.
pub fn filter_jobs(jobs: Vec<Job>, keywords: &[String]) -> Vec<Job> {
    jobs.into_iter()
        .filter_map(|mut job| {
            let text = format!("{} {} {}", job.title, job.company, job.notes);
            let hits = matches_keywords(&text, keywords);
            if hits.is_empty() {
                None
            } else {
                job.matched_keywords = hits;
                Some(job)
            }
        })
        .collect()
}
