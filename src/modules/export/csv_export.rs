//! CSV Export
//!
//! Writes the job list to a CSV file.

use std::path::Path;

use crate::domain::JobPosting;

/// Write jobs to CSV file
pub fn write_jobs(path: &Path, jobs: &[JobPosting]) -> Result<usize, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "id",
        "title",
        "company",
        "salary",
        "area",
        "experience",
        "education",
        "description",
    ])?;

    for job in jobs {
        wtr.write_record([
            job.id.map(|id| id.to_string()).unwrap_or_default(),
            job.display_title().to_string(),
            job.display_company().to_string(),
            job.salary().unwrap_or_default().to_string(),
            job.area().unwrap_or_default().to_string(),
            job.experience().unwrap_or_default().to_string(),
            job.education().unwrap_or_default().to_string(),
            job.description.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(jobs.len())
}
