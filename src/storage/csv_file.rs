use std::{
    fs::File,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{error, info};

use crate::crawler::models::{JobListing, CSV_HEADER};
use crate::logging::RunLog;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error saving to CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("cannot finish writing {}: {source}", path.display())]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes the header and one row per listing to `path`, replacing any
/// existing file. Returns the number of data rows written.
pub fn write_listings(path: &Path, listings: &[JobListing]) -> Result<usize, StorageError> {
    let file = File::create(path).map_err(|source| StorageError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    };

    // Header goes out explicitly so an empty run still gets one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(CSV_HEADER).map_err(csv_err)?;

    for listing in listings {
        writer.serialize(listing).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| StorageError::Flush {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), rows = listings.len(), "Listings saved");
    Ok(listings.len())
}

/// Writes the listings, logging any failure to `log` instead of returning it.
/// Returns the number of rows saved, or `None` when nothing was saved.
pub fn save_or_log(log: &RunLog, path: &Path, listings: &[JobListing]) -> Option<usize> {
    log.in_scope(|| match write_listings(path, listings) {
        Ok(rows) => Some(rows),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Error saving to CSV");
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tracing_subscriber::EnvFilter;

    fn listings() -> Vec<JobListing> {
        vec![
            JobListing {
                company_name: "AcmeCorp".into(),
                required_skills: "Python,SQL".into(),
                published_on: "2 days ago".into(),
                more_info: "/job/123".into(),
            },
            JobListing {
                company_name: "Quote\"Co".into(),
                required_skills: "rust".into(),
                published_on: "Posted few days ago".into(),
                more_info: "https://www.timesjobs.com/job-detail/9?a=1&b=2".into(),
            },
        ]
    }

    fn read_back(path: &Path) -> (Vec<String>, Vec<JobListing>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let header = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader.deserialize().collect::<Result<_, _>>().unwrap();
        (header, rows)
    }

    #[test]
    fn round_trips_listings_under_fixed_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.csv");

        let written = write_listings(&path, &listings()).unwrap();

        let (header, rows) = read_back(&path);
        assert_eq!(written, 2);
        assert_eq!(header, CSV_HEADER);
        assert_eq!(rows, listings());
    }

    #[test]
    fn rewriting_overwrites_instead_of_appending() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.csv");

        write_listings(&path, &listings()).unwrap();
        write_listings(&path, &listings()).unwrap();

        let (_, rows) = read_back(&path);
        assert_eq!(rows.len(), 2);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("Company Name").count(), 1);
    }

    #[test]
    fn empty_run_still_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        assert_eq!(write_listings(&path, &[]).unwrap(), 0);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim_end(), "Company Name,Required Skills,Published on,More Info");
    }

    #[test]
    fn unwritable_destination_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("jobs.csv");

        let err = write_listings(&path, &listings()).unwrap_err();

        assert!(matches!(err, StorageError::Open { .. }));
        assert!(err.to_string().contains("jobs.csv"));
    }

    #[test]
    fn flush_failure_names_the_write_not_the_open() {
        let err = StorageError::Flush {
            path: PathBuf::from("jobs.csv"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let msg = err.to_string();
        assert_eq!(msg, "cannot finish writing jobs.csv: disk full");
        assert!(!msg.contains("cannot open"));
    }

    #[test]
    fn save_failure_is_logged_once_as_error() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("scraping.log");
        let out = dir.path().join("missing").join("jobs.csv");
        let log = RunLog::open(&log_path, EnvFilter::new("info")).unwrap();

        assert_eq!(save_or_log(&log, &out, &listings()), None);

        let contents = std::fs::read_to_string(&log_path).unwrap();
        let errors: Vec<&str> = contents.lines().filter(|l| l.contains(" ERROR ")).collect();
        assert_eq!(errors.len(), 1, "log was: {contents}");
        assert!(errors[0].contains("Error saving to CSV"));
        assert!(errors[0].contains(&out.display().to_string()));
        assert!(errors[0].contains("cannot open"));
    }

    #[test]
    fn successful_save_logs_no_error() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("scraping.log");
        let out = dir.path().join("jobs.csv");
        let log = RunLog::open(&log_path, EnvFilter::new("info")).unwrap();

        assert_eq!(save_or_log(&log, &out, &listings()), Some(2));

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(!contents.contains(" ERROR "));
        assert!(contents.contains("Listings saved"));
    }
}
