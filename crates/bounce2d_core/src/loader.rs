//! CSV entity loading
//!
//! [`parse_reader`] and [`load_file`] parse synchronously. [`CsvLoader`]
//! runs the same parse on a worker thread and hands results back over a
//! channel, so the frame loop never blocks on file IO. The caller applies a
//! finished result in one step, which keeps the entity set either fully old
//! or fully new.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use crate::error::LoadError;
use crate::record::{EntityRecord, LoadReport, RowError, RowPolicy};

/// Parse entity rows from any reader
///
/// The input has no header row. Blank lines and rows whose fields are all
/// empty are skipped without being reported.
pub fn parse_reader<R: Read>(reader: R, policy: RowPolicy) -> Result<LoadReport, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut report = LoadReport::default();

    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        if row.iter().all(str::is_empty) {
            continue;
        }

        let line = row
            .position()
            .map(|pos| pos.line())
            .unwrap_or(index as u64 + 1);
        let fields: Vec<&str> = row.iter().collect();

        match EntityRecord::from_fields(&fields) {
            Ok(record) => report.records.push(record),
            Err(kind) => {
                let err = RowError { line, kind };
                match policy {
                    RowPolicy::Skip => {
                        log::warn!("Skipping {}", err);
                        report.rejected.push(err);
                    }
                    RowPolicy::Strict => return Err(LoadError::InvalidRow(err)),
                }
            }
        }
    }

    Ok(report)
}

/// Parse an entity file from disk
pub fn load_file(path: impl AsRef<Path>, policy: RowPolicy) -> Result<LoadReport, LoadError> {
    let file = File::open(path.as_ref())?;
    parse_reader(io::BufReader::new(file), policy)
}

/// Request to load a file in the background
struct LoadRequest {
    path: PathBuf,
    policy: RowPolicy,
}

/// Result of a background load
#[derive(Debug)]
pub struct LoadResult {
    /// The file that was requested
    pub path: PathBuf,
    /// The parsed rows or error
    pub result: Result<LoadReport, LoadError>,
}

/// Background CSV loader using a dedicated worker thread
///
/// Use [`load_async`](CsvLoader::load_async) to submit a file and
/// [`poll_all`](CsvLoader::poll_all) once per frame to pick up finished loads.
/// The worker runs until the loader is dropped.
///
/// # Example
/// ```ignore
/// let loader = CsvLoader::new();
/// loader.load_async("balls.csv", RowPolicy::Skip);
///
/// // Later, once per frame:
/// for done in loader.poll_all() {
///     match done.result {
///         Ok(report) => state.handle(InputEvent::Loaded(report)),
///         Err(e) => log::warn!("{}: {}", done.path.display(), e),
///     }
/// }
/// ```
pub struct CsvLoader {
    sender: Sender<LoadRequest>,
    receiver: Receiver<LoadResult>,
}

impl CsvLoader {
    /// Create a new loader with a background worker thread
    pub fn new() -> Self {
        let (request_tx, request_rx) = channel::<LoadRequest>();
        let (result_tx, result_rx) = channel::<LoadResult>();

        thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let result = load_file(&request.path, request.policy);
                let load_result = LoadResult {
                    path: request.path,
                    result,
                };
                // Receiver dropped: nobody is listening anymore
                if result_tx.send(load_result).is_err() {
                    break;
                }
            }
        });

        Self {
            sender: request_tx,
            receiver: result_rx,
        }
    }

    /// Queue a file to be parsed on the worker thread
    pub fn load_async(&self, path: impl Into<PathBuf>, policy: RowPolicy) {
        let request = LoadRequest {
            path: path.into(),
            policy,
        };
        if self.sender.send(request).is_err() {
            log::error!("CSV loader worker has exited; load request dropped");
        }
    }

    /// Take every finished load, oldest first (non-blocking)
    pub fn poll_all(&self) -> Vec<LoadResult> {
        self.receiver.try_iter().collect()
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RowErrorKind;
    use std::time::{Duration, Instant};

    fn wait_for(loader: &CsvLoader) -> LoadResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = loader.poll_all().pop() {
                return result;
            }
            assert!(Instant::now() < deadline, "loader did not finish in time");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_parse_reader_basic() {
        let data = "100,50,20,#ff0000,A\n200,80,10,blue,B\n";
        let report = parse_reader(data.as_bytes(), RowPolicy::Skip).unwrap();

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].label, "A");
        assert_eq!(report.records[1].color, "blue");
        assert_eq!(report.rejected_count(), 0);
    }

    #[test]
    fn test_parse_reader_skips_blank_rows() {
        let data = "1,2,3,red,A\n\n,,,,\n4,5,6,red,B\n";
        let report = parse_reader(data.as_bytes(), RowPolicy::Skip).unwrap();

        assert_eq!(report.records.len(), 2);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn test_parse_reader_quoted_label() {
        let data = "1,2,3,red,\"hello, world\"\n";
        let report = parse_reader(data.as_bytes(), RowPolicy::Skip).unwrap();
        assert_eq!(report.records[0].label, "hello, world");
    }

    #[test]
    fn test_skip_policy_reports_bad_rows() {
        let data = "1,2,3,red,A\nx,2,3,red,B\n1,2\n4,5,6,red,C\n";
        let report = parse_reader(data.as_bytes(), RowPolicy::Skip).unwrap();

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.rejected_count(), 2);
        assert_eq!(report.rejected[0].line, 2);
        assert_eq!(report.rejected[1].line, 3);
        assert_eq!(report.rejected[1].kind, RowErrorKind::MissingFields { found: 2 });
    }

    #[test]
    fn test_strict_policy_fails_on_bad_row() {
        let data = "1,2,3,red,A\n1,2,0,red,B\n";
        match parse_reader(data.as_bytes(), RowPolicy::Strict) {
            Err(LoadError::InvalidRow(err)) => {
                assert_eq!(err.line, 2);
                assert_eq!(err.kind, RowErrorKind::NonPositiveRadius(0.0));
            }
            other => panic!("expected InvalidRow, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_file("/nonexistent/path/balls.csv", RowPolicy::Skip);
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_loader_poll_returns_none_when_idle() {
        let loader = CsvLoader::new();
        assert!(loader.poll_all().is_empty());
    }

    #[test]
    fn test_loader_poll_all_keeps_request_order() {
        let loader = CsvLoader::new();
        loader.load_async("/nonexistent/first.csv", RowPolicy::Skip);
        loader.load_async("/nonexistent/second.csv", RowPolicy::Skip);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut results = Vec::new();
        while results.len() < 2 {
            results.extend(loader.poll_all());
            assert!(Instant::now() < deadline, "loader did not finish in time");
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(results[0].path, PathBuf::from("/nonexistent/first.csv"));
        assert_eq!(results[1].path, PathBuf::from("/nonexistent/second.csv"));
    }

    #[test]
    fn test_loader_reports_missing_file() {
        let loader = CsvLoader::new();
        loader.load_async("/nonexistent/path/balls.csv", RowPolicy::Skip);

        let result = wait_for(&loader);
        assert_eq!(result.path, PathBuf::from("/nonexistent/path/balls.csv"));
        assert!(result.result.is_err());
    }

    #[test]
    fn test_loader_reads_file() {
        let path = std::env::temp_dir().join(format!("bounce2d_loader_{}.csv", std::process::id()));
        std::fs::write(&path, "10,20,5,green,G\n").unwrap();

        let loader = CsvLoader::default();
        loader.load_async(&path, RowPolicy::Skip);
        let result = wait_for(&loader);
        std::fs::remove_file(&path).ok();

        let report = result.result.unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].label, "G");
    }
}
