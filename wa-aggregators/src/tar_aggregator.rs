//! In-memory tar batcher (spec §4.5): accumulates named byte records into a
//! single tar archive, one mutex-guarded buffer per instance.

use std::io::Cursor;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::AggregatorError;

const DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";

fn make_filename(
    sensor_name: &str,
    from_time: DateTime<Utc>,
    to_time: DateTime<Utc>,
    extension: &str,
) -> Result<String, AggregatorError> {
    if !extension.starts_with('.') {
        return Err(AggregatorError::InvalidRecord {
            reason: format!("extension must start with '.': {}", extension),
        });
    }
    let from_ts = from_time.format(DATETIME_FORMAT);
    let to_ts = to_time.format(DATETIME_FORMAT);
    let filename = format!("{}_{}_{}{}", from_ts, to_ts, sensor_name, extension);
    if filename.contains(' ') {
        return Err(AggregatorError::InvalidRecord {
            reason: format!("filename must not contain spaces: {}", filename),
        });
    }
    Ok(filename)
}

struct OpenArchive {
    builder: tar::Builder<Vec<u8>>,
    record_count: usize,
}

/// Thread-safe in-memory tar batcher. Reusable after [`TarAggregator::finalize`].
pub struct TarAggregator {
    state: Mutex<Option<OpenArchive>>,
}

impl TarAggregator {
    pub fn new() -> Self {
        Self { state: Mutex::new(None) }
    }

    /// Add `data` to the current tar, creating one if none is open.
    pub fn add_record(
        &self,
        sensor_name: &str,
        from_time: DateTime<Utc>,
        to_time: DateTime<Utc>,
        extension: &str,
        data: &[u8],
    ) -> Result<(), AggregatorError> {
        let filename = make_filename(sensor_name, from_time, to_time, extension)?;

        let mut guard = self.state.lock().unwrap();
        let open = guard.get_or_insert_with(|| OpenArchive {
            builder: tar::Builder::new(Vec::new()),
            record_count: 0,
        });

        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mtime(to_time.timestamp().max(0) as u64);
        header.set_mode(0o644);
        header.set_cksum();
        open.builder
            .append_data(&mut header, &filename, Cursor::new(data))?;
        open.record_count += 1;

        tracing::trace!(sensor_name, filename = %filename, len = data.len(), "tar record added");
        Ok(())
    }

    /// Close the current tar and return its bytes, resetting internal state.
    /// Returns an empty vector if no records were ever added.
    pub fn finalize(&self) -> Result<Vec<u8>, AggregatorError> {
        let mut guard = self.state.lock().unwrap();
        match guard.take() {
            None => Ok(Vec::new()),
            Some(open) => {
                let bytes = open.builder.into_inner()?;
                tracing::debug!(records = open.record_count, bytes = bytes.len(), "tar finalized");
                Ok(bytes)
            }
        }
    }

    /// Current record count of the open archive (0 if none is open).
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().as_ref().map_or(0, |o| o.record_count)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open a completed tar blob read-only, for inspection.
    pub fn read_tarfile_from_bytestring(data: &[u8]) -> tar::Archive<Cursor<Vec<u8>>> {
        tar::Archive::new(Cursor::new(data.to_vec()))
    }
}

impl Default for TarAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn ts(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        chrono::TimeZone::with_ymd_and_hms(&Utc, y, m, d, h, mi, s).unwrap()
    }

    #[test]
    fn empty_aggregator_finalizes_to_empty_bytes() {
        let agg = TarAggregator::new();
        assert_eq!(agg.len(), 0);
        assert_eq!(agg.finalize().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn filename_matches_the_grammar() {
        let agg = TarAggregator::new();
        let from = ts(2024, 1, 2, 3, 4, 5);
        let to = ts(2024, 1, 2, 3, 4, 10);
        agg.add_record("sensor1", from, to, ".bin", b"payload").unwrap();
        assert_eq!(agg.len(), 1);

        let bytes = agg.finalize().unwrap();
        let mut archive = TarAggregator::read_tarfile_from_bytestring(&bytes);
        let mut entries = archive.entries().unwrap();
        let mut entry = entries.next().unwrap().unwrap();
        let path = entry.path().unwrap().to_string_lossy().to_string();
        assert_eq!(path, "20240102030405_20240102030410_sensor1.bin");

        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"payload");
    }

    #[test]
    fn extension_without_dot_is_rejected() {
        let agg = TarAggregator::new();
        let from = ts(2024, 1, 1, 0, 0, 0);
        let result = agg.add_record("sensor1", from, from, "bin", b"x");
        assert!(matches!(result, Err(AggregatorError::InvalidRecord { .. })));
    }

    #[test]
    fn finalize_resets_so_the_aggregator_is_reusable() {
        let agg = TarAggregator::new();
        let from = ts(2024, 1, 1, 0, 0, 0);
        agg.add_record("sensor1", from, from, ".bin", b"first").unwrap();
        let first = agg.finalize().unwrap();
        assert!(!first.is_empty());
        assert_eq!(agg.len(), 0);

        agg.add_record("sensor1", from, from, ".bin", b"second").unwrap();
        let second = agg.finalize().unwrap();
        assert!(!second.is_empty());
        assert_eq!(agg.len(), 0);
    }

    #[test]
    fn multiple_records_are_all_present_after_finalize() {
        let agg = TarAggregator::new();
        let from = ts(2024, 1, 1, 0, 0, 0);
        agg.add_record("a", from, from, ".txt", b"one").unwrap();
        agg.add_record("b", from, from, ".txt", b"two").unwrap();
        assert_eq!(agg.len(), 2);

        let bytes = agg.finalize().unwrap();
        let mut archive = TarAggregator::read_tarfile_from_bytestring(&bytes);
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 2);
    }
}
