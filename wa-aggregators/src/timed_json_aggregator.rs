//! Time-windowed JSON batcher (spec §4.6): buffers JSON records in memory
//! and periodically flushes them to a [`TarAggregator`] as one `.json` file.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::AggregatorError;
use crate::tar_aggregator::TarAggregator;

struct OpenWindow {
    records: Vec<Value>,
    started_at: DateTime<Utc>,
}

/// Accumulates JSON records for up to `max_duration_s` seconds before
/// flushing them, serialised as one record list, to the underlying
/// [`TarAggregator`].
pub struct TimedJsonAggregator {
    max_duration_s: i64,
    tar_aggregator: Arc<TarAggregator>,
    sensor_name: String,
    window: Mutex<Option<OpenWindow>>,
}

impl TimedJsonAggregator {
    /// `max_duration_s` must be strictly positive.
    pub fn new(max_duration_s: i64, tar_aggregator: Arc<TarAggregator>, sensor_name: impl Into<String>) -> Self {
        assert!(max_duration_s > 0, "max_duration_s must be positive: {}", max_duration_s);
        Self {
            max_duration_s,
            tar_aggregator,
            sensor_name: sensor_name.into(),
            window: Mutex::new(None),
        }
    }

    fn flush_locked(&self, window: OpenWindow, now: DateTime<Utc>) -> Result<(), AggregatorError> {
        let dataset_bytes = serde_json::to_vec(&window.records)
            .map_err(|e| AggregatorError::InvalidRecord { reason: e.to_string() })?;
        self.tar_aggregator.add_record(
            &self.sensor_name,
            window.started_at,
            now,
            ".json",
            &dataset_bytes,
        )?;
        tracing::debug!(sensor_name = %self.sensor_name, records = window.records.len(), "json window flushed");
        Ok(())
    }

    /// Flush the current window if it's aged past `max_duration_s`, then
    /// append `record` to the (possibly fresh) window.
    pub fn add_data(&self, record: Value) -> Result<(), AggregatorError> {
        self.add_data_at(record, Utc::now())
    }

    /// Force the flushing of the current window (e.g. on shutdown).
    pub fn finalize_dataset(&self) -> Result<(), AggregatorError> {
        self.finalize_dataset_at(Utc::now())
    }

    fn add_data_at(&self, record: Value, now: DateTime<Utc>) -> Result<(), AggregatorError> {
        let mut guard = self.window.lock().unwrap();

        let mut window = match guard.take() {
            Some(window) => {
                let age_s = (now - window.started_at).num_seconds();
                if age_s >= self.max_duration_s {
                    self.flush_locked(window, now)?;
                    OpenWindow { records: Vec::new(), started_at: now }
                } else {
                    window
                }
            }
            None => OpenWindow { records: Vec::new(), started_at: now },
        };

        window.records.push(record);
        *guard = Some(window);
        Ok(())
    }

    fn finalize_dataset_at(&self, now: DateTime<Utc>) -> Result<(), AggregatorError> {
        let mut guard = self.window.lock().unwrap();
        if let Some(window) = guard.take() {
            if !window.records.is_empty() {
                self.flush_locked(window, now)?;
            }
        }
        Ok(())
    }

    /// Number of records currently buffered in the open window.
    pub fn len(&self) -> usize {
        self.window.lock().unwrap().as_ref().map_or(0, |w| w.records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
