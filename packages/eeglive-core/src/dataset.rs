// Static pre-recorded dataset for the non-live mode
//
// A tabular CSV with one timestamp column and one value column per
// channel, loaded once and never polled. It feeds the same estimator
// pipeline as the live buffers.

use crate::sync::types::{Channel, Sample, SyncError, SyncResult};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Header of the timestamp column
pub const TIMESTAMP_COLUMN: &str = "UTC Timestamp";

#[derive(Debug, Clone, Default)]
pub struct StaticDataset {
    timestamps: Vec<String>,
    channels: HashMap<Channel, Vec<f64>>,
}

impl StaticDataset {
    /// Load a dataset from a CSV file with `UTC Timestamp` plus one
    /// `EEG Signal <channel> (uV)` column per channel.
    pub fn load(path: impl AsRef<Path>) -> SyncResult<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| SyncError::Parse(e.to_string()))?
            .clone();

        let column = |name: &str| -> SyncResult<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| SyncError::Parse(format!("missing column: {}", name)))
        };

        let ts_idx = column(TIMESTAMP_COLUMN)?;
        let mut value_columns = Vec::with_capacity(Channel::ALL.len());
        for channel in Channel::ALL {
            value_columns.push((channel, column(&channel.column_name())?));
        }

        let mut timestamps = Vec::new();
        let mut channels: HashMap<Channel, Vec<f64>> =
            Channel::ALL.iter().map(|&c| (c, Vec::new())).collect();

        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| SyncError::Parse(e.to_string()))?;

            let ts = record
                .get(ts_idx)
                .ok_or_else(|| SyncError::Parse(format!("row {}: missing timestamp", row + 1)))?;
            timestamps.push(ts.to_string());

            for &(channel, idx) in &value_columns {
                let raw = record.get(idx).ok_or_else(|| {
                    SyncError::Parse(format!("row {}: missing value for {}", row + 1, channel))
                })?;
                let value: f64 = raw.trim().parse().map_err(|_| {
                    SyncError::Parse(format!(
                        "row {}: invalid value for {}: {:?}",
                        row + 1,
                        channel,
                        raw
                    ))
                })?;
                if let Some(column) = channels.get_mut(&channel) {
                    column.push(value);
                }
            }
        }

        log::info!(
            "loaded static dataset: {} rows, {} channels",
            timestamps.len(),
            channels.len()
        );

        Ok(Self {
            timestamps,
            channels,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    pub fn values(&self, channel: Channel) -> &[f64] {
        self.channels.get(&channel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The channel's rows as `Sample`s with synthetic 1-based ids, so the
    /// static source can feed the same buffer/estimator pipeline.
    pub fn samples(&self, channel: Channel) -> Vec<Sample> {
        self.values(channel)
            .iter()
            .zip(self.timestamps.iter())
            .enumerate()
            .map(|(row, (&value, ts))| Sample {
                id: row as i64 + 1,
                ts: ts.clone(),
                value,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV_BODY: &str = "\
UTC Timestamp,EEG Signal A3 (uV),EEG Signal A4 (uV)
2024-01-01T00:00:00Z,1.5,-0.5
2024-01-01T00:00:01Z,2.5,0.25
2024-01-01T00:00:02Z,3.5,1.0
";

    fn write_csv(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_parses_all_columns() {
        let file = write_csv(CSV_BODY);
        let dataset = StaticDataset::load(file.path()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.values(Channel::A3), &[1.5, 2.5, 3.5]);
        assert_eq!(dataset.values(Channel::A4), &[-0.5, 0.25, 1.0]);
        assert_eq!(dataset.timestamps()[0], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn samples_get_synthetic_monotonic_ids() {
        let file = write_csv(CSV_BODY);
        let dataset = StaticDataset::load(file.path()).unwrap();

        let samples = dataset.samples(Channel::A4);
        let ids: Vec<i64> = samples.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(samples[1].value, 0.25);
    }

    #[test]
    fn missing_channel_column_is_a_parse_error() {
        let file = write_csv("UTC Timestamp,EEG Signal A3 (uV)\n2024-01-01T00:00:00Z,1.0\n");
        assert!(matches!(
            StaticDataset::load(file.path()),
            Err(SyncError::Parse(_))
        ));
    }

    #[test]
    fn unparsable_value_is_a_parse_error() {
        let file = write_csv(
            "UTC Timestamp,EEG Signal A3 (uV),EEG Signal A4 (uV)\nt0,oops,1.0\n",
        );
        assert!(matches!(
            StaticDataset::load(file.path()),
            Err(SyncError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            StaticDataset::load("/nonexistent/dataset.csv"),
            Err(SyncError::Io(_))
        ));
    }
}
