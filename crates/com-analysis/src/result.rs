//! Keyed, ordered collection of analysis outputs.

use com_common::{ComError, ComResult};
use ndarray::Array2;
use renderer::RgbImage;
use serde::Serialize;
use std::ops::Index;

/// Raw values behind one result entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawData {
    /// A scalar map over the scan grid
    Single(Array2<f64>),
    /// A vector field as `(x, y)` component maps
    Pair(Array2<f64>, Array2<f64>),
}

impl RawData {
    /// Shape of the underlying map(s).
    pub fn dim(&self) -> (usize, usize) {
        match self {
            RawData::Single(map) => map.dim(),
            RawData::Pair(x, _) => x.dim(),
        }
    }
}

/// One named output of an analysis.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub raw_data: RawData,
    pub visualized: RgbImage,
    pub key: String,
    pub title: String,
    pub description: String,
    pub include_in_download: bool,
}

impl AnalysisResult {
    pub fn new(
        raw_data: RawData,
        visualized: RgbImage,
        key: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            raw_data,
            visualized,
            key: key.into(),
            title: title.into(),
            description: description.into(),
            include_in_download: true,
        }
    }

    /// Mark the entry as display-only.
    pub fn excluded_from_download(mut self) -> Self {
        self.include_in_download = false;
        self
    }
}

/// Ordered results, addressable by key or position.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResultSet {
    results: Vec<AnalysisResult>,
}

impl AnalysisResultSet {
    /// Build a set, rejecting duplicate keys.
    pub fn new(results: Vec<AnalysisResult>) -> ComResult<Self> {
        for (i, result) in results.iter().enumerate() {
            if results[..i].iter().any(|other| other.key == result.key) {
                return Err(ComError::DuplicateResultKey(result.key.clone()));
            }
        }
        Ok(Self { results })
    }

    pub fn get(&self, key: &str) -> Option<&AnalysisResult> {
        self.results.iter().find(|r| r.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnalysisResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Keys in result order.
    pub fn keys(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.key.as_str()).collect()
    }

    /// Entries that belong in a download.
    pub fn downloadable(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.results.iter().filter(|r| r.include_in_download)
    }
}

impl Index<usize> for AnalysisResultSet {
    type Output = AnalysisResult;

    fn index(&self, index: usize) -> &AnalysisResult {
        &self.results[index]
    }
}

impl<'a> IntoIterator for &'a AnalysisResultSet {
    type Item = &'a AnalysisResult;
    type IntoIter = std::slice::Iter<'a, AnalysisResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl IntoIterator for AnalysisResultSet {
    type Item = AnalysisResult;
    type IntoIter = std::vec::IntoIter<AnalysisResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
