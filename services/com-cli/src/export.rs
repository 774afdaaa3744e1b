//! Writing a result set to disk.

use anyhow::{Context, Result};
use com_analysis::AnalysisResultSet;
use com_common::ResolvedParameters;
use renderer::png::encode_png;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Index of everything written, stored as `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub parameters: ResolvedParameters,
    pub results: Vec<ExportedEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedEntry {
    pub key: String,
    pub title: String,
    pub description: String,
    pub image: String,
    /// Raw data file, only for downloadable entries
    pub data: Option<String>,
}

/// Write `<key>.png` for every entry, `<key>.json` for downloadable entries
/// and `summary.json` into `dir`, creating it if needed.
pub fn write_results(
    results: &AnalysisResultSet,
    parameters: &ResolvedParameters,
    dir: &Path,
) -> Result<ExportSummary> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut entries = Vec::with_capacity(results.len());
    for result in results {
        let image = format!("{}.png", result.key);
        let png = encode_png(&result.visualized)
            .with_context(|| format!("Failed to encode {}", result.key))?;
        fs::write(dir.join(&image), &png)
            .with_context(|| format!("Failed to write {}", image))?;

        let data = if result.include_in_download {
            let name = format!("{}.json", result.key);
            let json = serde_json::to_vec(&result.raw_data)?;
            fs::write(dir.join(&name), json).with_context(|| format!("Failed to write {}", name))?;
            Some(name)
        } else {
            None
        };

        debug!(key = %result.key, png_bytes = png.len(), raw = data.is_some(), "Exported result");

        entries.push(ExportedEntry {
            key: result.key.clone(),
            title: result.title.clone(),
            description: result.description.clone(),
            image,
            data,
        });
    }

    let summary = ExportSummary {
        parameters: parameters.clone(),
        results: entries,
    };
    fs::write(dir.join("summary.json"), serde_json::to_vec_pretty(&summary)?)
        .context("Failed to write summary.json")?;

    info!(dir = %dir.display(), results = summary.results.len(), "Wrote results");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use com_analysis::{ComAnalysis, ReductionMaps};
    use com_common::{ComParameters, DatasetShape};
    use test_utils::generators::create_test_map;
    use test_utils::paths::temp_test_dir;

    #[test]
    fn test_write_real_results() {
        let analysis =
            ComAnalysis::new(DatasetShape::new([3, 4], [16, 16]), &ComParameters::default()).unwrap();
        let maps = ReductionMaps::real(
            create_test_map(3, 4) + 1.0,
            create_test_map(3, 4) * 8.0,
            create_test_map(3, 4) * 9.0,
        )
        .unwrap();
        let results = analysis.results(&maps).unwrap();

        let dir = temp_test_dir();
        let summary = write_results(&results, analysis.parameters(), dir.path()).unwrap();

        assert_eq!(summary.results.len(), 6);
        assert!(dir.path().join("field.png").exists());
        assert!(!dir.path().join("field.json").exists());
        for key in ["magnitude", "divergence", "curl", "x", "y"] {
            assert!(dir.path().join(format!("{}.png", key)).exists());
            assert!(dir.path().join(format!("{}.json", key)).exists());
        }

        let png = fs::read(dir.path().join("x.png")).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let text = fs::read_to_string(dir.path().join("summary.json")).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(summary["results"][0]["key"], "field");
        assert_eq!(summary["results"][0]["data"], serde_json::Value::Null);
        assert_eq!(summary["parameters"]["r"], serde_json::Value::Null);
    }
}
