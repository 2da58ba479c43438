//! Derived statistics over a fetched history window.
//!
//! Response times are reported by the backend in seconds; the dashboard
//! displays milliseconds, so all figures here are in ms.

use super::model::HistoryPoint;

/// Average / min / max response time over one history window.
///
/// A sample with no `response_time` counts as 0 ms in the raw series. The
/// average and max include those zeros; the minimum is taken over strictly
/// positive samples only, so a window full of gaps does not report a false
/// near-zero minimum. The asymmetry (zeros in avg/max, excluded from min) is
/// long-standing display behavior and is preserved as-is; see the tests
/// before changing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryStats {
    pub avg_ms: f64,
    /// None when no sample in the window has a positive response time.
    pub min_ms: Option<f64>,
    pub max_ms: f64,
}

impl HistoryStats {
    /// Compute stats for a window. Returns `None` for an empty window.
    pub fn compute(points: &[HistoryPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let series_ms: Vec<f64> =
            points.iter().map(|p| p.response_time.unwrap_or(0.0) * 1000.0).collect();

        let avg_ms = series_ms.iter().sum::<f64>() / series_ms.len() as f64;
        let max_ms = series_ms.iter().copied().fold(0.0_f64, f64::max);
        let min_ms = series_ms
            .iter()
            .copied()
            .filter(|&ms| ms > 0.0)
            .fold(None, |acc: Option<f64>, ms| Some(acc.map_or(ms, |a| a.min(ms))));

        Some(Self { avg_ms, min_ms, max_ms })
    }
}
