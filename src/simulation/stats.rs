//! Numeric summaries of batch columns

use serde::{Deserialize, Serialize};

pub fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

pub fn std_dev(values: &[u32]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values
        .iter()
        .map(|&v| (v as f64 - m).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    var.sqrt()
}

/// Relative frequency of each distinct value, ascending by value
pub fn frequencies(values: &[u32]) -> Vec<(u32, f64)> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let total = sorted.len() as f64;
    let mut out: Vec<(u32, f64)> = Vec::new();
    for value in sorted {
        match out.last_mut() {
            Some((v, count)) if *v == value => *count += 1.0,
            _ => out.push((value, 1.0)),
        }
    }
    for entry in &mut out {
        entry.1 /= total;
    }
    out
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub mean: f64,
    pub std_dev: f64,
    pub min: u32,
    pub max: u32,
    pub frequencies: Vec<(u32, f64)>,
}

impl Distribution {
    pub fn from_values(values: &[u32]) -> Self {
        Self {
            mean: mean(values),
            std_dev: std_dev(values),
            min: values.iter().copied().min().unwrap_or(0),
            max: values.iter().copied().max().unwrap_or(0),
            frequencies: frequencies(values),
        }
    }

    /// Frequencies at or above `threshold`, for compact listings
    pub fn significant(&self, threshold: f64) -> impl Iterator<Item = &(u32, f64)> {
        self.frequencies.iter().filter(move |(_, f)| *f >= threshold)
    }
}
