//! Descriptive statistics and frequency distributions for the post-clean
//! data-quality report.

use std::collections::HashMap;

/// Median of a set of observations; even counts average the two midpoints.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Streaming accumulator for count/min/max/mean/median/std-dev over one
/// numeric column.
pub struct Descriptive {
    name: String,
    values: Vec<f64>,
    sum: f64,
    sum_squares: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Descriptive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            sum: 0.0,
            sum_squares: 0.0,
            min: None,
            max: None,
        }
    }

    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.sum_squares += value * value;
        self.min = Some(match self.min {
            Some(current) => current.min(value),
            None => value,
        });
        self.max = Some(match self.max {
            Some(current) => current.max(value),
            None => value,
        });
        self.values.push(value);
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.sum / self.values.len() as f64)
        }
    }

    pub fn median(&self) -> Option<f64> {
        median(&self.values)
    }

    pub fn std_dev(&self) -> Option<f64> {
        let count = self.values.len();
        if count < 2 {
            return None;
        }
        let mean = self.mean()?;
        let variance = (self.sum_squares - count as f64 * mean * mean) / (count as f64 - 1.0);
        Some(variance.max(0.0).sqrt())
    }

    pub fn render_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.count().to_string(),
            format_metric(self.min),
            format_metric(self.max),
            format_metric(self.mean()),
            format_metric(self.median()),
            format_metric(self.std_dev()),
        ]
    }
}

/// Frequency counts for one categorical column, rendered as
/// value/count/percent rows sorted by descending count.
pub struct Distribution {
    counts: HashMap<String, usize>,
    total: usize,
}

impl Distribution {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            total: 0,
        }
    }

    pub fn add(&mut self, label: impl Into<String>) {
        self.total += 1;
        *self.counts.entry(label.into()).or_insert(0) += 1;
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn render_rows(&self) -> Vec<Vec<String>> {
        if self.total == 0 {
            return Vec::new();
        }
        let mut items = self.counts.iter().collect::<Vec<_>>();
        items.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        items
            .into_iter()
            .map(|(value, count)| {
                let percent = (*count as f64 / self.total as f64) * 100.0;
                vec![value.clone(), count.to_string(), format!("{percent:.2}%")]
            })
            .collect()
    }
}

impl Default for Distribution {
    fn default() -> Self {
        Self::new()
    }
}

fn format_metric(metric: Option<f64>) -> String {
    match metric {
        Some(value) if value.fract() == 0.0 => format!("{value:.0}"),
        Some(value) => format!("{value:.4}"),
        None => String::new(),
    }
}
