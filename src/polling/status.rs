//! Status line rendering.

use crate::config::SourceConfig;
use crate::sampling::types::Sample;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Labels used when rendering a status line.
#[derive(Debug, Clone)]
pub struct StatusFormat {
    pub symbol: String,
    pub quote_label: String,
    pub window_size: usize,
}

impl StatusFormat {
    pub fn new(symbol: impl Into<String>, quote_label: impl Into<String>, window_size: usize) -> Self {
        Self {
            symbol: symbol.into(),
            quote_label: quote_label.into(),
            window_size,
        }
    }

    pub fn from_config(source: &SourceConfig, window_size: usize) -> Self {
        Self::new(source.symbol.clone(), source.quote_label.clone(), window_size)
    }

    /// `[2024-01-01T00:00:00] BTC -> USD: $43,210.50 | SMA(10): $43,005.12`
    pub fn render(&self, sample: &Sample, average: f64) -> String {
        format!(
            "[{}] {} -> {}: ${} | SMA({}): ${}",
            sample.observed_at.format(TIMESTAMP_FORMAT),
            self.symbol,
            self.quote_label,
            format_amount(sample.value),
            self.window_size,
            format_amount(average),
        )
    }
}

/// Two decimals with comma thousands separators.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
