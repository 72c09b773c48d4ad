//! Approximate cost of a verification call
//!
//! The estimate is derived from prompt and answer character counts, not from
//! metered token usage. Grounding fees and tokenizer differences are not
//! reflected, so treat the figure as an order-of-magnitude hint.

use serde::{Deserialize, Serialize};

/// Gemini 2.5 Flash list prices ($0.075 / $0.30 per 1M tokens) at roughly four
/// characters per token.
pub const INPUT_USD_PER_MILLION_CHARS: f64 = 0.01875;
pub const OUTPUT_USD_PER_MILLION_CHARS: f64 = 0.075;

/// Per-character USD rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRates {
    pub input_per_char: f64,
    pub output_per_char: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            input_per_char: INPUT_USD_PER_MILLION_CHARS / 1_000_000.0,
            output_per_char: OUTPUT_USD_PER_MILLION_CHARS / 1_000_000.0,
        }
    }
}

impl CostRates {
    /// Estimated USD cost for a prompt/answer pair. Never negative.
    pub fn estimate(&self, prompt: &str, answer: &str) -> f64 {
        let input = prompt.chars().count() as f64 * self.input_per_char;
        let output = answer.chars().count() as f64 * self.output_per_char;
        (input + output).max(0.0)
    }
}
