//! Static per-model price table
//!
//! Cost is linear in token counts:
//! `input_tokens / 1e6 × input_price + output_tokens / 1e6 × output_price`,
//! plus a flat per-request surcharge for providers that charge one.

use crate::constants::PERPLEXITY_REQUEST_SURCHARGE_USD;
use airelay_domain::value_objects::TokenUsage;
use tracing::warn;

/// Price entry for one model, USD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPrice {
    /// Per million input tokens
    pub input_per_mtok: f64,
    /// Per million output tokens
    pub output_per_mtok: f64,
    /// Flat surcharge per request
    pub per_request: f64,
}

/// Look up the price entry for a model
pub fn price_for(model: &str) -> Option<ModelPrice> {
    let price = match model {
        "gpt-4o" => ModelPrice {
            input_per_mtok: 2.50,
            output_per_mtok: 10.00,
            per_request: 0.0,
        },
        "gpt-4o-mini" => ModelPrice {
            input_per_mtok: 0.15,
            output_per_mtok: 0.60,
            per_request: 0.0,
        },
        "claude-3-5-sonnet-latest" => ModelPrice {
            input_per_mtok: 3.00,
            output_per_mtok: 15.00,
            per_request: 0.0,
        },
        "claude-3-5-haiku-latest" => ModelPrice {
            input_per_mtok: 0.80,
            output_per_mtok: 4.00,
            per_request: 0.0,
        },
        "sonar-pro" => ModelPrice {
            input_per_mtok: 3.00,
            output_per_mtok: 15.00,
            per_request: PERPLEXITY_REQUEST_SURCHARGE_USD,
        },
        "sonar" => ModelPrice {
            input_per_mtok: 1.00,
            output_per_mtok: 1.00,
            per_request: PERPLEXITY_REQUEST_SURCHARGE_USD,
        },
        _ => return None,
    };
    Some(price)
}

/// Compute the cost of one call in USD
///
/// Unknown models cost zero; the gap is logged so the price table can be
/// extended rather than silently mis-billed.
pub fn cost_for(model: &str, usage: &TokenUsage) -> f64 {
    match price_for(model) {
        Some(price) => {
            (usage.input_tokens as f64 / 1e6) * price.input_per_mtok
                + (usage.output_tokens as f64 / 1e6) * price.output_per_mtok
                + price.per_request
        }
        None => {
            warn!(model, "no price table entry, recording zero cost");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_is_linear_in_token_counts() {
        let usage = TokenUsage {
            input_tokens: 1_000_000,
            output_tokens: 500_000,
        };
        let cost = cost_for("gpt-4o", &usage);
        assert!((cost - (2.50 + 5.00)).abs() < 1e-9);
    }

    #[test]
    fn surcharge_applies_per_request() {
        let usage = TokenUsage {
            input_tokens: 1000,
            output_tokens: 1000,
        };
        let cost = cost_for("sonar", &usage);
        let expected = 0.001 * 1.00 + 0.001 * 1.00 + 0.005;
        assert!((cost - expected).abs() < 1e-9);

        // Zero tokens still pays the flat fee
        let flat = cost_for("sonar-pro", &TokenUsage::default());
        assert!((flat - 0.005).abs() < 1e-12);
    }

    #[test]
    fn unknown_model_costs_zero() {
        let usage = TokenUsage {
            input_tokens: 10_000,
            output_tokens: 10_000,
        };
        assert_eq!(cost_for("some-future-model", &usage), 0.0);
    }
}
