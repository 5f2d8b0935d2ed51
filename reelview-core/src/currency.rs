//! Money formatting for budget and revenue figures.
//!
//! There is no process-wide locale: every call receives the
//! [`CurrencyFormat`] to apply.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    /// `$1` when true, `1 €` when false.
    pub symbol_first: bool,
    pub symbol_spaced: bool,
    pub grouping_separator: String,
    pub decimal_separator: String,
    pub fraction_digits: usize,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::en_us()
    }
}

impl CurrencyFormat {
    pub fn en_us() -> Self {
        Self {
            symbol: "$".to_string(),
            symbol_first: true,
            symbol_spaced: false,
            grouping_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            fraction_digits: 2,
        }
    }

    /// Preset for a BCP 47 style tag (`en-US`, `de_DE`, ...). Unknown tags
    /// yield `None`.
    pub fn for_locale(tag: &str) -> Option<Self> {
        let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
        let normalized = normalized.split('.').next().unwrap_or_default();

        let format = match normalized {
            "en-us" | "en" => Self::en_us(),
            "en-gb" => Self {
                symbol: "£".to_string(),
                ..Self::en_us()
            },
            "de-de" | "de" => Self {
                symbol: "€".to_string(),
                symbol_first: false,
                symbol_spaced: true,
                grouping_separator: ".".to_string(),
                decimal_separator: ",".to_string(),
                fraction_digits: 2,
            },
            "fr-fr" | "fr" => Self {
                symbol: "€".to_string(),
                symbol_first: false,
                symbol_spaced: true,
                grouping_separator: "\u{a0}".to_string(),
                decimal_separator: ",".to_string(),
                fraction_digits: 2,
            },
            "ja-jp" | "ja" => Self {
                symbol: "¥".to_string(),
                fraction_digits: 0,
                ..Self::en_us()
            },
            _ => return None,
        };

        Some(format)
    }

    /// Format a plain amount, e.g. `63000000.0` → `$63,000,000.00`.
    pub fn format_amount(&self, amount: f64) -> String {
        let fixed = format!("{:.*}", self.fraction_digits, amount.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (fixed.as_str(), None),
        };

        let mut number = group_digits(int_part, &self.grouping_separator);
        if let Some(frac) = frac_part {
            number.push_str(&self.decimal_separator);
            number.push_str(frac);
        }

        let spacer = if self.symbol_spaced { " " } else { "" };
        let body = if self.symbol_first {
            format!("{}{spacer}{number}", self.symbol)
        } else {
            format!("{number}{spacer}{}", self.symbol)
        };

        if amount.is_sign_negative() && amount != 0.0 {
            format!("-{body}")
        } else {
            body
        }
    }

    /// Format a JSON value. Non-numeric input is returned as-is.
    pub fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(|amount| self.format_amount(amount))
                .unwrap_or_else(|| n.to_string()),
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(digit);
    }
    out
}
