use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Currency formatting (presentation only; the report keeps raw numbers)
// ---------------------------------------------------------------------------

/// How currency values are written in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Prefix, including any trailing space.
    pub symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "R$ ".to_string(),
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
        }
    }
}

impl CurrencyFormat {
    /// `1234567.891` → `"R$ 1.234.567,89"` with the default format.
    pub fn format(&self, value: f64) -> String {
        format!("{}{}", self.symbol, self.format_number(value, 2))
    }

    /// Group thousands and round to `decimals` places, without the symbol.
    pub fn format_number(&self, value: f64, decimals: usize) -> String {
        let formatted = format!("{:.*}", decimals, value.abs());
        let (integer_part, decimal_part) = match formatted.split_once('.') {
            Some((i, d)) => (i, Some(d)),
            None => (formatted.as_str(), None),
        };

        let digits: Vec<char> = integer_part.chars().collect();
        let mut grouped = String::new();
        for (i, c) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push_str(&self.thousands_separator);
            }
            grouped.push(*c);
        }

        // "-0,00" reads badly; only keep the sign when something is left after rounding.
        let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
        let sign = if negative { "-" } else { "" };

        match decimal_part {
            Some(d) => format!("{sign}{grouped}{}{d}", self.decimal_separator),
            None => format!("{sign}{grouped}"),
        }
    }

    /// Ticket average cell: `"—"` when undefined.
    pub fn format_ticket(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => self.format(v),
            _ => "—".to_string(),
        }
    }
}
