use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Upper-case ticker with its exchange suffix, e.g. `IUSA.L` or `BRK-B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let ticker = input.trim().to_ascii_uppercase();
        let Some(first) = ticker.chars().next() else {
            return Err(ValidationError::EmptySymbol);
        };
        if ticker.len() > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len: ticker.len(),
                max: MAX_SYMBOL_LEN,
            });
        }
        if !first.is_ascii_alphabetic() {
            return Err(ValidationError::SymbolInvalidStart { ch: first });
        }
        if let Some((index, ch)) = ticker
            .char_indices()
            .find(|(_, ch)| !(ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-')))
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        Ok(Self(ticker))
    }

    /// Literal tickers used for defaults; they bypass validation.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_etf_tickers_are_normalized() {
        assert_eq!(Symbol::parse(" iusa.l ").expect("symbol").as_str(), "IUSA.L");
        assert_eq!(Symbol::parse("brk-b").expect("symbol").to_string(), "BRK-B");
    }

    #[test]
    fn malformed_tickers_are_refused() {
        assert_eq!(Symbol::parse("   "), Err(ValidationError::EmptySymbol));
        assert!(matches!(
            Symbol::parse("1IUSA"),
            Err(ValidationError::SymbolInvalidStart { ch: '1' })
        ));
        assert!(matches!(
            Symbol::parse("IUSA$"),
            Err(ValidationError::SymbolInvalidChar { ch: '$', index: 4 })
        ));
        assert!(matches!(
            Symbol::parse("ABCDEFGHIJKLMNOP"),
            Err(ValidationError::SymbolTooLong { len: 16, .. })
        ));
    }
}
