//! Accepted price currencies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Rejection;

/// Currency token attached to a work offer price.
///
/// The four tokens are kept distinct: `USD` and `U$S` are spelled
/// differently by users and compared literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// `USD`
    #[serde(rename = "USD")]
    Usd,
    /// `UYU`
    #[serde(rename = "UYU")]
    Uyu,
    /// `$U`
    #[serde(rename = "$U")]
    PesoSymbol,
    /// `U$S`
    #[serde(rename = "U$S")]
    DollarSymbol,
}

impl Currency {
    /// Every accepted currency, in display order.
    pub const ALL: [Self; 4] = [Self::Usd, Self::Uyu, Self::PesoSymbol, Self::DollarSymbol];

    /// Returns the literal token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Uyu => "UYU",
            Self::PesoSymbol => "$U",
            Self::DollarSymbol => "U$S",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|currency| currency.as_str() == token)
            .ok_or_else(|| Rejection::UnknownCurrency(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_token() {
        for currency in Currency::ALL {
            assert_eq!(currency.as_str().parse::<Currency>(), Ok(currency));
        }
        assert_eq!(" UYU ".parse::<Currency>(), Ok(Currency::Uyu));
    }

    #[test]
    fn rejects_other_tokens() {
        assert_eq!(
            "EUR".parse::<Currency>(),
            Err(Rejection::UnknownCurrency("EUR".to_string()))
        );
        assert!("usd".parse::<Currency>().is_err());
    }

    #[test]
    fn serializes_as_token() {
        let json = serde_json::to_string(&Currency::DollarSymbol).unwrap_or_default();
        assert_eq!(json, "\"U$S\"");
    }
}
