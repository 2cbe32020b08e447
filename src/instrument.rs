use serde::Serialize;
use std::fmt;

/// Where an instrument's positions come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "market", rename_all = "lowercase")]
pub enum MarketSource {
    /// Substring expected in the provider's `market_and_exchange_names` field
    Cftc(String),
    /// Market that the COT report does not cover
    Unavailable,
}

/// A selectable instrument on the dashboard.
///
/// Supports two kinds of entries:
/// - Reported instruments, carrying the match-string used to filter provider rows
/// - The unavailable sentinel, for markets absent from the provider's dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Instrument {
    /// URL-safe identifier (e.g., "gold", "eur_usd")
    pub key: String,
    /// Display label (e.g., "EURO (EUR/USD)")
    pub label: String,
    /// Provider match-string or the unavailable sentinel
    pub source: MarketSource,
}

impl Instrument {
    /// Creates an instrument reported by the CFTC.
    ///
    /// # Arguments
    /// * `key` - URL-safe identifier
    /// * `label` - Display label
    /// * `market` - Substring of the provider's market name (e.g., "EURO FX")
    ///
    /// # Errors
    /// Returns an error if the key or market is empty, or if the key contains invalid characters.
    pub fn reported(
        key: impl Into<String>,
        label: impl Into<String>,
        market: impl Into<String>,
    ) -> Result<Self, InstrumentError> {
        let key = key.into();
        let market = market.into();
        Self::validate_key(&key)?;
        if market.trim().is_empty() {
            return Err(InstrumentError::EmptyMarket);
        }
        Ok(Instrument {
            key,
            label: label.into(),
            source: MarketSource::Cftc(market),
        })
    }

    /// Creates an instrument that is known to be missing from the COT report.
    pub fn unavailable(
        key: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Self, InstrumentError> {
        let key = key.into();
        Self::validate_key(&key)?;
        Ok(Instrument {
            key,
            label: label.into(),
            source: MarketSource::Unavailable,
        })
    }

    /// Rejects empty keys and keys that would not survive a URL path segment.
    fn validate_key(key: &str) -> Result<(), InstrumentError> {
        if key.is_empty() {
            return Err(InstrumentError::EmptyKey);
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(InstrumentError::InvalidCharacters);
        }

        Ok(())
    }

    /// Returns the provider match-string, or `None` for the unavailable sentinel.
    pub fn market(&self) -> Option<&str> {
        match &self.source {
            MarketSource::Cftc(market) => Some(market),
            MarketSource::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.source, MarketSource::Cftc(_))
    }

    /// Advisory shown instead of running the pipeline for an unavailable instrument.
    pub fn advisory(&self) -> String {
        format!(
            "{} is not covered by the CFTC Commitments of Traders report (it is not a U.S. futures market). No data available.",
            self.label
        )
    }

    /// File name for the CSV export, derived from the label.
    ///
    /// Lowercases the label, turns spaces into underscores and drops anything
    /// else that is not alphanumeric: "EURO (EUR/USD)" -> "cot_euro_eurusd.csv".
    pub fn csv_file_name(&self) -> String {
        let stem: String = self
            .label
            .to_lowercase()
            .chars()
            .filter_map(|c| match c {
                ' ' => Some('_'),
                c if c.is_ascii_alphanumeric() || c == '_' => Some(c),
                _ => None,
            })
            .collect();
        format!("cot_{}.csv", stem)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// The fixed set of instruments offered by the dashboard.
#[derive(Debug, Clone)]
pub struct InstrumentCatalog {
    instruments: Vec<Instrument>,
}

impl InstrumentCatalog {
    /// Builds a catalog from explicit entries. The first entry is the default selection.
    ///
    /// # Errors
    /// Returns an error if the list is empty or two entries share a key.
    pub fn new(instruments: Vec<Instrument>) -> Result<Self, InstrumentError> {
        if instruments.is_empty() {
            return Err(InstrumentError::EmptyCatalog);
        }
        for (i, instrument) in instruments.iter().enumerate() {
            if instruments[..i].iter().any(|other| other.key == instrument.key) {
                return Err(InstrumentError::DuplicateKey(instrument.key.clone()));
            }
        }
        Ok(InstrumentCatalog { instruments })
    }

    /// Looks up an instrument by key (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&Instrument> {
        self.instruments
            .iter()
            .find(|instrument| instrument.key.eq_ignore_ascii_case(key))
    }

    /// Looks up an instrument by key, failing with `UnknownKey`.
    pub fn resolve(&self, key: &str) -> Result<&Instrument, InstrumentError> {
        self.get(key)
            .ok_or_else(|| InstrumentError::UnknownKey(key.to_string()))
    }

    pub fn default_instrument(&self) -> &Instrument {
        &self.instruments[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        let entries = [
            ("gold", "GOLD", Some("GOLD")),
            ("eur_usd", "EURO (EUR/USD)", Some("EURO FX")),
            ("sp500", "SP500", Some("E-MINI S&P 500")),
            ("us30", "DOW JONES (US30)", Some("DJIA")),
            ("ustec", "NASDAQ (USTEC)", Some("E-MINI NASDAQ 100")),
            ("wti", "CRUDE OIL (WTI)", Some("CRUDE OIL")),
            ("btc", "BTC (Bitcoin)", Some("BITCOIN")),
            ("jpy", "YEN", Some("JAPANESE YEN")),
            ("brl", "BRL (USD/BRL)", Some("BRAZILIAN REAL")),
            ("hk50", "HK50 (Hang Seng)", None),
        ];

        let instruments = entries
            .iter()
            .map(|(key, label, market)| match market {
                Some(market) => Instrument {
                    key: key.to_string(),
                    label: label.to_string(),
                    source: MarketSource::Cftc(market.to_string()),
                },
                None => Instrument {
                    key: key.to_string(),
                    label: label.to_string(),
                    source: MarketSource::Unavailable,
                },
            })
            .collect();

        InstrumentCatalog { instruments }
    }
}

/// Errors that can occur when building or querying the instrument catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentError {
    /// The key is empty
    EmptyKey,
    /// The key contains characters other than ASCII alphanumerics, '-' and '_'
    InvalidCharacters,
    /// A reported instrument was given an empty match-string
    EmptyMarket,
    /// The catalog has no entries
    EmptyCatalog,
    /// Two entries share a key
    DuplicateKey(String),
    /// No instrument with this key
    UnknownKey(String),
}

impl fmt::Display for InstrumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentError::EmptyKey => write!(f, "Instrument key cannot be empty"),
            InstrumentError::InvalidCharacters => {
                write!(f, "Instrument key contains invalid characters")
            }
            InstrumentError::EmptyMarket => write!(f, "Market match-string cannot be empty"),
            InstrumentError::EmptyCatalog => write!(f, "Instrument catalog cannot be empty"),
            InstrumentError::DuplicateKey(key) => write!(f, "Duplicate instrument key: {}", key),
            InstrumentError::UnknownKey(key) => write!(f, "Unknown instrument: {}", key),
        }
    }
}

impl std::error::Error for InstrumentError {}
