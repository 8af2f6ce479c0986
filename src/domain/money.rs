use {
    super::error::PipelineError,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Whole-rupiah amount. IDR has no minor unit in Midtrans payloads, which
/// send `"150000.00"`; the fractional part is always zero and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rupiah(i64);

impl Rupiah {
    pub fn new(amount: i64) -> Result<Self, PipelineError> {
        if amount < 0 {
            return Err(PipelineError::Validation(format!(
                "amount cannot be negative, got: {amount}"
            )));
        }
        Ok(Self(amount))
    }

    /// Parse a provider amount string. Accepts `"150000"` and
    /// `"150000.00"`; the fraction is truncated.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let raw = raw.trim();
        let whole = raw.split_once('.').map_or(raw, |(whole, _)| whole);
        let amount: i64 = whole
            .parse()
            .map_err(|_| PipelineError::Validation(format!("invalid amount: {raw:?}")))?;
        Self::new(amount)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
