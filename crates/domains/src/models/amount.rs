use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Decimals of the native CORE token.
pub const CORE_DECIMALS: u32 = 18;

const WEI_PER_CORE: u128 = 10u128.pow(CORE_DECIMALS);

/// An amount of native CORE, held in wei so comparisons are exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoreAmount(u128);

impl CoreAmount {
    pub const ZERO: CoreAmount = CoreAmount(0);

    pub const fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    pub const fn wei(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parses a decimal string such as `"0.01"` or `"10"`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::Validation(format!("'{raw}' is not a valid CORE amount"));
        let trimmed = raw.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > CORE_DECIMALS as usize {
            return Err(DomainError::Validation(format!(
                "'{raw}' has more than {CORE_DECIMALS} decimals"
            )));
        }

        let whole_wei = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u128>()
                .ok()
                .and_then(|w| w.checked_mul(WEI_PER_CORE))
                .ok_or_else(invalid)?
        };
        let fraction_wei = if fraction.is_empty() {
            0
        } else {
            let scale = 10u128.pow(CORE_DECIMALS - fraction.len() as u32);
            fraction.parse::<u128>().map_err(|_| invalid())? * scale
        };

        whole_wei.checked_add(fraction_wei).map(Self).ok_or_else(invalid)
    }
}

impl fmt::Display for CoreAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WEI_PER_CORE;
        let fraction = self.0 % WEI_PER_CORE;
        if fraction == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{:0width$}", fraction, width = CORE_DECIMALS as usize);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for CoreAmount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
