use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

const PREFIX: &str = "ATS0";
const DIGITS: usize = 3;

/// A validated employee identifier: `ATS0` followed by three digits.
///
/// Store methods take `&EmpId`, so a malformed key never reaches a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmpId(String);

impl EmpId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let digits = raw.strip_prefix(PREFIX).ok_or(AppError::InvalidEmpId)?;
        if digits.len() != DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::InvalidEmpId);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EmpId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EmpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
