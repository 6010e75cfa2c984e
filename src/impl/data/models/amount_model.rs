use std::str::FromStr;

use serde::{Deserialize as _, Deserializer};
use serde_json::Value;

/// Amount as typed into the app: may carry thousands separators or
/// accounting-style parentheses for negatives.
#[derive(Debug)]
pub(crate) struct AmountModel(pub f64);

impl FromStr for AmountModel {
    type Err = std::num::ParseFloatError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.replace(',', "");
        let is_negative = raw.trim().starts_with('(') && raw.trim().ends_with(')');
        let numeric_part = raw.trim().trim_matches(|c| c == '(' || c == ')');
        let amount = numeric_part.trim().parse::<f64>()?;
        Ok(AmountModel(if is_negative { -amount } else { amount }))
    }
}

impl From<AmountModel> for f64 {
    fn from(m: AmountModel) -> Self {
        m.0
    }
}

/// Forms store numbers loosely (sometimes as strings, sometimes missing). Any
/// value that does not read as a finite number counts as zero.
fn lenient(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<AmountModel>().ok().map(Into::into),
        _ => None,
    }?;
    amount.is_finite().then_some(amount)
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient(&value).unwrap_or(0.0))
}

pub(crate) fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient(&value))
}
