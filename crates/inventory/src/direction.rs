use core::str::FromStr;

use serde::{Deserialize, Serialize};

use retailops_core::DomainError;

/// Direction of a stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentDirection {
    /// Inbound movement: stock increases.
    #[default]
    Entrada,
    /// Outbound movement: stock decreases, never below zero.
    Salida,
}

impl AdjustmentDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentDirection::Entrada => "entrada",
            AdjustmentDirection::Salida => "salida",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            AdjustmentDirection::Entrada => AdjustmentDirection::Salida,
            AdjustmentDirection::Salida => AdjustmentDirection::Entrada,
        }
    }
}

impl core::fmt::Display for AdjustmentDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entrada" | "in" => Ok(AdjustmentDirection::Entrada),
            "salida" | "out" => Ok(AdjustmentDirection::Salida),
            other => Err(DomainError::validation(format!(
                "direction must be one of: entrada, salida (got '{other}')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Entrada".parse::<AdjustmentDirection>().unwrap(), AdjustmentDirection::Entrada);
        assert_eq!(" SALIDA ".parse::<AdjustmentDirection>().unwrap(), AdjustmentDirection::Salida);
        assert_eq!("out".parse::<AdjustmentDirection>().unwrap(), AdjustmentDirection::Salida);
        assert!("sideways".parse::<AdjustmentDirection>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&AdjustmentDirection::Salida).unwrap();
        assert_eq!(json, "\"salida\"");
        let back: AdjustmentDirection = serde_json::from_str("\"entrada\"").unwrap();
        assert_eq!(back, AdjustmentDirection::Entrada);
    }

    #[test]
    fn opposite_flips() {
        assert_eq!(AdjustmentDirection::Entrada.opposite(), AdjustmentDirection::Salida);
        assert_eq!(AdjustmentDirection::Salida.opposite().opposite(), AdjustmentDirection::Salida);
    }
}
