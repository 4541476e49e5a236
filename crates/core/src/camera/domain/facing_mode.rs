use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested physical camera orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    #[default]
    Front,
    Back,
}

impl FacingMode {
    pub const ALL: &'static [FacingMode] = &[FacingMode::Front, FacingMode::Back];

    /// Media-constraint value for this orientation.
    pub fn constraint(self) -> &'static str {
        match self {
            FacingMode::Front => "user",
            FacingMode::Back => "environment",
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacingMode::Front => write!(f, "front"),
            FacingMode::Back => write!(f, "back"),
        }
    }
}

impl FromStr for FacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" | "user" => Ok(FacingMode::Front),
            "back" | "rear" | "environment" => Ok(FacingMode::Back),
            other => Err(format!(
                "facing mode must be 'front' or 'back', got '{other}'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_constraint_values() {
        assert_eq!(FacingMode::Front.constraint(), "user");
        assert_eq!(FacingMode::Back.constraint(), "environment");
    }

    #[rstest]
    #[case("front", FacingMode::Front)]
    #[case("user", FacingMode::Front)]
    #[case("BACK", FacingMode::Back)]
    #[case("rear", FacingMode::Back)]
    #[case(" environment ", FacingMode::Back)]
    fn test_parse(#[case] input: &str, #[case] expected: FacingMode) {
        assert_eq!(input.parse::<FacingMode>().unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("sideways".parse::<FacingMode>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for mode in FacingMode::ALL {
            assert_eq!(mode.to_string().parse::<FacingMode>().unwrap(), *mode);
        }
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&FacingMode::Back).unwrap(), "\"back\"");
        let mode: FacingMode = serde_json::from_str("\"front\"").unwrap();
        assert_eq!(mode, FacingMode::Front);
    }
}
