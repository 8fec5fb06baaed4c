use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// Padel skill level stored in tenths (35 = 3.5). Valid range is 0.0 to 7.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct LevelValue(u8);

impl LevelValue {
    pub const MAX_TENTHS: u8 = 70;

    pub fn from_tenths(tenths: i64) -> Result<Self, BookingError> {
        if (0..=Self::MAX_TENTHS as i64).contains(&tenths) {
            Ok(Self(tenths as u8))
        } else {
            Err(BookingError::InvalidLevel(format!(
                "{} is outside 0.0-7.0",
                tenths as f64 / 10.0
            )))
        }
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl TryFrom<f64> for LevelValue {
    type Error = BookingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(BookingError::InvalidLevel(value.to_string()));
        }
        Self::from_tenths((value * 10.0).round() as i64)
    }
}

impl From<LevelValue> for f64 {
    fn from(value: LevelValue) -> Self {
        value.as_f64()
    }
}

impl FromStr for LevelValue {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(',', ".");
        let value: f64 = normalized
            .parse()
            .map_err(|_| BookingError::InvalidLevel(s.trim().to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for LevelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Level requirement of a class. Free-text inputs ("abierto", "2.5-3.5", "4")
/// all normalize into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Level {
    Open,
    Range { min: LevelValue, max: LevelValue },
}

impl Level {
    pub fn range(min: LevelValue, max: LevelValue) -> Result<Self, BookingError> {
        if min > max {
            return Err(BookingError::InvalidLevel(format!(
                "minimum {min} is above maximum {max}"
            )));
        }
        Ok(Level::Range { min, max })
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Level::Open)
    }

    /// Whether a player of the given level may join. Ranged classes reject
    /// players with no recorded level.
    pub fn check(&self, player: Option<LevelValue>) -> Result<(), BookingError> {
        match (self, player) {
            (Level::Open, _) => Ok(()),
            (Level::Range { .. }, None) => Err(BookingError::LevelUnknown(*self)),
            (Level::Range { min, max }, Some(level)) => {
                if *min <= level && level <= *max {
                    Ok(())
                } else {
                    Err(BookingError::LevelMismatch {
                        player: level,
                        required: *self,
                    })
                }
            }
        }
    }
}

impl FromStr for Level {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Err(BookingError::InvalidLevel("level is required".to_string())),
            "open" | "abierto" | "abierta" | "all" | "todos" => Ok(Level::Open),
            _ => match trimmed.split_once('-') {
                Some((min, max)) => Level::range(min.parse()?, max.parse()?),
                None => {
                    let value: LevelValue = trimmed.parse()?;
                    Ok(Level::Range {
                        min: value,
                        max: value,
                    })
                }
            },
        }
    }
}

impl TryFrom<String> for Level {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.to_string()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Open => write!(f, "open"),
            Level::Range { min, max } if min == max => write!(f, "{min}"),
            Level::Range { min, max } => write!(f, "{min}-{max}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "masculino" | "m" => Ok(Gender::Male),
            "female" | "femenino" | "f" => Ok(Gender::Female),
            other => Err(BookingError::InvalidCategory(other.to_string())),
        }
    }
}

/// Who a class is open to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Open,
    Male,
    Female,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Open => "open",
            Category::Male => "male",
            Category::Female => "female",
        }
    }

    pub fn check(&self, gender: Option<Gender>) -> Result<(), BookingError> {
        let admitted = match self {
            Category::Open => true,
            Category::Male => gender == Some(Gender::Male),
            Category::Female => gender == Some(Gender::Female),
        };
        if admitted {
            Ok(())
        } else {
            Err(BookingError::CategoryMismatch(*self))
        }
    }
}

impl FromStr for Category {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "open" | "abierto" | "abierta" | "mixto" | "mixed" => Ok(Category::Open),
            "male" | "masculino" | "chicos" => Ok(Category::Male),
            "female" | "femenino" | "chicas" => Ok(Category::Female),
            other => Err(BookingError::InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
