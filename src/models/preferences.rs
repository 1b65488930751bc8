//! User preferences model
//!
//! Per-user theme selection. Each user id owns at most one row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Unique identifier (uuid string)
    pub id: String,
    /// Owning user id (unique)
    pub user_id: String,
    /// Selected theme
    pub theme: Theme,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Available site themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Default dark theme
    #[default]
    Default,
    /// Ocean theme
    Ocean,
    /// Sunset theme
    Sunset,
    /// Light theme
    Light,
}

impl Theme {
    /// Convert theme to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Ocean => "ocean",
            Theme::Sunset => "sunset",
            Theme::Light => "light",
        }
    }

    /// Parse theme from database string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(Theme::Default),
            "ocean" => Some(Theme::Ocean),
            "sunset" => Some(Theme::Sunset),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_round_trip() {
        for theme in [Theme::Default, Theme::Ocean, Theme::Sunset, Theme::Light] {
            assert_eq!(Theme::from_str(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::from_str("neon"), None);
    }
}
