use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Temporal bucket used to group crime records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "Por trimestre", alias = "quarter")]
    Quarter,
    #[default]
    #[serde(rename = "Por mes", alias = "month")]
    Month,
    #[serde(rename = "Por semana", alias = "week")]
    Week,
}

impl Frequency {
    /// The `date_trunc` field name for this bucket.
    pub fn sql_unit(&self) -> &'static str {
        match self {
            Frequency::Quarter => "quarter",
            Frequency::Month => "month",
            Frequency::Week => "week",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Quarter => "Por trimestre",
            Frequency::Month => "Por mes",
            Frequency::Week => "Por semana",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named capability granted to a role.
///
/// The serialized names are the strings stored in `role_permissions` and
/// returned by `/permissions`, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "PREDICT SI")]
    Predict,
    #[serde(rename = "Nuevos datos SI")]
    NewData,
    #[serde(rename = "Nuevos usuarios SI")]
    NewUsers,
    #[serde(rename = "SEE_LOCAL")]
    SeeLocal,
    #[serde(rename = "SEE_ALL")]
    SeeAll,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::Predict,
        Permission::NewData,
        Permission::NewUsers,
        Permission::SeeLocal,
        Permission::SeeAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Predict => "PREDICT SI",
            Permission::NewData => "Nuevos datos SI",
            Permission::NewUsers => "Nuevos usuarios SI",
            Permission::SeeLocal => "SEE_LOCAL",
            Permission::SeeAll => "SEE_ALL",
        }
    }
}

impl FromStr for Permission {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::UnknownPermission(s.to_string()))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which places a caller asks to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "SEE_LOCAL")]
    Local,
    #[serde(rename = "SEE_ALL")]
    All,
}

impl Scope {
    /// The capability a caller must hold to use this scope.
    pub fn required_permission(&self) -> Permission {
        match self {
            Scope::Local => Permission::SeeLocal,
            Scope::All => Permission::SeeAll,
        }
    }
}

/// Whether a forecast row is a fitted historical value or a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Historical,
    Forecast,
}
