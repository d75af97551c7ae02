use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

mod cycle;
mod reminder;
pub use cycle::*;
pub use reminder::*;

/// Prayer name -> time string, exactly as the timing service returned it.
pub type PrayerTimings = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }

    /// Matches the timing service's entry names, ignoring case. Informational
    /// entries such as Sunrise or Midnight yield `None`.
    pub fn from_name(name: &str) -> Option<Prayer> {
        let name = name.trim();
        Prayer::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(skip)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// The fields a complete record guarantees, borrowed and trimmed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact<'a> {
    pub email: &'a str,
    pub city: &'a str,
    pub country: &'a str,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, email: &str, city: &str, country: &str) -> Self {
        Self {
            id: id.into(),
            email: Some(email.to_string()),
            city: Some(city.to_string()),
            country: Some(country.to_string()),
        }
    }

    /// Reads a stored profile without failing on odd shapes: non-string
    /// fields and non-object values just leave the fields empty.
    pub fn from_value(id: &str, value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            id: id.to_string(),
            email: field("email"),
            city: field("city"),
            country: field("country"),
        }
    }

    pub fn contact(&self) -> Option<Contact<'_>> {
        fn present(field: &Option<String>) -> Option<&str> {
            field.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        Some(Contact {
            email: present(&self.email)?,
            city: present(&self.city)?,
            country: present(&self.country)?,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.contact().is_some()
    }
}

/// Directory keys cannot contain `.`, so every dot becomes `-`.
pub fn user_key(email: &str) -> String {
    email.trim().replace('.', "-")
}
