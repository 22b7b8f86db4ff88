//! One-shot alert messages carried in the `alerts` cookie as `kind=message`.

use std::fmt;

use super::cookies::{decode_text, encode_text};

pub const ALERT_COOKIE_NAME: &str = "alerts";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlertKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl AlertKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(Self::Success),
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "danger" => Some(Self::Danger),
            _ => None,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    #[must_use]
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Danger,
            message: message.into(),
        }
    }

    /// Cookie-safe `kind=message` encoding.
    #[must_use]
    pub fn to_cookie_value(&self) -> String {
        format!("{}={}", self.kind, encode_text(&self.message))
    }

    /// Parse a cookie written by [`Alert::to_cookie_value`]. Unknown kinds are dropped.
    #[must_use]
    pub fn from_cookie_value(raw: &str) -> Option<Self> {
        let (kind, message) = raw.split_once('=')?;
        Some(Self {
            kind: AlertKind::parse(kind)?,
            message: decode_text(message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn danger_alert_cookie_format() {
        let alert = Alert::danger("Invalid password, please try again.");
        let value = alert.to_cookie_value();
        assert!(value.starts_with("danger="));
        assert_eq!(Alert::from_cookie_value(&value), Some(alert));
    }

    #[test]
    fn malformed_alerts_are_ignored() {
        assert_eq!(Alert::from_cookie_value("no separator"), None);
        assert_eq!(Alert::from_cookie_value("fatal=boom"), None);
    }

    #[test]
    fn every_kind_parses_back() {
        for kind in [
            AlertKind::Success,
            AlertKind::Info,
            AlertKind::Warning,
            AlertKind::Danger,
        ] {
            assert_eq!(AlertKind::parse(kind.as_str()), Some(kind));
        }
    }
}
