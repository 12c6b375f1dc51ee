use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage slot the nickname lives under unless configured otherwise.
pub const DEFAULT_NICKNAME_KEY: &str = "@nickname";

pub const CREATE_PROMPT: &str = "Create your nickname";
pub const INPUT_PLACEHOLDER: &str = "Enter Your Nickname";

/// The single user-editable value. `Present("")` is what an emptied text
/// field holds; it is never a valid save candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Nickname {
    #[default]
    Absent,
    Present(String),
}

impl Nickname {
    pub fn present(value: impl Into<String>) -> Self {
        Self::Present(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Absent and empty values are rejected before storage is touched.
    pub fn is_saveable(&self) -> bool {
        matches!(self, Self::Present(value) if !value.is_empty())
    }

    /// Text to show in the bound input field.
    pub fn input_text(&self) -> &str {
        self.as_str().unwrap_or_default()
    }

    pub fn heading(&self) -> Heading {
        match self {
            Self::Present(value) if !value.is_empty() => Heading::Greeting(value.clone()),
            _ => Heading::Create,
        }
    }
}

impl From<Option<String>> for Nickname {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

impl From<Nickname> for Option<String> {
    fn from(value: Nickname) -> Self {
        match value {
            Nickname::Absent => None,
            Nickname::Present(value) => Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heading {
    Create,
    Greeting(String),
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str(CREATE_PROMPT),
            Self::Greeting(name) => write!(f, "Hello {name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmChoice {
    Cancel,
    Ok,
}

impl ConfirmChoice {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cancel => "Cancel",
            Self::Ok => "OK",
        }
    }
}

/// Blocking dialog raised when an empty nickname is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPrompt {
    pub title: String,
    pub message: String,
    pub choices: [ConfirmChoice; 2],
}

impl ConfirmationPrompt {
    pub fn empty_nickname() -> Self {
        Self {
            title: "ERROR".to_string(),
            message: "Nickname should not be full".to_string(),
            choices: [ConfirmChoice::Cancel, ConfirmChoice::Ok],
        }
    }

    /// Both choices only dismiss the dialog.
    pub fn resolve(&self, choice: ConfirmChoice) {
        tracing::info!(choice = choice.label(), "{} pressed", choice.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_nicknames_are_not_saveable() {
        assert!(!Nickname::Absent.is_saveable());
        assert!(!Nickname::present("").is_saveable());
        assert!(Nickname::present("Ann").is_saveable());
    }

    #[test]
    fn heading_falls_back_to_create_prompt_for_empty_value() {
        assert_eq!(Nickname::Absent.heading().to_string(), "Create your nickname");
        assert_eq!(Nickname::present("").heading().to_string(), "Create your nickname");
        assert_eq!(Nickname::present("Ann").heading().to_string(), "Hello Ann");
    }

    #[test]
    fn converts_from_optional_storage_value() {
        assert_eq!(Nickname::from(None), Nickname::Absent);
        assert_eq!(
            Nickname::from(Some("Ann".to_string())),
            Nickname::present("Ann")
        );
        assert_eq!(Option::<String>::from(Nickname::Absent), None);
    }

    #[test]
    fn serializes_with_explicit_state_tag() {
        let json = serde_json::to_string(&Nickname::present("Ann")).expect("serialize");
        assert_eq!(json, r#"{"state":"present","value":"Ann"}"#);
        let json = serde_json::to_string(&Nickname::Absent).expect("serialize");
        assert_eq!(json, r#"{"state":"absent"}"#);
    }

    #[test]
    fn empty_nickname_prompt_offers_cancel_and_ok() {
        let prompt = ConfirmationPrompt::empty_nickname();
        assert_eq!(prompt.title, "ERROR");
        assert_eq!(prompt.choices, [ConfirmChoice::Cancel, ConfirmChoice::Ok]);
    }
}
