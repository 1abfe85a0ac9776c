use super::flags::lenient_bool;
use serde::{Deserialize, Serialize};

/// The class of on-screen controls attached to a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardType {
    Reply,
    Inline,
    #[default]
    #[serde(other)]
    None,
}

/// What pressing a button does, as stored by the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    Goto,
    Command,
    Url,
    Contact,
    Location,
    Selection,
    #[default]
    #[serde(other)]
    Default,
}

/// A user-actionable control attached to a node's keyboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Button {
    pub id: String,
    pub text: String,
    pub action: ButtonAction,
    pub target: Option<String>,
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub request_contact: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub request_location: bool,
}

/// The normalized meaning of a button, with its payload attached.
///
/// Every keyboard renderer switches on this once instead of re-reading the raw
/// `action`/`target`/`url`/flag combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind<'a> {
    /// Go to a node; `None` means "follow the owner's outgoing connection".
    Navigate(Option<&'a str>),
    /// Run a command handler, given as `/name` or as a node id.
    Command(Option<&'a str>),
    Url(&'a str),
    RequestContact,
    RequestLocation,
    /// Toggle an option of a multi-select node.
    Selection,
}

impl Button {
    pub fn new(id: impl Into<String>, text: impl Into<String>, action: ButtonAction) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            action,
            ..Self::default()
        }
    }

    /// Shorthand for a `goto` button.
    pub fn goto(id: impl Into<String>, text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::new(id, text, ButtonAction::Goto)
        }
    }

    pub fn kind(&self) -> ButtonKind<'_> {
        let target = non_blank(self.target.as_deref());
        if self.request_contact {
            return ButtonKind::RequestContact;
        }
        if self.request_location {
            return ButtonKind::RequestLocation;
        }
        match self.action {
            ButtonAction::Contact => ButtonKind::RequestContact,
            ButtonAction::Location => ButtonKind::RequestLocation,
            ButtonAction::Command => ButtonKind::Command(target),
            ButtonAction::Url => match non_blank(self.url.as_deref()) {
                Some(url) => ButtonKind::Url(url),
                // a url button without a url degrades to navigation
                None => ButtonKind::Navigate(target),
            },
            ButtonAction::Selection => ButtonKind::Selection,
            ButtonAction::Goto | ButtonAction::Default => ButtonKind::Navigate(target),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
