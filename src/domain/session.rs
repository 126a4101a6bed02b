//! Browser session contents.

use serde::{Deserialize, Serialize};

use super::user::SessionUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

impl FlashKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashKind::Success => "flash-success",
            FlashKind::Error => "flash-error",
            FlashKind::Info => "flash-info",
        }
    }
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// Everything kept server-side for one browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Signed-in back-office user
    pub user: Option<SessionUser>,
    /// Visitor has entered the site password
    #[serde(default)]
    pub site_access: bool,
    #[serde(default)]
    pub flash: Vec<Flash>,
    /// Admin page to return to after login
    pub return_to: Option<String>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && !self.site_access && self.flash.is_empty() && self.return_to.is_none()
    }

    pub fn push_flash(&mut self, kind: FlashKind, message: impl Into<String>) {
        self.flash.push(Flash {
            kind,
            message: message.into(),
        });
    }

    pub fn take_flash(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flash)
    }
}
