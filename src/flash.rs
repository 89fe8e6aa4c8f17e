use std::fmt;

use serde::Serialize;

use crate::i18n::TranslatableMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashType {
    Success,
    Error,
}

impl FlashType {
    /// Key under which the admin layout reads this kind of message.
    pub fn key(self) -> &'static str {
        match self {
            FlashType::Success => "flash_success",
            FlashType::Error => "flash_error",
        }
    }
}

impl fmt::Display for FlashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Messages to show the user on the next rendered page, in insertion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlashBag {
    messages: Vec<(FlashType, TranslatableMessage)>,
}

impl FlashBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: FlashType, message: TranslatableMessage) {
        self.messages.push((kind, message));
    }

    /// Messages of one kind, without removing them.
    pub fn peek(&self, kind: FlashType) -> Vec<&TranslatableMessage> {
        self.messages
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(FlashType, TranslatableMessage)> {
        self.messages.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
