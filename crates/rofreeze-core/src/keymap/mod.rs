//! Key names and Windows Virtual Key codes.
//!
//! [`VirtualKey`] is the single key type used across the workspace: the
//! config layer parses it from a name, the hook layer compares it with the
//! `vkCode` of each low-level keyboard event, and the injector feeds it to
//! `SendInput`.

mod windows_vk;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a key name is not in the key table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key name: {0:?}")]
pub struct KeyParseError(pub String);

/// A Windows Virtual Key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualKey(pub u8);

impl VirtualKey {
    pub const Q: VirtualKey = VirtualKey(0x51);
    pub const F3: VirtualKey = VirtualKey(0x72);
    pub const SPACE: VirtualKey = VirtualKey(0x20);

    /// Returns the raw VK code.
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Returns `true` if injecting this key requires the extended-key flag.
    pub fn is_extended(self) -> bool {
        windows_vk::is_extended(self.0)
    }

    /// Returns the canonical name, or `None` for codes outside the key table.
    pub fn name(self) -> Option<String> {
        windows_vk::name_from_vk(self.0)
    }
}

impl FromStr for VirtualKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        windows_vk::vk_from_name(s)
            .map(VirtualKey)
            .ok_or_else(|| KeyParseError(s.to_string()))
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(&name),
            None => write!(f, "VK({:#04x})", self.0),
        }
    }
}

// Serialized by name so config files stay readable (`save_point = "Q"`).
impl Serialize for VirtualKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VirtualKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
