//! Unique identifiers for billing entities

use serde::{Deserialize, Serialize};

/// Unique identifier for a subscribed Service within an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub u16);
