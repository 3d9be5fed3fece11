/*! Branded ID types for type-safe entity references. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Process ID - branded type to distinguish from other u32 values.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
  Into,
)]
pub struct Pid(pub u32);

/// Handle to one live notification subscription.
///
/// Issued by [`crate::ObserverCenter::subscribe`]; invalid after
/// `unsubscribe` or `remove_all`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
pub struct SubscriptionToken(pub u64);
