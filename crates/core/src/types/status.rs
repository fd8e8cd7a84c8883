//! Status and channel enums for orders.

use serde::{Deserialize, Serialize};

/// Errors raised by status and channel conversions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// The channel name is not one of the known sales channels.
    #[error("unknown sales channel: {0}")]
    UnknownChannel(String),
    /// The status name is not one of the known order statuses.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),
    /// The order has already been decided and cannot change again.
    #[error("order is already {current} and cannot become {requested}")]
    AlreadyDecided {
        /// Status the order currently has.
        current: OrderStatus,
        /// Status that was requested.
        requested: OrderStatus,
    },
}

/// Sales channel an order is sold through.
///
/// The channel decides which costs apply (shipping surcharge, event fees).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Wholesale,
    Events,
    Online,
}

impl Channel {
    /// Every channel, in display order.
    pub const ALL: [Self; 3] = [Self::Wholesale, Self::Events, Self::Online];

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wholesale => "wholesale",
            Self::Events => "events",
            Self::Online => "online",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wholesale" => Ok(Self::Wholesale),
            "events" => Ok(Self::Events),
            "online" => Ok(Self::Online),
            other => Err(StatusError::UnknownChannel(other.to_owned())),
        }
    }
}

/// Decision status of an order.
///
/// Orders start out `Pending` and move to `Approved` or `Rejected` exactly
/// once; both decided states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    /// Whether the order still awaits a decision.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Compute the status after applying a decision.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::AlreadyDecided`] unless the current status is
    /// `Pending` and the requested one is a decided state.
    pub const fn transition(self, requested: Self) -> Result<Self, StatusError> {
        match (self, requested) {
            (Self::Pending, Self::Approved | Self::Rejected) => Ok(requested),
            (current, requested) => Err(StatusError::AlreadyDecided { current, requested }),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(StatusError::UnknownStatus(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_str() {
        assert_eq!("online".parse::<Channel>().unwrap(), Channel::Online);
        assert_eq!(" Events ".parse::<Channel>().unwrap(), Channel::Events);
        assert_eq!(
            "retail".parse::<Channel>(),
            Err(StatusError::UnknownChannel("retail".to_string()))
        );
    }

    #[test]
    fn test_channel_serde_lowercase() {
        let json = serde_json::to_string(&Channel::Wholesale).unwrap();
        assert_eq!(json, "\"wholesale\"");
        assert!(serde_json::from_str::<Channel>("\"market\"").is_err());
    }

    #[test]
    fn test_pending_can_be_decided() {
        assert_eq!(
            OrderStatus::Pending.transition(OrderStatus::Approved),
            Ok(OrderStatus::Approved)
        );
        assert_eq!(
            OrderStatus::Pending.transition(OrderStatus::Rejected),
            Ok(OrderStatus::Rejected)
        );
    }

    #[test]
    fn test_decided_states_are_terminal() {
        assert!(OrderStatus::Approved.transition(OrderStatus::Rejected).is_err());
        assert!(OrderStatus::Rejected.transition(OrderStatus::Approved).is_err());
        assert!(OrderStatus::Approved.transition(OrderStatus::Approved).is_err());
    }

    #[test]
    fn test_pending_cannot_go_back_to_pending() {
        assert!(OrderStatus::Pending.transition(OrderStatus::Pending).is_err());
    }

    #[test]
    fn test_status_roundtrip_text() {
        for status in [OrderStatus::Pending, OrderStatus::Approved, OrderStatus::Rejected] {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
    }
}
