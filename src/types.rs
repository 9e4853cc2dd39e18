use std::fmt;

/// Logical id of a peripheral instance (e.g. which CAN bus)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub i32);

impl From<i32> for ChannelId {
    fn from(id: i32) -> Self {
        ChannelId(id)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Board pin number as understood by the HAL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId(pub i32);

impl From<i32> for PinId {
    fn from(id: i32) -> Self {
        PinId(id)
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration trait that must be implemented by all peripheral configurations
pub trait Config: Send + Sync {
    fn validate(&self) -> crate::error::Result<()>;
}
