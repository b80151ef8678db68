//! Compact encoding of per-edge traversal attributes.
//!
//! Bit 0 marks an edge as traversable from its base node towards its adjacent node, bit 1 the
//! other way around. Everything above the two direction bits is an opaque profile payload
//! (vehicle class, access restrictions, ...) that the preparation pass only ever compares for
//! equality.

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// Bit marking an edge as traversable from base to adjacent node.
const FORWARD: u32 = 0b01;
/// Bit marking an edge as traversable from adjacent to base node.
const BACKWARD: u32 = 0b10;
/// Number of low bits reserved for the direction encoding.
const PROFILE_SHIFT: u32 = 2;

/// How an edge may be traversed, relative to the node it is viewed from.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum TraversalDirection {
    /// Only away from the viewing node.
    Forward,
    /// Only towards the viewing node.
    Backward,
    /// Both ways.
    Both,
    /// Neither way (closed road, disallowed profile).
    Blocked,
}

/// Opaque, bit-encoded traversal attributes of an edge.
#[derive(Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeFlags(u32);

impl EdgeFlags {
    /// Traversable away from the base node only.
    pub const FORWARD: Self = Self(FORWARD);
    /// Traversable towards the base node only.
    pub const BACKWARD: Self = Self(BACKWARD);
    /// Traversable both ways.
    pub const BOTH: Self = Self(FORWARD | BACKWARD);

    /// Build flags from the two direction bits and no profile payload.
    #[must_use]
    pub const fn new(forward: bool, backward: bool) -> Self {
        let mut bits = 0;
        if forward {
            bits |= FORWARD;
        }
        if backward {
            bits |= BACKWARD;
        }
        Self(bits)
    }

    /// Reinterpret raw bits, e.g. ones read back from storage.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw encoded value.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Largest profile payload that fits above the direction bits.
    pub const MAX_PROFILE: u32 = u32::MAX >> PROFILE_SHIFT;

    /// Replace the profile payload, keeping the direction bits.
    ///
    /// Profiles are 30 bits wide; higher bits of `profile` are dropped.
    ///
    /// # Panics
    ///
    /// In debug builds, if `profile` exceeds [`EdgeFlags::MAX_PROFILE`].
    #[must_use]
    pub const fn with_profile(self, profile: u32) -> Self {
        debug_assert!(profile <= Self::MAX_PROFILE, "profile does not fit in 30 bits");
        Self((self.0 & (FORWARD | BACKWARD)) | ((profile & Self::MAX_PROFILE) << PROFILE_SHIFT))
    }

    /// The opaque profile payload.
    #[must_use]
    pub const fn profile(self) -> u32 {
        self.0 >> PROFILE_SHIFT
    }

    /// Whether the edge can be traversed away from the viewing node.
    #[must_use]
    pub const fn is_forward(self) -> bool {
        self.0 & FORWARD != 0
    }

    /// Whether the edge can be traversed towards the viewing node.
    #[must_use]
    pub const fn is_backward(self) -> bool {
        self.0 & BACKWARD != 0
    }

    /// Classify the direction bits.
    #[must_use]
    pub const fn direction(self) -> TraversalDirection {
        match (self.is_forward(), self.is_backward()) {
            (true, false) => TraversalDirection::Forward,
            (false, true) => TraversalDirection::Backward,
            (true, true) => TraversalDirection::Both,
            (false, false) => TraversalDirection::Blocked,
        }
    }

    /// The same flags seen from the other end of the edge.
    #[must_use]
    pub const fn reversed(self) -> Self {
        let swapped = ((self.0 & FORWARD) << 1) | ((self.0 & BACKWARD) >> 1);
        Self((self.0 & !(FORWARD | BACKWARD)) | swapped)
    }
}

impl fmt::Debug for EdgeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeFlags")
            .field("direction", &self.direction())
            .field("profile", &self.profile())
            .finish()
    }
}
