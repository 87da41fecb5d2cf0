//! Session identification state

use vna_protocol::{HardwareInfo, HardwareVariant, VnaDatabase};

/// How the session came to know its variant
///
/// Hardware limits are always looked up from the variant held here, so the
/// two cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing identified yet; conservative defaults apply
    #[default]
    Unidentified,
    /// Identified by probing the instrument
    Detected {
        variant: HardwareVariant,
        /// Label of the matching probe rule
        version: &'static str,
    },
    /// Set by the caller without probing
    Forced { variant: HardwareVariant },
}

impl SessionState {
    /// Variant in effect
    pub fn variant(&self) -> HardwareVariant {
        match self {
            SessionState::Unidentified => HardwareVariant::Unknown,
            SessionState::Detected { variant, .. } | SessionState::Forced { variant } => *variant,
        }
    }

    /// Version label in effect
    pub fn version(&self) -> &'static str {
        match self {
            SessionState::Detected { version, .. } => version,
            _ => self.variant().version_label(),
        }
    }

    /// Registry entry for the variant in effect
    pub fn hardware_info(&self) -> &'static HardwareInfo {
        VnaDatabase::lookup(self.variant())
    }

    /// Whether a variant has been detected or forced
    pub fn is_identified(&self) -> bool {
        !matches!(self, SessionState::Unidentified)
    }
}
