//! Calibration hooks
//!
//! Coefficient transfer is not implemented. The hooks exist so callers can
//! be written against the final API; they succeed without sending anything.
//! The per-variant `save`/`recall` syntax is available from the command set.

use serde::{Deserialize, Serialize};
use tracing::debug;
use vna_detect::Transport;

use crate::device::NanoVna;
use crate::error::VnaError;

/// Calibration coefficients (currently empty)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationData {}

impl<T: Transport> NanoVna<T> {
    /// Read the active calibration
    pub fn get_calibration(&mut self) -> Result<CalibrationData, VnaError> {
        Ok(CalibrationData::default())
    }

    /// Load calibration coefficients into the instrument
    pub fn set_calibration(&mut self, _data: &CalibrationData) -> Result<(), VnaError> {
        Ok(())
    }

    /// Store the active calibration in `slot`
    pub fn save_calibration(&mut self, slot: u8) -> Result<(), VnaError> {
        let command = self.hardware_info().command_set.calibration_save_command(slot);
        debug!("calibration save not implemented, not sending {:?}", command);
        Ok(())
    }

    /// Recall the calibration stored in `slot`
    pub fn load_calibration(&mut self, slot: u8) -> Result<(), VnaError> {
        let command = self.hardware_info().command_set.calibration_load_command(slot);
        debug!("calibration recall not implemented, not sending {:?}", command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vna_detect::ChannelConfig;
    use vna_protocol::HardwareVariant;
    use vna_sim::VirtualVna;

    #[test]
    fn test_hooks_send_nothing() {
        let mut vna = NanoVna::with_transport(
            "sim",
            VirtualVna::new(HardwareVariant::Vh),
            ChannelConfig::immediate(),
        );
        assert_eq!(vna.get_calibration().unwrap(), CalibrationData::default());
        vna.set_calibration(&CalibrationData::default()).unwrap();
        vna.save_calibration(1).unwrap();
        vna.load_calibration(1).unwrap();
        assert!(vna.transport().unwrap().commands().is_empty());
    }
}
