//! Device identification queries

use tracing::debug;
use vna_detect::Transport;
use vna_protocol::response;
use vna_protocol::DeviceInfo;

use crate::device::NanoVna;
use crate::error::VnaError;

impl<T: Transport> NanoVna<T> {
    /// Query `info` and extract model, firmware and serial number
    ///
    /// Fields the firmware does not print are left empty; the model falls
    /// back to the variant name.
    pub fn get_info(&mut self) -> Result<DeviceInfo, VnaError> {
        let variant = self.variant();
        let commands = self.hardware_info().command_set;

        let text = self.channel.exchange(commands.info, commands.prompt)?;
        let info = response::parse_device_info(&text, commands.info, commands.prompt, variant);
        debug!("{}: {:?}", self.port(), info);
        Ok(info)
    }

    /// Query `version` and return its first line (empty if none)
    pub fn firmware_version(&mut self) -> Result<String, VnaError> {
        let commands = self.hardware_info().command_set;
        let text = self.channel.exchange(commands.version, commands.prompt)?;
        Ok(response::first_line(&text, commands.version, commands.prompt).unwrap_or_default())
    }
}
