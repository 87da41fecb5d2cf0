//! USB Vendor/Product IDs of NanoVNA-family instruments
//!
//! The instruments enumerate as USB CDC-ACM devices. The IDs only rank
//! candidate ports; identification always goes through the text probe.

/// USB Vendor ID / Product ID pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbId {
    pub vid: u16,
    pub pid: u16,
}

impl UsbId {
    pub const fn new(vid: u16, pid: u16) -> Self {
        Self { vid, pid }
    }
}

/// STMicroelectronics virtual COM port (NanoVNA v1/-H, TinySA)
pub const STM32_VCP: UsbId = UsbId::new(0x0483, 0x5740);

/// V2 family and LiteVNA firmware
pub const NANOVNA_V2: UsbId = UsbId::new(0x04B4, 0x0008);

/// All IDs known to belong to an analyzer
pub const KNOWN: &[UsbId] = &[STM32_VCP, NANOVNA_V2];

/// Check whether a VID/PID pair belongs to a known analyzer
pub fn is_known(vid: u16, pid: u16) -> bool {
    KNOWN.iter().any(|id| id.vid == vid && id.pid == pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ids() {
        assert!(is_known(0x0483, 0x5740));
        assert!(is_known(0x04B4, 0x0008));
        assert!(!is_known(0x0403, 0x6001));
    }
}
