//! Per-session option flags.

use bitflags::bitflags;

bitflags! {
    /// Options a client toggles with the `options` verb.
    ///
    /// Each accepted connection starts from `SessionOptions::default()`;
    /// nothing carries over between sessions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SessionOptions: u32 {
        /// Hold the JTAG lines high-impedance outside of device sessions.
        const JTAG_HIGH_Z = 1 << 0;
    }
}

impl SessionOptions {
    pub fn jtag_high_z(&self) -> bool {
        self.contains(SessionOptions::JTAG_HIGH_Z)
    }

    /// Human-readable summary for `options view`.
    pub fn describe(&self) -> String {
        let state = if self.jtag_high_z() { "ON" } else { "OFF" };
        format!("Jtag to High-Z:\t{state}")
    }
}
