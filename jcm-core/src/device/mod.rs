//! Device access facade.
//!
//! The dispatcher only talks to hardware through [`Device`]. Every call is
//! synchronous and may block; sessions run dispatch on the blocking pool.
//! One device is shared by all sessions, so implementations serialize
//! access internally.
//!
//! Calls that accept `high_z` leave the JTAG lines in high-impedance mode
//! once the operation finishes when it is `true`.

pub mod sim;

use std::fmt;
use std::path::PathBuf;

pub use sim::{Geometry, SimulatedDevice};

/// Configuration registers reachable through the command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Frame address register.
    Far,
    IdCode,
    Ctrl0,
    Crc,
    /// CRC computed by the configuration logic.
    CrcHw,
    /// CRC written by software for comparison.
    CrcSw,
    /// Running CRC, read without a JTAG session.
    CrcLive,
    Status,
    Cor1,
    Cmd,
}

impl Register {
    pub const ALL: [Register; 10] = [
        Register::Far,
        Register::IdCode,
        Register::Ctrl0,
        Register::Crc,
        Register::CrcHw,
        Register::CrcSw,
        Register::CrcLive,
        Register::Status,
        Register::Cor1,
        Register::Cmd,
    ];

    /// Command-line name of the register.
    pub fn as_str(&self) -> &'static str {
        match self {
            Register::Far => "far",
            Register::IdCode => "idcode",
            Register::Ctrl0 => "ctrl0",
            Register::Crc => "crc",
            Register::CrcHw => "crchw",
            Register::CrcSw => "crcsw",
            Register::CrcLive => "crclive",
            Register::Status => "status",
            Register::Cor1 => "cor1",
            Register::Cmd => "cmd",
        }
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, Register::Far | Register::Cor1 | Register::CrcSw)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// XADC telemetry channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XadcChannel {
    /// Die temperature, °C.
    Temperature,
    MaxTemperature,
    /// Core supply, mV.
    VccInt,
    MaxVccInt,
    /// Auxiliary supply, mV.
    VccAux,
    MaxVccAux,
}

/// Address of a single-event upset to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultSite {
    pub frame_address: u32,
    pub word: u32,
    pub bit: u32,
    /// Number of consecutive bits to flip, starting at `bit`.
    pub bits: u32,
}

/// Parameters for a full-device readback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadbackRequest {
    /// Where the readback image is written.
    pub path: PathBuf,
    pub read_bram: bool,
    pub clear_glut_mask: bool,
    pub issue_capture: bool,
}

impl ReadbackRequest {
    /// Logic frames only, glut mask cleared, no capture.
    pub fn logic_only(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_bram: false,
            clear_glut_mask: true,
            issue_capture: false,
        }
    }
}

/// Hardware operations the command set drives.
pub trait Device: Send + Sync {
    // ── Registers ────────────────────────────────────────────────
    fn read_register(&self, register: Register, high_z: bool) -> u32;
    /// Only called with registers where [`Register::is_writable`] holds.
    fn write_register(&self, register: Register, value: u32, high_z: bool);

    // ── Frame geometry ───────────────────────────────────────────
    fn words_per_frame(&self) -> u32;
    fn num_logic_frames(&self) -> u32;
    fn num_bram_frames(&self) -> u32;
    fn total_frames(&self) -> u32;
    fn frame_address_array(&self) -> Vec<u32>;

    // ── Readback ─────────────────────────────────────────────────
    /// `count` consecutive frames starting at `address`, flattened.
    fn read_frames(&self, address: u32, count: u32, high_z: bool) -> Vec<u32>;
    fn read_bscan(&self, channel: u8, words: u32, high_z: bool) -> Vec<u32>;
    fn read_full_device(&self, request: &ReadbackRequest, high_z: bool) -> bool;

    // ── Telemetry ────────────────────────────────────────────────
    fn read_xadc(&self, channel: XadcChannel) -> f32;

    // ── Operations ───────────────────────────────────────────────
    fn issue_capture(&self, high_z: bool);
    /// Reprogram from the given warm-boot start address.
    fn issue_prog(&self, wbstar: u32, high_z: bool);
    fn inject_multi_frame_fault(&self, frame_address: u32, command: u32, high_z: bool);
    fn inject_random_fault(&self, bits: u32, repair: bool, high_z: bool) -> bool;
    fn inject_fault(&self, site: FaultSite, high_z: bool) -> bool;
    fn blind_scrub(&self, high_z: bool);
    fn configure_device(&self) -> bool;
    fn set_active_device_index(&self, index: u32);
    fn set_glut_mask_bit(&self, high_z: bool);
    fn clear_glut_mask_bit(&self, high_z: bool);
}
