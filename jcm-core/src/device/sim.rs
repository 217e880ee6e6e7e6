//! In-memory device used when no hardware is attached, and by tests.
//!
//! Configuration memory starts as all-zero frames (the "golden" image).
//! Fault injection flips bits in that memory, scrubbing and configuration
//! restore it. Every facade call is appended to a journal so callers can
//! check exactly which operations a command performed.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{Device, FaultSite, ReadbackRequest, Register, XadcChannel};

const IDCODE_XC7Z020: u32 = 0x0372_7093;

/// Frame layout of the simulated part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub words_per_frame: u32,
    pub logic_frames: u32,
    pub bram_frames: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            words_per_frame: 101,
            logic_frames: 4096,
            bram_frames: 512,
        }
    }
}

impl Geometry {
    pub fn total_frames(&self) -> u32 {
        self.logic_frames + self.bram_frames
    }
}

#[derive(Debug)]
struct SimState {
    registers: HashMap<Register, u32>,
    /// Only frames that differ from the golden image are stored.
    upsets: HashMap<u32, Vec<u32>>,
    glut_mask: bool,
    active_device: u32,
    rng: StdRng,
}

/// Simulated configuration port.
#[derive(Debug)]
pub struct SimulatedDevice {
    geometry: Geometry,
    state: Mutex<SimState>,
    journal: Mutex<Vec<&'static str>>,
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new(Geometry::default())
    }
}

impl SimulatedDevice {
    pub fn new(geometry: Geometry) -> Self {
        Self::with_rng(geometry, StdRng::from_os_rng())
    }

    /// Reproducible random fault placement.
    pub fn with_seed(geometry: Geometry, seed: u64) -> Self {
        Self::with_rng(geometry, StdRng::seed_from_u64(seed))
    }

    fn with_rng(geometry: Geometry, rng: StdRng) -> Self {
        let mut registers = HashMap::new();
        registers.insert(Register::IdCode, IDCODE_XC7Z020);
        Self {
            geometry,
            state: Mutex::new(SimState {
                registers,
                upsets: HashMap::new(),
                glut_mask: false,
                active_device: 0,
                rng,
            }),
            journal: Mutex::new(Vec::new()),
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Names of the facade operations called so far, oldest first.
    pub fn journal(&self) -> Vec<&'static str> {
        lock(&self.journal).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.journal).len()
    }

    /// Number of frames currently differing from the golden image.
    pub fn upset_frames(&self) -> usize {
        lock(&self.state).upsets.len()
    }

    pub fn glut_mask(&self) -> bool {
        lock(&self.state).glut_mask
    }

    pub fn active_device(&self) -> u32 {
        lock(&self.state).active_device
    }

    fn record(&self, op: &'static str) {
        debug!(op, "simulated device call");
        lock(&self.journal).push(op);
    }

    fn frame_words(&self, state: &SimState, address: u32) -> Vec<u32> {
        state
            .upsets
            .get(&address)
            .cloned()
            .unwrap_or_else(|| vec![0; self.geometry.words_per_frame as usize])
    }

    /// Flip `bits` consecutive bits starting at `word`/`bit` of a frame.
    fn flip(&self, state: &mut SimState, site: FaultSite) -> bool {
        let wpf = self.geometry.words_per_frame;
        let start = site.word as u64 * 32 + site.bit as u64;
        let end = start + site.bits as u64;
        if site.frame_address >= self.geometry.total_frames()
            || site.word >= wpf
            || site.bit >= 32
            || site.bits == 0
            || end > wpf as u64 * 32
        {
            return false;
        }

        let mut frame = self.frame_words(state, site.frame_address);
        for index in start..end {
            frame[(index / 32) as usize] ^= 1 << (index % 32);
        }
        if frame.iter().all(|w| *w == 0) {
            state.upsets.remove(&site.frame_address);
        } else {
            state.upsets.insert(site.frame_address, frame);
        }
        true
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Device for SimulatedDevice {
    fn read_register(&self, register: Register, _high_z: bool) -> u32 {
        self.record("read_register");
        lock(&self.state)
            .registers
            .get(&register)
            .copied()
            .unwrap_or(0)
    }

    fn write_register(&self, register: Register, value: u32, _high_z: bool) {
        self.record("write_register");
        lock(&self.state).registers.insert(register, value);
    }

    fn words_per_frame(&self) -> u32 {
        self.record("words_per_frame");
        self.geometry.words_per_frame
    }

    fn num_logic_frames(&self) -> u32 {
        self.record("num_logic_frames");
        self.geometry.logic_frames
    }

    fn num_bram_frames(&self) -> u32 {
        self.record("num_bram_frames");
        self.geometry.bram_frames
    }

    fn total_frames(&self) -> u32 {
        self.record("total_frames");
        self.geometry.total_frames()
    }

    fn frame_address_array(&self) -> Vec<u32> {
        self.record("frame_address_array");
        (0..self.geometry.total_frames()).collect()
    }

    fn read_frames(&self, address: u32, count: u32, _high_z: bool) -> Vec<u32> {
        self.record("read_frames");
        let state = lock(&self.state);
        (0..count)
            .flat_map(|i| self.frame_words(&state, address.wrapping_add(i)))
            .collect()
    }

    fn read_bscan(&self, _channel: u8, words: u32, _high_z: bool) -> Vec<u32> {
        self.record("read_bscan");
        vec![0; words as usize]
    }

    fn read_full_device(&self, request: &ReadbackRequest, _high_z: bool) -> bool {
        self.record("read_full_device");
        let frames = if request.read_bram {
            self.geometry.total_frames()
        } else {
            self.geometry.logic_frames
        };

        let mut state = lock(&self.state);
        if request.clear_glut_mask {
            state.glut_mask = false;
        }
        let mut image = Vec::with_capacity((frames * self.geometry.words_per_frame * 4) as usize);
        for address in 0..frames {
            for word in self.frame_words(&state, address) {
                image.extend_from_slice(&word.to_le_bytes());
            }
        }
        drop(state);

        std::fs::File::create(&request.path)
            .and_then(|mut f| f.write_all(&image))
            .is_ok()
    }

    fn read_xadc(&self, channel: XadcChannel) -> f32 {
        self.record("read_xadc");
        match channel {
            XadcChannel::Temperature => 45.2,
            XadcChannel::MaxTemperature => 51.7,
            XadcChannel::VccInt => 1000.0,
            XadcChannel::MaxVccInt => 1012.0,
            XadcChannel::VccAux => 1800.0,
            XadcChannel::MaxVccAux => 1806.0,
        }
    }

    fn issue_capture(&self, _high_z: bool) {
        self.record("issue_capture");
    }

    fn issue_prog(&self, _wbstar: u32, _high_z: bool) {
        self.record("issue_prog");
        lock(&self.state).upsets.clear();
    }

    fn inject_multi_frame_fault(&self, frame_address: u32, command: u32, _high_z: bool) {
        self.record("inject_multi_frame_fault");
        let mut state = lock(&self.state);
        state.registers.insert(Register::Cmd, command);
        let site = FaultSite {
            frame_address,
            word: 0,
            bit: 0,
            bits: 1,
        };
        self.flip(&mut state, site);
    }

    fn inject_random_fault(&self, bits: u32, repair: bool, _high_z: bool) -> bool {
        self.record("inject_random_fault");
        let wpf = self.geometry.words_per_frame;
        if bits == 0 || bits > wpf * 32 || self.geometry.total_frames() == 0 {
            return false;
        }

        let mut state = lock(&self.state);
        let frame_address = state.rng.random_range(0..self.geometry.total_frames());
        let start = state.rng.random_range(0..=wpf * 32 - bits);
        let site = FaultSite {
            frame_address,
            word: start / 32,
            bit: start % 32,
            bits,
        };
        if !self.flip(&mut state, site) {
            return false;
        }
        if repair {
            self.flip(&mut state, site);
        }
        true
    }

    fn inject_fault(&self, site: FaultSite, _high_z: bool) -> bool {
        self.record("inject_fault");
        let mut state = lock(&self.state);
        self.flip(&mut state, site)
    }

    fn blind_scrub(&self, _high_z: bool) {
        self.record("blind_scrub");
        lock(&self.state).upsets.clear();
    }

    fn configure_device(&self) -> bool {
        self.record("configure_device");
        lock(&self.state).upsets.clear();
        true
    }

    fn set_active_device_index(&self, index: u32) {
        self.record("set_active_device_index");
        lock(&self.state).active_device = index;
    }

    fn set_glut_mask_bit(&self, _high_z: bool) {
        self.record("set_glut_mask_bit");
        lock(&self.state).glut_mask = true;
    }

    fn clear_glut_mask_bit(&self, _high_z: bool) {
        self.record("clear_glut_mask_bit");
        lock(&self.state).glut_mask = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SimulatedDevice {
        SimulatedDevice::new(Geometry {
            words_per_frame: 4,
            logic_frames: 8,
            bram_frames: 2,
        })
    }

    #[test]
    fn fresh_device_reads_golden_frames() {
        let dev = small();
        assert_eq!(dev.read_frames(3, 2, false), vec![0; 8]);
        assert_eq!(dev.read_register(Register::IdCode, false), IDCODE_XC7Z020);
        assert_eq!(dev.journal(), vec!["read_frames", "read_register"]);
    }

    #[test]
    fn fault_flips_and_scrub_restores() {
        let dev = small();
        let site = FaultSite {
            frame_address: 2,
            word: 1,
            bit: 31,
            bits: 2,
        };
        assert!(dev.inject_fault(site, false));
        assert_eq!(dev.read_frames(2, 1, false), vec![0, 0x8000_0000, 1, 0]);
        assert_eq!(dev.upset_frames(), 1);

        dev.blind_scrub(false);
        assert_eq!(dev.upset_frames(), 0);
    }

    #[test]
    fn fault_outside_frame_fails() {
        let dev = small();
        let past_end = FaultSite {
            frame_address: 0,
            word: 3,
            bit: 31,
            bits: 2,
        };
        assert!(!dev.inject_fault(past_end, false));
        let bad_frame = FaultSite {
            frame_address: 10,
            word: 0,
            bit: 0,
            bits: 1,
        };
        assert!(!dev.inject_fault(bad_frame, false));
    }

    #[test]
    fn repaired_random_fault_leaves_no_upset() {
        let dev = small();
        assert!(dev.inject_random_fault(3, true, false));
        assert_eq!(dev.upset_frames(), 0);
        assert!(dev.inject_random_fault(3, false, false));
        assert_eq!(dev.upset_frames(), 1);
        assert!(!dev.inject_random_fault(0, false, false));
    }

    #[test]
    fn registers_round_trip_and_glut_mask_toggles() {
        let dev = small();
        dev.write_register(Register::Far, 0x0040_0000, false);
        assert_eq!(dev.read_register(Register::Far, false), 0x0040_0000);
        dev.set_glut_mask_bit(false);
        assert!(dev.glut_mask());
        dev.clear_glut_mask_bit(false);
        assert!(!dev.glut_mask());
    }

    #[test]
    fn readback_writes_logic_image() {
        let dev = small();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readback.data");
        dev.set_glut_mask_bit(false);
        assert!(dev.read_full_device(&ReadbackRequest::logic_only(&path), false));
        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(len, 8 * 4 * 4);
        assert!(!dev.glut_mask());
    }

    #[test]
    fn seeded_devices_place_faults_alike() {
        let geometry = Geometry {
            words_per_frame: 4,
            logic_frames: 64,
            bram_frames: 0,
        };
        let a = SimulatedDevice::with_seed(geometry, 7);
        let b = SimulatedDevice::with_seed(geometry, 7);
        for _ in 0..5 {
            assert!(a.inject_random_fault(1, false, false));
            assert!(b.inject_random_fault(1, false, false));
        }
        assert_eq!(a.read_frames(0, 64, false), b.read_frames(0, 64, false));
    }

    #[test]
    fn random_fault_spanning_whole_frame_fits() {
        let dev = small();
        assert!(dev.inject_random_fault(4 * 32, false, false));
        assert_eq!(dev.upset_frames(), 1);
        assert!(!dev.inject_random_fault(4 * 32 + 1, false, false));
    }
}
