//! Command interpretation.
//!
//! [`Dispatcher::dispatch`] turns one tokenized [`Command`] into an
//! [`Outcome`]. Routing is a static tree (see `routes`); every leaf either
//! calls the [`Device`] facade or replies with fixed text. Argument errors
//! are caught before the facade is touched and come back as text replies,
//! so a bad command never ends a session.

mod args;
mod errors;
mod handlers;
pub(crate) mod router;
mod routes;
pub mod strings;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::command::Command;
use crate::device::Device;
use crate::options::SessionOptions;
use crate::response::Response;

pub use args::{Radix, parse_number};
pub use errors::{DispatchError, NumericError};
pub use router::{Arity, Unimplemented};

/// Default file written by `readback`.
pub const DEFAULT_READBACK_PATH: &str = "/tmp/readBack.data";

/// What the session should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send this as a fresh response.
    Reply(Response),
    /// Send the previous response again.
    Resend,
    /// End the session without sending anything.
    Exit,
}

impl Outcome {
    pub fn text(text: impl Into<String>) -> Self {
        Outcome::Reply(Response::text(text))
    }

    pub fn response(&self) -> Option<&Response> {
        match self {
            Outcome::Reply(response) => Some(response),
            Outcome::Resend | Outcome::Exit => None,
        }
    }
}

/// Shared, stateless command interpreter.
///
/// Clone freely; all sessions share the same device handle. Per-session
/// state lives in the [`SessionOptions`] passed to each call.
#[derive(Clone)]
pub struct Dispatcher {
    device: Arc<dyn Device>,
    readback_path: Arc<PathBuf>,
}

impl Dispatcher {
    pub fn new(device: Arc<dyn Device>) -> Self {
        Self {
            device,
            readback_path: Arc::new(PathBuf::from(DEFAULT_READBACK_PATH)),
        }
    }

    /// Where `readback` writes the configuration image.
    pub fn with_readback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.readback_path = Arc::new(path.into());
        self
    }

    pub fn device(&self) -> &Arc<dyn Device> {
        &self.device
    }

    pub fn readback_path(&self) -> &Path {
        &self.readback_path
    }

    pub fn dispatch(&self, command: &Command, options: &mut SessionOptions) -> Outcome {
        if command.is_empty() {
            return Outcome::Reply(DispatchError::Empty.into_response());
        }

        let mut inv = router::Invocation {
            command,
            device: self.device.as_ref(),
            options,
            readback_path: &self.readback_path,
            usage: strings::INVALID_ARGS,
        };
        match router::route(&routes::TOP, &mut inv) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(
                    command = command.line(),
                    category = e.category(),
                    error = %e,
                    "command rejected"
                );
                Outcome::Reply(e.into_response())
            }
        }
    }

    /// Tokenize and dispatch a raw command line.
    pub fn dispatch_line(&self, line: &str, options: &mut SessionOptions) -> Outcome {
        self.dispatch(&Command::parse(line), options)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("readback_path", &self.readback_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Register, SimulatedDevice};
    use crate::response::ResponseKind;

    fn setup() -> (Arc<SimulatedDevice>, Dispatcher) {
        let device = Arc::new(SimulatedDevice::default());
        let dispatcher = Dispatcher::new(device.clone());
        (device, dispatcher)
    }

    fn text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Reply(r) => r.as_text().expect("text reply").to_string(),
            other => panic!("expected a reply, got {other:?}"),
        }
    }

    fn run(dispatcher: &Dispatcher, line: &str) -> Outcome {
        dispatcher.dispatch_line(line, &mut SessionOptions::default())
    }

    #[test]
    fn empty_and_unknown() {
        let (device, d) = setup();
        assert_eq!(text(run(&d, "")), strings::EMPTY_COMMAND);
        assert_eq!(text(run(&d, "   \t ")), strings::EMPTY_COMMAND);
        assert_eq!(text(run(&d, "frobnicate")), strings::UNKNOWN_COMMAND);
        assert_eq!(device.call_count(), 0);
    }

    #[test]
    fn echo_keeps_spacing() {
        let (_, d) = setup();
        assert_eq!(text(run(&d, "echo hello  world")), "hello  world");
        assert_eq!(text(run(&d, "echo")), strings::NO_ECHO_MESSAGE);
    }

    #[test]
    fn exit_and_resend_are_outcomes() {
        let (device, d) = setup();
        assert_eq!(run(&d, "exit"), Outcome::Exit);
        assert_eq!(run(&d, "resend"), Outcome::Resend);
        assert_eq!(device.call_count(), 0);
    }

    #[test]
    fn short_commands_never_reach_the_device() {
        let (device, d) = setup();
        for line in [
            "read",
            "read frame",
            "read bscan 1",
            "write",
            "write far",
            "op",
            "op injectfault",
            "op injectfault normal 1 2 3",
            "op injectfault random",
            "op scrub",
            "options",
            "options jtagtohighz",
        ] {
            let reply = text(run(&d, line));
            assert!(!reply.is_empty(), "{line}");
        }
        assert_eq!(device.call_count(), 0, "journal: {:?}", device.journal());
    }

    #[test]
    fn specify_texts() {
        let (_, d) = setup();
        assert_eq!(text(run(&d, "read")), strings::READ_SPECIFY);
        assert_eq!(text(run(&d, "w")), strings::WRITE_SPECIFY);
        assert_eq!(text(run(&d, "op")), strings::OP_SPECIFY);
        assert_eq!(text(run(&d, "o")), strings::OPTION_SPECIFY);
        assert_eq!(text(run(&d, "op scrub")), strings::SCRUB_SPECIFY);
        assert_eq!(text(run(&d, "read nothing")), strings::READ_UNKNOWN);
        assert_eq!(text(run(&d, "write idcode 1")), strings::WRITE_UNKNOWN);
    }

    #[test]
    fn bad_hex_is_rejected_before_the_device() {
        let (device, d) = setup();
        assert_eq!(text(run(&d, "write far xyz")), strings::WRITE_INVALID_ARGS);
        assert_eq!(text(run(&d, "write far 123456789")), strings::OUT_OF_RANGE);
        assert_eq!(text(run(&d, "read frame 0x10")), strings::READ_INVALID_ARGS);
        assert_eq!(device.call_count(), 0);
    }

    #[test]
    fn register_write_then_read() {
        let (device, d) = setup();
        assert_eq!(text(run(&d, "write far 00400100")), strings::SUCCESS);
        let Outcome::Reply(reply) = run(&d, "read far") else {
            panic!("expected reply");
        };
        assert_eq!(reply.kind(), ResponseKind::Binary);
        assert_eq!(reply.to_words(), vec![0x0040_0100]);
        assert_eq!(device.journal(), vec!["write_register", "read_register"]);
        assert_eq!(device.read_register(Register::Far, false), 0x0040_0100);
    }

    #[test]
    fn frame_read_is_doubled() {
        let (device, d) = setup();
        let Outcome::Reply(reply) = run(&d, "read frame 10 3") else {
            panic!("expected reply");
        };
        assert_eq!(reply.len(), 3 * 101 * 4);
        assert_eq!(
            device.journal(),
            vec!["words_per_frame", "clear_glut_mask_bit", "read_frames", "read_frames"]
        );
    }

    #[test]
    fn frame_count_zero_is_usage() {
        let (device, d) = setup();
        assert_eq!(text(run(&d, "read frame 10 0")), strings::READ_INVALID_ARGS);
        assert_eq!(device.call_count(), 0);
    }

    #[test]
    fn bscan_channel_bounds() {
        let (device, d) = setup();
        assert_eq!(text(run(&d, "read bscan 5 2")), strings::BSCAN_INVALID_CHANNEL);
        assert_eq!(text(run(&d, "read bscan 1")), strings::READ_INVALID_ARGS);
        assert_eq!(device.call_count(), 0);
        let Outcome::Reply(reply) = run(&d, "read bscan 2 4") else {
            panic!("expected reply");
        };
        assert_eq!(reply.len(), 16);
    }

    #[test]
    fn xadc_summary_and_channels() {
        let (_, d) = setup();
        let summary = text(run(&d, "read xadc"));
        assert_eq!(summary.lines().count(), 6);
        assert!(summary.starts_with("xadc temp = 45.2 C"));
        let Outcome::Reply(reply) = run(&d, "read xadc vccint") else {
            panic!("expected reply");
        };
        assert_eq!(reply.payload().as_ref(), 1000.0f32.to_le_bytes());
        assert_eq!(text(run(&d, "read xadc bogus")), strings::XADC_UNKNOWN);
    }

    #[test]
    fn options_are_per_call_state() {
        let (_, d) = setup();
        let mut options = SessionOptions::default();
        assert_eq!(
            text(d.dispatch_line("options jtagtohighz on", &mut options)),
            strings::HIGH_Z_ON
        );
        assert!(options.jtag_high_z());
        assert_eq!(
            text(d.dispatch_line("options view", &mut options)),
            "Jtag to High-Z:\tON"
        );
        assert_eq!(
            text(d.dispatch_line("options jtagtohighz maybe", &mut options)),
            strings::INVALID_ARGS
        );
        assert!(options.jtag_high_z());
        assert_eq!(text(run(&d, "options view")), "Jtag to High-Z:\tOFF");
    }

    #[test]
    fn glutmask_values() {
        let (device, d) = setup();
        assert_eq!(text(run(&d, "write glutmask set")), strings::GLUTMASK_SET);
        assert!(device.glut_mask());
        assert_eq!(text(run(&d, "write glutmask 0")), strings::GLUTMASK_CLEARED);
        assert!(!device.glut_mask());
        assert_eq!(text(run(&d, "write glutmask 2")), strings::GLUTMASK_INVALID);
    }

    #[test]
    fn fault_injection_and_scrub() {
        let (device, d) = setup();
        assert_eq!(
            text(run(&d, "op injectfault normal 20 3 4 2")),
            strings::FAULT_NORMAL_OK
        );
        assert_eq!(device.upset_frames(), 1);
        assert_eq!(
            text(run(&d, "op i n 99999 0 0 1")),
            strings::FAULT_NORMAL_FAILED
        );
        assert_eq!(text(run(&d, "op scrub blind")), strings::SUCCESS);
        assert_eq!(device.upset_frames(), 0);

        assert_eq!(
            text(run(&d, "op injectfault random 3 repairfault")),
            strings::FAULT_RANDOM_OK
        );
        assert_eq!(device.upset_frames(), 0);
        assert_eq!(
            text(run(&d, "op injectfault normal 1 2 3")),
            strings::FAULT_NORMAL_USAGE
        );
    }

    #[test]
    fn reserved_commands_reply_not_implemented() {
        let (device, d) = setup();
        assert_eq!(text(run(&d, "setup")), "Not yet implemented");
        assert_eq!(text(run(&d, "op scrub hybrid")), "Not yet implemented");
        assert_eq!(text(run(&d, "write bscan 1 2")), "Bscan write not implemented");
        assert_eq!(
            text(run(&d, "op injectfault spartan")),
            "Not yet implemented (maybe never)"
        );
        assert_eq!(device.call_count(), 0);
    }

    #[test]
    fn help_texts() {
        let (_, d) = setup();
        assert_eq!(text(run(&d, "help")), strings::HELP);
        assert_eq!(text(run(&d, "?")), strings::HELP);
        assert_eq!(text(run(&d, "read help")), strings::HELP_READ);
        assert_eq!(text(run(&d, "options help")), strings::HELP_OPTIONS);
    }

    #[test]
    fn readback_writes_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readBack.data");
        let device = Arc::new(SimulatedDevice::default());
        let d = Dispatcher::new(device).with_readback_path(&path);

        assert_eq!(text(run(&d, "readback")), strings::READBACK_OK);
        let image = std::fs::metadata(&path).expect("image written");
        assert_eq!(image.len(), 4096 * 101 * 4);
    }

    #[test]
    fn readback_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let device = Arc::new(SimulatedDevice::default());
        let d = Dispatcher::new(device.clone())
            .with_readback_path(dir.path().join("absent").join("readBack.data"));

        assert_eq!(text(run(&d, "readback")), strings::READBACK_FAILED);
        assert_eq!(device.journal(), vec!["read_full_device"]);
    }

    /// The error a command is rejected with, if any.
    fn rejection(d: &Dispatcher, line: &str) -> Option<DispatchError> {
        let command = Command::parse(line);
        let mut options = SessionOptions::default();
        let mut inv = router::Invocation {
            command: &command,
            device: d.device.as_ref(),
            options: &mut options,
            readback_path: &d.readback_path,
            usage: strings::INVALID_ARGS,
        };
        router::route(&routes::TOP, &mut inv).err()
    }

    #[test]
    fn high_z_toggles_within_a_session() {
        let (device, d) = setup();
        let mut options = SessionOptions::default();
        for (line, reply) in [
            ("options jtagtohighz on", strings::HIGH_Z_ON),
            ("options view", "Jtag to High-Z:\tON"),
            ("options jtagtohighz off", strings::HIGH_Z_OFF),
            ("options view", "Jtag to High-Z:\tOFF"),
        ] {
            assert_eq!(text(d.dispatch_line(line, &mut options)), reply, "{line}");
        }
        assert!(!options.jtag_high_z());
        assert_eq!(device.call_count(), 0);
    }

    #[test]
    fn geometry_counters_make_one_call_each() {
        for (line, call, value) in [
            ("read numlogicframes", "num_logic_frames", 4096),
            ("read numbramframes", "num_bram_frames", 512),
            ("read numtotalframes", "total_frames", 4608),
            ("read wordsperframe", "words_per_frame", 101),
        ] {
            let (device, d) = setup();
            let Outcome::Reply(reply) = run(&d, line) else {
                panic!("expected reply to {line}");
            };
            assert_eq!(reply.kind(), ResponseKind::Binary);
            assert_eq!(reply.to_words(), vec![value], "{line}");
            assert_eq!(device.journal(), vec![call], "{line}");
        }
    }

    #[test]
    fn frame_address_list_is_binary() {
        let (device, d) = setup();
        let Outcome::Reply(reply) = run(&d, "read fradlist") else {
            panic!("expected reply");
        };
        let addresses = reply.to_words();
        assert_eq!(addresses.len(), 4608);
        assert_eq!(&addresses[..3], &[0, 1, 2]);
        assert_eq!(device.journal(), vec!["frame_address_array"]);
    }

    #[test]
    fn prog_defaults_to_address_zero() {
        let (device, d) = setup();
        assert_eq!(text(run(&d, "op prog")), strings::SUCCESS);
        assert_eq!(text(run(&d, "op prog 00400000")), strings::SUCCESS);
        assert_eq!(device.journal(), vec!["issue_prog", "issue_prog"]);
    }

    #[test]
    fn prog_with_bad_address_makes_no_call() {
        let (device, d) = setup();
        assert_eq!(text(run(&d, "op prog zz")), strings::OP_PROG_USAGE);
        assert_eq!(text(run(&d, "op prog 1FFFFFFFF")), strings::OUT_OF_RANGE);
        assert_eq!(device.call_count(), 0);
    }

    #[test]
    fn capture_and_configure_make_one_call() {
        let (device, d) = setup();
        assert_eq!(text(run(&d, "op capture")), strings::SUCCESS);
        assert_eq!(device.journal(), vec!["issue_capture"]);

        let (device, d) = setup();
        assert_eq!(text(run(&d, "configure")), strings::CONFIGURE_OK);
        assert_eq!(device.journal(), vec!["configure_device"]);
    }

    #[test]
    fn multiframe_fault_sets_command_register() {
        let (device, d) = setup();
        assert_eq!(
            text(run(&d, "op injectfault multiframe 20 0000000D")),
            strings::SUCCESS
        );
        assert_eq!(device.journal(), vec!["inject_multi_frame_fault"]);
        assert_eq!(device.upset_frames(), 1);
        assert_eq!(device.read_register(Register::Cmd, false), 0xD);
    }

    #[test]
    fn multiframe_fault_with_bad_hex_makes_no_call() {
        let (device, d) = setup();
        assert_eq!(
            text(run(&d, "op injectfault multiframe 2g 0D")),
            strings::INVALID_ARGS
        );
        assert_eq!(
            text(run(&d, "op injectfault multiframe 20 0x0D")),
            strings::INVALID_ARGS
        );
        assert_eq!(text(run(&d, "op injectfault multiframe 20")), strings::INVALID_ARGS);
        assert_eq!(device.call_count(), 0);
    }

    #[test]
    fn active_device_takes_a_decimal_index() {
        let (device, d) = setup();
        assert_eq!(
            text(run(&d, "options activedevice 3")),
            strings::ACTIVE_DEVICE_SET
        );
        assert_eq!(device.journal(), vec!["set_active_device_index"]);
        assert_eq!(device.active_device(), 3);
    }

    #[test]
    fn active_device_rejects_non_digits() {
        let (device, d) = setup();
        for line in [
            "options activedevice -1",
            "options activedevice 1a",
            "options activedevice",
        ] {
            assert_eq!(text(run(&d, line)), strings::INVALID_ARGS, "{line}");
        }
        assert_eq!(device.call_count(), 0);
    }

    #[test]
    fn short_write_is_a_usage_error() {
        let (device, d) = setup();
        assert_eq!(text(run(&d, "write bogus")), strings::WRITE_INVALID_ARGS);
        assert_eq!(text(run(&d, "write bogus 1")), strings::WRITE_UNKNOWN);
        assert_eq!(text(run(&d, "write help")), strings::HELP_WRITE);
        assert_eq!(
            rejection(&d, "write bogus"),
            Some(DispatchError::Usage(strings::WRITE_INVALID_ARGS))
        );
        assert_eq!(device.call_count(), 0);
    }

    #[test]
    fn unknown_xadc_register_is_an_unknown_command() {
        let (_, d) = setup();
        let rejected = rejection(&d, "read xadc bogus");
        assert_eq!(
            rejected,
            Some(DispatchError::UnknownCommand(strings::XADC_UNKNOWN))
        );
        assert_eq!(rejected.map(|e| e.category()), Some("unknown"));
    }
}
