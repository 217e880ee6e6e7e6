//! The command tree.
//!
//! ```text
//! help ? setup configure readback scrub fault echo resend exit
//! read|r     far idcode ctrl0 crc crchw crcsw crclive status cor1 cmd
//!            numlogicframes numbramframes numtotalframes wordsperframe
//!            fradlist hwversion xadc frame bscan
//! write|w    far cor1 crcsw glutmask bscan
//! op         capture prog injectfault|i scrub
//!   injectfault   multiframe random|r normal|n spartan
//!   scrub         blind readback hybrid
//! options|option|o   view jtagtohighz activedevice
//! ```

use super::handlers::{op, options, read, top, write};
use super::router::{Arity, Handler, Route, Table, Target, Unimplemented};
use super::strings::*;
use crate::device::Register;

const fn help(text: &'static str) -> Route {
    Route {
        verbs: &["help", "?"],
        arity: Arity::Any,
        usage: text,
        target: Target::Text(text),
    }
}

const fn read_register(verb: &'static [&'static str], register: Register) -> Route {
    leaf(verb, READ_INVALID_ARGS, Target::ReadRegister(register))
}

const fn write_register(verb: &'static [&'static str], register: Register) -> Route {
    leaf(verb, WRITE_INVALID_ARGS, Target::WriteRegister(register))
}

const fn leaf(verbs: &'static [&'static str], usage: &'static str, target: Target) -> Route {
    Route {
        verbs,
        arity: Arity::Any,
        usage,
        target,
    }
}

const fn handler(verbs: &'static [&'static str], usage: &'static str, f: Handler) -> Route {
    leaf(verbs, usage, Target::Handler(f))
}

const fn table(verbs: &'static [&'static str], usage: &'static str, next: &'static Table) -> Route {
    leaf(verbs, usage, Target::Table(next))
}

const fn reserved(verbs: &'static [&'static str], which: Unimplemented) -> Route {
    leaf(verbs, INVALID_ARGS, Target::Unimplemented(which))
}

pub(crate) static TOP: Table = Table {
    depth: 0,
    arity: Arity::Any,
    too_short: INVALID_ARGS,
    missing: EMPTY_COMMAND,
    unknown: UNKNOWN_COMMAND,
    routes: &[
        help(HELP),
        reserved(&["setup"], Unimplemented::Setup),
        handler(&["configure"], INVALID_ARGS, top::configure),
        handler(&["readback"], INVALID_ARGS, top::readback),
        reserved(&["scrub"], Unimplemented::Scrub),
        reserved(&["fault"], Unimplemented::Fault),
        table(&["read", "r"], READ_SPECIFY, &READ),
        table(&["write", "w"], WRITE_SPECIFY, &WRITE),
        table(&["op"], OP_SPECIFY, &OP),
        table(&["options", "option", "o"], OPTION_SPECIFY, &OPTIONS),
        handler(&["echo"], NO_ECHO_MESSAGE, top::echo),
        handler(&["resend"], INVALID_ARGS, top::resend),
        handler(&["exit"], INVALID_ARGS, top::exit),
    ],
};

pub(crate) static READ: Table = Table {
    depth: 1,
    arity: Arity::Any,
    too_short: READ_INVALID_ARGS,
    missing: READ_SPECIFY,
    unknown: READ_UNKNOWN,
    routes: &[
        help(HELP_READ),
        read_register(&["far"], Register::Far),
        read_register(&["idcode"], Register::IdCode),
        read_register(&["ctrl0"], Register::Ctrl0),
        read_register(&["crc"], Register::Crc),
        read_register(&["crchw"], Register::CrcHw),
        read_register(&["crcsw"], Register::CrcSw),
        read_register(&["crclive"], Register::CrcLive),
        read_register(&["status"], Register::Status),
        read_register(&["cor1"], Register::Cor1),
        read_register(&["cmd"], Register::Cmd),
        handler(&["numlogicframes"], READ_INVALID_ARGS, read::num_logic_frames),
        handler(&["numbramframes"], READ_INVALID_ARGS, read::num_bram_frames),
        handler(&["numtotalframes"], READ_INVALID_ARGS, read::num_total_frames),
        handler(&["wordsperframe"], READ_INVALID_ARGS, read::words_per_frame),
        handler(&["fradlist"], READ_INVALID_ARGS, read::frame_address_list),
        reserved(&["hwversion"], Unimplemented::HwVersion),
        handler(&["xadc"], XADC_UNKNOWN, read::xadc),
        handler(&["frame"], READ_INVALID_ARGS, read::frame).with_arity(Arity::AtLeast(3)),
        handler(&["bscan"], READ_INVALID_ARGS, read::bscan).with_arity(Arity::Exactly(4)),
    ],
};

/// Every write needs a value, so a short command is a usage error even
/// when the register name is unknown.
pub(crate) static WRITE: Table = Table {
    depth: 1,
    arity: Arity::AtLeast(3),
    too_short: WRITE_INVALID_ARGS,
    missing: WRITE_SPECIFY,
    unknown: WRITE_UNKNOWN,
    routes: &[
        help(HELP_WRITE),
        write_register(&["far"], Register::Far),
        write_register(&["cor1"], Register::Cor1),
        write_register(&["crcsw"], Register::CrcSw),
        handler(&["glutmask"], WRITE_INVALID_ARGS, write::glutmask),
        leaf(&["bscan"], WRITE_INVALID_ARGS, Target::Unimplemented(Unimplemented::BscanWrite)),
    ],
};

pub(crate) static OP: Table = Table {
    depth: 1,
    arity: Arity::Any,
    too_short: INVALID_ARGS,
    missing: OP_SPECIFY,
    unknown: OP_UNKNOWN,
    routes: &[
        help(HELP_OP),
        handler(&["capture"], INVALID_ARGS, op::capture),
        handler(&["prog"], OP_PROG_USAGE, op::prog),
        table(&["injectfault", "i"], INVALID_ARGS, &INJECT_FAULT),
        table(&["scrub"], SCRUB_SPECIFY, &SCRUB),
    ],
};

pub(crate) static INJECT_FAULT: Table = Table {
    depth: 2,
    arity: Arity::Any,
    too_short: INVALID_ARGS,
    missing: INVALID_ARGS,
    unknown: FAULT_UNKNOWN,
    routes: &[
        handler(&["multiframe"], INVALID_ARGS, op::multiframe_fault)
            .with_arity(Arity::AtLeast(5)),
        handler(&["random", "r"], FAULT_RANDOM_USAGE, op::random_fault)
            .with_arity(Arity::AtLeast(4)),
        handler(&["normal", "n"], FAULT_NORMAL_USAGE, op::normal_fault)
            .with_arity(Arity::Exactly(7)),
        reserved(&["spartan"], Unimplemented::SpartanFault),
    ],
};

pub(crate) static SCRUB: Table = Table {
    depth: 2,
    arity: Arity::Any,
    too_short: INVALID_ARGS,
    missing: SCRUB_SPECIFY,
    unknown: SCRUB_UNKNOWN,
    routes: &[
        handler(&["blind"], INVALID_ARGS, op::blind_scrub),
        reserved(&["readback"], Unimplemented::ReadbackScrub),
        reserved(&["hybrid"], Unimplemented::HybridScrub),
    ],
};

pub(crate) static OPTIONS: Table = Table {
    depth: 1,
    arity: Arity::Any,
    too_short: INVALID_ARGS,
    missing: OPTION_SPECIFY,
    unknown: OPTION_UNKNOWN,
    routes: &[
        help(HELP_OPTIONS),
        handler(&["view"], INVALID_ARGS, options::view),
        handler(&["jtagtohighz"], INVALID_ARGS, options::jtag_to_high_z)
            .with_arity(Arity::AtLeast(3)),
        handler(&["activedevice"], INVALID_ARGS, options::active_device)
            .with_arity(Arity::AtLeast(3)),
    ],
};
