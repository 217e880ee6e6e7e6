//! Fixed reply texts. Clients match on several of these, so they are part
//! of the protocol and must not change casually.

/// Returned by state-changing operations that succeeded. Clients do not
/// print it.
pub const SUCCESS: &str = ".";

pub const EMPTY_COMMAND: &str = "Empty command";
pub const UNKNOWN_COMMAND: &str = "Unknown command";
pub const NO_ECHO_MESSAGE: &str = "No message given";
pub const OUT_OF_RANGE: &str = "Value out of range";
pub const INVALID_ARGS: &str = "Invalid arguments.";
pub const NOTHING_TO_RESEND: &str = "Nothing to resend";

pub const READ_UNKNOWN: &str = "Unknown read command";
pub const READ_SPECIFY: &str = "Specify which register to read";
pub const READ_INVALID_ARGS: &str = "Invalid arguments. Type \"read help\" for details.";
pub const XADC_UNKNOWN: &str = "Unkown XADC register";
pub const BSCAN_INVALID_CHANNEL: &str = "Invalid Bscan number (must be 1-4)";

pub const WRITE_UNKNOWN: &str = "Unknown write command";
pub const WRITE_SPECIFY: &str = "Specify which register to write";
pub const WRITE_INVALID_ARGS: &str = "Invalid arguments. Type \"write help\" for details.";
pub const GLUTMASK_INVALID: &str = "Argument must be 0 or 1";
pub const GLUTMASK_SET: &str = "Glut mask bit SET";
pub const GLUTMASK_CLEARED: &str = "Glut mask bit CLEARED";

pub const OP_UNKNOWN: &str = "Unknown operation";
pub const OP_SPECIFY: &str = "Specify which operation";
pub const OP_PROG_USAGE: &str = "usage: op prog [start address (hex)]";
pub const FAULT_UNKNOWN: &str = "Unknown fault operation (use 'op injectfault normal ...')";
pub const FAULT_RANDOM_USAGE: &str = "usage: op injectfault random [# bits to inject]";
pub const FAULT_NORMAL_USAGE: &str =
    "usage: op injectfault normal [address] [word] [bit] [# bits to inject]";
pub const FAULT_RANDOM_OK: &str = "random fault injection succeeded";
pub const FAULT_RANDOM_FAILED: &str = "random fault injection failed";
pub const FAULT_NORMAL_OK: &str = "normal fault injection succeeded";
pub const FAULT_NORMAL_FAILED: &str = "normal fault injection failed";
pub const SCRUB_SPECIFY: &str = "Specify scrub option";
pub const SCRUB_UNKNOWN: &str = "Unknown scrub command";

pub const OPTION_UNKNOWN: &str = "Unknown option";
pub const OPTION_SPECIFY: &str = "Specify which option to change";
pub const HIGH_Z_ON: &str = "Jtag to High-Z ON";
pub const HIGH_Z_OFF: &str = "Jtag to High-Z OFF";
pub const ACTIVE_DEVICE_SET: &str = "Active device index set";

pub const CONFIGURE_OK: &str = "Finished full configuration";
pub const CONFIGURE_FAILED: &str = "Full configuration failed";
pub const READBACK_OK: &str = "Readback complete";
pub const READBACK_FAILED: &str = "Readback failed";

pub const HELP: &str = "Connected to the jcm server. Commands:\n\
    setup: \t\tsets up the connected FPGA; must be run first\n\
    configure: \tconfigures the FPGA with its configured bit file\n\
    readback: \tretrieves a golden readback copy from the FPGA\n\
    scrub: \t\tperforms scrubbing on the FPGA (see \"op help\")\n\
    fault: \t\tbegin injecting faults (see \"op help\")\n\
    read [reg]: \treads the specified register. Type \"read help\".\n\
    write [reg]: \twrites the specified register. Type \"write help\".\n\
    op [operation]: \truns a device operation. Type \"op help\".\n\
    options [o]: \tchange various device options. Type \"options help\".\n\
    echo 'message': repeats back message for testing\n\
    resend: \tsends the previous response again\n\
    exit: \t\tend this session\n\
    ? or help: \tshow this dialogue";

pub const HELP_READ: &str = "The read (r) command reads the value of a register on the fpga. \
    Supported registers:\nfar\nidcode\nctrl0\ncrc\ncrchw\ncrcsw\ncrclive\nstatus\ncor1\ncmd\n\
    numlogicframes\nnumbramframes\nnumtotalframes\nwordsperframe\nfradlist\n\
    xadc ([reg]) displays a list of several temperatures and voltages. A specific register \
    value may be retrieved by appending one of the following to this command:\
    \n\tcurtemp\n\tvccint\n\tvccaux\n\
    frame [address] ([number of frames])\n\
    bscan [bscan # (1-4)] [# words to read]";

pub const HELP_WRITE: &str = "The write (w) command writes the value of a register on the fpga. \
    Supported registers:\nfar\t[value to write]\ncor1\t[value to write]\ncrcsw\t[value to write]\n\
    glutmask [0/1] Sets or clears the glut mask";

pub const HELP_OP: &str = "Operations: capture, prog ([start address]), \
    injectfault (normal (no correction), random, multiframe), scrub (blind)";

pub const HELP_OPTIONS: &str = "Supported options:\n\
    jtagtohighz [on/off]:\tenables or disables this\n\
    activedevice [#]:\tsets the active device index\n\
    view:\t\tdisplays current settings";
