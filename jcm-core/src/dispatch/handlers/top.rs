use crate::dispatch::errors::DispatchError;
use crate::dispatch::router::Invocation;
use crate::dispatch::{Outcome, strings};
use crate::device::ReadbackRequest;

/// Reply with everything after `"echo "`, spacing preserved.
pub(crate) fn echo(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    inv.command
        .rest_after_verb()
        .map(Outcome::text)
        .ok_or(DispatchError::Usage(strings::NO_ECHO_MESSAGE))
}

pub(crate) fn configure(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let reply = if inv.device.configure_device() {
        strings::CONFIGURE_OK
    } else {
        strings::CONFIGURE_FAILED
    };
    Ok(Outcome::text(reply))
}

pub(crate) fn readback(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let request = ReadbackRequest::logic_only(inv.readback_path);
    let reply = if inv.device.read_full_device(&request, inv.high_z()) {
        strings::READBACK_OK
    } else {
        strings::READBACK_FAILED
    };
    Ok(Outcome::text(reply))
}

pub(crate) fn resend(_inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    Ok(Outcome::Resend)
}

pub(crate) fn exit(_inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    Ok(Outcome::Exit)
}
