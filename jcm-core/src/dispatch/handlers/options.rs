use crate::dispatch::errors::DispatchError;
use crate::dispatch::router::Invocation;
use crate::dispatch::{Outcome, strings};
use crate::options::SessionOptions;

pub(crate) fn view(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    Ok(Outcome::text(inv.options.describe()))
}

pub(crate) fn jtag_to_high_z(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let enable = match inv.arg(2)? {
        "on" => true,
        "off" => false,
        _ => return Err(DispatchError::Usage(inv.usage)),
    };
    inv.options.set(SessionOptions::JTAG_HIGH_Z, enable);
    Ok(Outcome::text(if enable {
        strings::HIGH_Z_ON
    } else {
        strings::HIGH_Z_OFF
    }))
}

pub(crate) fn active_device(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let index = inv.dec(2)?;
    inv.device.set_active_device_index(index);
    Ok(Outcome::text(strings::ACTIVE_DEVICE_SET))
}
