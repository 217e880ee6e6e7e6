use crate::dispatch::errors::DispatchError;
use crate::dispatch::router::Invocation;
use crate::dispatch::{Outcome, strings};

/// `write glutmask 0|1|set|clear`
pub(crate) fn glutmask(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let set = match inv.arg(2)? {
        "1" | "set" => true,
        "0" | "clear" => false,
        _ => return Err(DispatchError::Usage(strings::GLUTMASK_INVALID)),
    };

    let high_z = inv.high_z();
    if set {
        inv.device.set_glut_mask_bit(high_z);
        Ok(Outcome::text(strings::GLUTMASK_SET))
    } else {
        inv.device.clear_glut_mask_bit(high_z);
        Ok(Outcome::text(strings::GLUTMASK_CLEARED))
    }
}
