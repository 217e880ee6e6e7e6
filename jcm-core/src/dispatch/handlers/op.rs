//! `op` leaves: capture, reprogram, fault injection and scrubbing.

use crate::device::FaultSite;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::router::Invocation;
use crate::dispatch::{Outcome, strings};

pub(crate) fn capture(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    inv.device.issue_capture(inv.high_z());
    Ok(Outcome::text(strings::SUCCESS))
}

/// `op prog [address]`, address in hex, zero when absent.
pub(crate) fn prog(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let wbstar = match inv.token(2) {
        Some(_) => inv.hex(2)?,
        None => 0,
    };
    inv.device.issue_prog(wbstar, inv.high_z());
    Ok(Outcome::text(strings::SUCCESS))
}

/// `op injectfault multiframe <frame address> <command register>`
pub(crate) fn multiframe_fault(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let frame_address = inv.hex(3)?;
    let command = inv.hex(4)?;
    // The device reports nothing back for this one.
    inv.device
        .inject_multi_frame_fault(frame_address, command, inv.high_z());
    Ok(Outcome::text(strings::SUCCESS))
}

/// `op injectfault random <bits> [repairfault]`
pub(crate) fn random_fault(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let bits = inv.dec(3)?;
    let repair = inv.command.len() == 5 && inv.token(4) == Some("repairfault");

    let ok = inv.device.inject_random_fault(bits, repair, inv.high_z());
    Ok(Outcome::text(if ok {
        strings::FAULT_RANDOM_OK
    } else {
        strings::FAULT_RANDOM_FAILED
    }))
}

/// `op injectfault normal <frame address> <word> <bit> <bits>`
pub(crate) fn normal_fault(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let site = FaultSite {
        frame_address: inv.hex(3)?,
        word: inv.dec(4)?,
        bit: inv.dec(5)?,
        bits: inv.dec(6)?,
    };

    let ok = inv.device.inject_fault(site, inv.high_z());
    Ok(Outcome::text(if ok {
        strings::FAULT_NORMAL_OK
    } else {
        strings::FAULT_NORMAL_FAILED
    }))
}

pub(crate) fn blind_scrub(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    inv.device.blind_scrub(inv.high_z());
    Ok(Outcome::text(strings::SUCCESS))
}
