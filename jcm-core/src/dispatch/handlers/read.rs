//! `read` leaves: geometry counters, telemetry, frames and boundary scan.

use tracing::{debug, warn};

use crate::codec::MAX_RESPONSE_LEN;
use crate::device::XadcChannel;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::router::Invocation;
use crate::dispatch::{Outcome, strings};
use crate::response::Response;

pub(crate) fn num_logic_frames(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let n = inv.device.num_logic_frames();
    debug!(n, "num logic frames");
    Ok(Outcome::Reply(Response::word(n)))
}

pub(crate) fn num_bram_frames(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let n = inv.device.num_bram_frames();
    debug!(n, "num bram frames");
    Ok(Outcome::Reply(Response::word(n)))
}

pub(crate) fn num_total_frames(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let n = inv.device.total_frames();
    debug!(n, "num total frames");
    Ok(Outcome::Reply(Response::word(n)))
}

pub(crate) fn words_per_frame(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let n = inv.device.words_per_frame();
    debug!(n, "words per frame");
    Ok(Outcome::Reply(Response::word(n)))
}

pub(crate) fn frame_address_list(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    Ok(Outcome::Reply(Response::words(&inv.device.frame_address_array())))
}

/// `read xadc [curtemp|vccint|vccaux]`
///
/// Without a register name, replies with a text summary of every channel.
pub(crate) fn xadc(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let channel = match inv.token(2) {
        None => return Ok(Outcome::text(xadc_summary(inv))),
        Some("curtemp") => XadcChannel::Temperature,
        Some("vccint") => XadcChannel::VccInt,
        Some("vccaux") => XadcChannel::VccAux,
        Some(_) => return Err(DispatchError::UnknownCommand(strings::XADC_UNKNOWN)),
    };
    Ok(Outcome::Reply(Response::float(inv.device.read_xadc(channel))))
}

fn xadc_summary(inv: &Invocation<'_>) -> String {
    let d = inv.device;
    [
        format!("xadc temp = {:.1} C", d.read_xadc(XadcChannel::Temperature)),
        format!("xadc temp Max = {:.1} C", d.read_xadc(XadcChannel::MaxTemperature)),
        format!("xadc Vccint = {:.1} mV", d.read_xadc(XadcChannel::VccInt)),
        format!("xadc Vccint Max = {:.1} mV", d.read_xadc(XadcChannel::MaxVccInt)),
        format!("xadc Vccaux = {:.1} mV", d.read_xadc(XadcChannel::VccAux)),
        format!("xadc Vccaux Max = {:.1} mV", d.read_xadc(XadcChannel::MaxVccAux)),
    ]
    .join("\n")
}

/// `read frame <address> [count]`
///
/// The frames are read twice back to back and compared word for word.
/// Differences are logged as soft errors; the client always gets the first
/// read.
pub(crate) fn frame(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let address = inv.hex(2)?;
    let count = match inv.token(3) {
        Some(_) => inv.dec(3)?,
        None => 1,
    };
    if count < 1 {
        return Err(DispatchError::Usage(inv.usage));
    }

    let words_per_frame = inv.device.words_per_frame();
    let bytes = count as u64 * words_per_frame as u64 * 4;
    if bytes > MAX_RESPONSE_LEN as u64 {
        return Err(DispatchError::Usage(inv.usage));
    }

    let high_z = inv.high_z();
    inv.device.clear_glut_mask_bit(high_z);
    let first = inv.device.read_frames(address, count, high_z);
    let second = inv.device.read_frames(address, count, high_z);
    let mismatches = compare_readbacks(address, &first, &second);
    if mismatches > 0 {
        warn!(address, count, mismatches, "frame readback integrity check failed");
    }

    Ok(Outcome::Reply(Response::words(&first)))
}

/// Count words that differ between two reads of the same frames.
fn compare_readbacks(address: u32, first: &[u32], second: &[u32]) -> usize {
    if first.len() != second.len() {
        warn!(
            address,
            first = first.len(),
            second = second.len(),
            "frame readbacks differ in length"
        );
    }

    let mut mismatches = first.len().abs_diff(second.len());
    for (index, (a, b)) in first.iter().zip(second).enumerate() {
        if a != b {
            warn!(address, index, first = a, second = b, "frame word differs between reads");
            mismatches += 1;
        }
    }
    mismatches
}

/// `read bscan <channel 1-4> <words>`
pub(crate) fn bscan(inv: &mut Invocation<'_>) -> Result<Outcome, DispatchError> {
    let channel = inv.dec(2)?;
    let words = inv.dec(3)?;
    if !(1..=4).contains(&channel) {
        return Err(DispatchError::Usage(strings::BSCAN_INVALID_CHANNEL));
    }
    if words as u64 * 4 > MAX_RESPONSE_LEN as u64 {
        return Err(DispatchError::Usage(inv.usage));
    }

    let data = inv.device.read_bscan(channel as u8, words, inv.high_z());
    Ok(Outcome::Reply(Response::words(&data)))
}
