//! Declarative routing tree.
//!
//! A [`Table`] matches the token at its depth against its routes. A matched
//! [`Route`] first checks the total token count, then hands off to its
//! [`Target`]: a nested table, a handler, or a fixed reply.

use std::path::Path;

use tracing::trace;

use super::Outcome;
use super::args::{Radix, parse_number};
use super::errors::DispatchError;
use super::strings;
use crate::command::Command;
use crate::device::{Device, Register};
use crate::options::SessionOptions;
use crate::response::Response;

pub(crate) type Handler = fn(&mut Invocation<'_>) -> Result<Outcome, DispatchError>;

/// How many tokens, verb included, a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Any,
    AtLeast(usize),
    Exactly(usize),
}

impl Arity {
    pub fn admits(&self, tokens: usize) -> bool {
        match *self {
            Arity::Any => true,
            Arity::AtLeast(n) => tokens >= n,
            Arity::Exactly(n) => tokens == n,
        }
    }
}

/// Commands that are reserved but have no behaviour yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unimplemented {
    Setup,
    Scrub,
    Fault,
    BscanWrite,
    SpartanFault,
    ReadbackScrub,
    HybridScrub,
    HwVersion,
}

impl Unimplemented {
    pub fn message(&self) -> &'static str {
        match self {
            Unimplemented::BscanWrite => "Bscan write not implemented",
            Unimplemented::SpartanFault => "Not yet implemented (maybe never)",
            Unimplemented::Setup
            | Unimplemented::Scrub
            | Unimplemented::Fault
            | Unimplemented::ReadbackScrub
            | Unimplemented::HybridScrub
            | Unimplemented::HwVersion => "Not yet implemented",
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) enum Target {
    Table(&'static Table),
    Handler(Handler),
    /// Fixed text reply, e.g. help.
    Text(&'static str),
    Unimplemented(Unimplemented),
    ReadRegister(Register),
    /// Writes the hex value in the token after the register name.
    WriteRegister(Register),
}

pub(crate) struct Route {
    pub verbs: &'static [&'static str],
    pub arity: Arity,
    /// Reply when the arity check fails or an argument is malformed.
    pub usage: &'static str,
    pub target: Target,
}

impl Route {
    pub const fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }
}

pub(crate) struct Table {
    /// Index of the token this table matches.
    pub depth: usize,
    /// Token count every command but help must reach at this level.
    pub arity: Arity,
    /// Reply when `arity` is not met.
    pub too_short: &'static str,
    /// Reply when the command stops before `depth`.
    pub missing: &'static str,
    /// Reply when no route matches.
    pub unknown: &'static str,
    pub routes: &'static [Route],
}

impl Table {
    pub fn find(&self, token: &str) -> Option<&'static Route> {
        self.routes
            .iter()
            .find(|r| r.verbs.iter().any(|verb| *verb == token))
    }

    #[cfg(test)]
    pub fn verbs(&self) -> impl Iterator<Item = &'static str> {
        self.routes.iter().flat_map(|r| r.verbs.iter().copied())
    }
}

/// Everything a handler may touch while running one command.
pub(crate) struct Invocation<'a> {
    pub command: &'a Command,
    pub device: &'a dyn Device,
    pub options: &'a mut SessionOptions,
    pub readback_path: &'a Path,
    /// Usage text of the route being executed.
    pub usage: &'static str,
}

impl Invocation<'_> {
    pub fn high_z(&self) -> bool {
        self.options.jtag_high_z()
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.command.token(index)
    }

    /// A required argument. Arity checks make this infallible in practice.
    pub fn arg(&self, index: usize) -> Result<&str, DispatchError> {
        self.command
            .token(index)
            .ok_or(DispatchError::Usage(self.usage))
    }

    pub fn hex(&self, index: usize) -> Result<u32, DispatchError> {
        self.number(index, Radix::Hex)
    }

    pub fn dec(&self, index: usize) -> Result<u32, DispatchError> {
        self.number(index, Radix::Decimal)
    }

    fn number(&self, index: usize, radix: Radix) -> Result<u32, DispatchError> {
        parse_number(self.arg(index)?, radix).map_err(|e| DispatchError::numeric(e, self.usage))
    }
}

/// Walk `table` for the command held by `inv`.
pub(crate) fn route(
    table: &'static Table,
    inv: &mut Invocation<'_>,
) -> Result<Outcome, DispatchError> {
    let token = inv
        .command
        .token(table.depth)
        .ok_or(DispatchError::Usage(table.missing))?;
    let matched = table.find(token);
    let is_help = matches!(matched.map(|r| r.target), Some(Target::Text(_)));
    if !is_help && !table.arity.admits(inv.command.len()) {
        return Err(DispatchError::Usage(table.too_short));
    }
    let matched = matched.ok_or(DispatchError::UnknownCommand(table.unknown))?;
    if !matched.arity.admits(inv.command.len()) {
        return Err(DispatchError::Usage(matched.usage));
    }
    trace!(depth = table.depth, verb = token, "route matched");
    inv.usage = matched.usage;

    match matched.target {
        Target::Table(next) => route(next, inv),
        Target::Handler(handler) => handler(inv),
        Target::Text(text) => Ok(Outcome::text(text)),
        Target::Unimplemented(which) => Ok(Outcome::text(which.message())),
        Target::ReadRegister(register) => {
            let value = inv.device.read_register(register, inv.high_z());
            Ok(Outcome::Reply(Response::word(value)))
        }
        Target::WriteRegister(register) => {
            let value = inv.hex(table.depth + 1)?;
            inv.device.write_register(register, value, inv.high_z());
            Ok(Outcome::text(strings::SUCCESS))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_rules() {
        assert!(Arity::Any.admits(0));
        assert!(Arity::AtLeast(3).admits(3));
        assert!(!Arity::AtLeast(3).admits(2));
        assert!(Arity::Exactly(4).admits(4));
        assert!(!Arity::Exactly(4).admits(5));
    }

    #[test]
    fn unimplemented_messages() {
        assert_eq!(Unimplemented::Setup.message(), "Not yet implemented");
        assert_eq!(
            Unimplemented::SpartanFault.message(),
            "Not yet implemented (maybe never)"
        );
    }
}
