//! Register catalog of the 485 single-phase leakage breaker.
//!
//! Maps a function code and a parameter identifier onto the coil or register
//! address it lives at. Read entries carry the number of words to request,
//! write entries carry the operation codes accepted for each relay position.
//! The table is compiled into the binary and never changes.
use crate::protocol::{FunctionCode, SwitchState};
use crate::{Error, Result};

/// Operation codes written to close and open the relay.
pub const RELAY_OPERATION_CODES: &[(SwitchState, u16)] =
    &[(SwitchState::On, 0xFF00), (SwitchState::Off, 0x0000)];

/// One row of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterEntry {
    /// Read `length` words (or coils) starting at `memory_address`.
    Read { memory_address: u16, length: u16 },
    /// Write a single coil or register at `memory_address`.
    Write {
        memory_address: u16,
        operation_codes: &'static [(SwitchState, u16)],
    },
}

impl RegisterEntry {
    /// Coil or register address, shared by both entry shapes.
    pub fn memory_address(&self) -> u16 {
        match self {
            RegisterEntry::Read { memory_address, .. }
            | RegisterEntry::Write { memory_address, .. } => *memory_address,
        }
    }

    /// Returns the operation code for `state`, if this is a write entry.
    pub fn operation_code(&self, state: SwitchState) -> Option<u16> {
        match self {
            RegisterEntry::Read { .. } => None,
            RegisterEntry::Write {
                operation_codes, ..
            } => operation_codes
                .iter()
                .find(|(candidate, _)| *candidate == state)
                .map(|(_, code)| *code),
        }
    }
}

const fn read(memory_address: u16, length: u16) -> RegisterEntry {
    RegisterEntry::Read {
        memory_address,
        length,
    }
}

const fn write(memory_address: u16) -> RegisterEntry {
    RegisterEntry::Write {
        memory_address,
        operation_codes: RELAY_OPERATION_CODES,
    }
}

const READ_COILS: &[(&str, RegisterEntry)] = &[("Relay", read(0x0001, 1))];

const READ_INPUT_REGISTERS: &[(&str, RegisterEntry)] = &[
    ("GridFreq", read(0x0004, 1)),
    ("Leakage", read(0x0005, 1)),
    ("TempA", read(0x0007, 1)),
    ("Ua", read(0x0008, 1)),
    ("Ia", read(0x0009, 1)),
    ("PFa", read(0x000A, 1)),
    ("Pa", read(0x000B, 1)),
    ("Qa", read(0x000C, 1)),
    ("Sa", read(0x000D, 1)),
    ("TempB", read(0x0010, 1)),
    ("Ub", read(0x0011, 1)),
    ("Ib", read(0x0012, 1)),
    ("PFb", read(0x0013, 1)),
    ("Pb", read(0x0014, 1)),
    ("Qb", read(0x0015, 1)),
    ("Sb", read(0x0016, 1)),
    ("TempC", read(0x0019, 1)),
    ("Uc", read(0x001A, 1)),
    ("Ic", read(0x001B, 1)),
    ("PFc", read(0x001C, 1)),
    ("Pc", read(0x001D, 1)),
    ("Qc", read(0x001E, 1)),
    ("Sc", read(0x001F, 1)),
    ("P", read(0x0022, 1)),
    ("Q", read(0x0023, 1)),
    ("S", read(0x0024, 1)),
    ("PEnergy", read(0x0025, 2)),
];

const WRITE_SINGLE_COIL: &[(&str, RegisterEntry)] = &[("Relay", write(0x0001))];

const WRITE_SINGLE_REGISTER: &[(&str, RegisterEntry)] = &[("Relay", write(0x000D))];

fn table(function_code: FunctionCode) -> &'static [(&'static str, RegisterEntry)] {
    match function_code {
        FunctionCode::ReadCoils => READ_COILS,
        FunctionCode::ReadInputRegisters => READ_INPUT_REGISTERS,
        FunctionCode::WriteSingleCoil => WRITE_SINGLE_COIL,
        FunctionCode::WriteSingleRegister => WRITE_SINGLE_REGISTER,
    }
}

/// Resolves `identifier` under `function_code`.
pub fn lookup(function_code: FunctionCode, identifier: &str) -> Result<RegisterEntry> {
    table(function_code)
        .iter()
        .find(|(name, _)| *name == identifier)
        .map(|(_, entry)| *entry)
        .ok_or_else(|| Error::UnsupportedIdentifier {
            function_code: function_code.to_string(),
            identifier: identifier.to_string(),
        })
}

/// Lists every identifier of `function_code` together with its entry, in table order.
pub fn entries(
    function_code: FunctionCode,
) -> impl Iterator<Item = (&'static str, RegisterEntry)> {
    table(function_code).iter().copied()
}

/// Lists the identifiers of `function_code` in table order.
pub fn identifiers(function_code: FunctionCode) -> impl Iterator<Item = &'static str> {
    entries(function_code).map(|(name, _)| name)
}

/// Reverse operation code table used for write acknowledgements.
pub fn switch_state_for(operation_code: u16) -> Option<SwitchState> {
    RELAY_OPERATION_CODES
        .iter()
        .find(|(_, code)| *code == operation_code)
        .map(|(state, _)| *state)
}
