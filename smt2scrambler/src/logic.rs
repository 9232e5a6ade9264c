// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::error::{RawError, RawResult, ScrambleError, ScrambleResult};

/// Theories enabled by a logic name, derived from substrings of the name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogicFlags {
    /// Difference logic: IDL, RDL.
    pub difference: bool,
    /// Arithmetic: IA, RA, IRA (but not difference logic).
    pub arithmetic: bool,
    /// Bit-vectors: BV.
    pub bit_vectors: bool,
    /// Floating point: FP.
    pub floating_point: bool,
}

impl LogicFlags {
    pub fn from_name(name: &str) -> Self {
        let difference = name.contains("IDL") || name.contains("RDL");
        Self {
            difference,
            arithmetic: !difference && (name.contains("IA") || name.contains("RA")),
            bit_vectors: name.contains("BV"),
            floating_point: name.contains("FP"),
        }
    }
}

/// The logic of the current script. Each script contains a single
/// `set-logic` command.
#[derive(Clone, Debug, Default)]
pub struct Logic {
    name: Option<String>,
    flags: LogicFlags,
}

impl Logic {
    pub fn set(&mut self, name: &str) -> RawResult<()> {
        if let Some(current) = &self.name {
            return Err(RawError::LogicAlreadySet(current.clone()));
        }
        self.flags = LogicFlags::from_name(name);
        self.name = Some(name.to_string());
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The theory flags of the logic, which must have been set.
    pub fn flags(&self) -> ScrambleResult<LogicFlags> {
        if self.name.is_none() {
            return Err(ScrambleError::LogicNotSet);
        }
        Ok(self.flags)
    }
}

#[test]
fn test_logic_flags() {
    let flags = LogicFlags::from_name("QF_LIA");
    assert!(flags.arithmetic && !flags.difference && !flags.bit_vectors);
    let flags = LogicFlags::from_name("QF_AUFLIRA");
    assert!(flags.arithmetic);
    let flags = LogicFlags::from_name("QF_IDL");
    assert!(flags.difference && !flags.arithmetic);
    let flags = LogicFlags::from_name("QF_RDL");
    assert!(flags.difference && !flags.arithmetic);
    let flags = LogicFlags::from_name("QF_ABVFP");
    assert!(flags.bit_vectors && flags.floating_point && !flags.arithmetic);
    assert_eq!(LogicFlags::from_name("QF_UF"), LogicFlags::default());
}

#[test]
fn test_logic_is_set_once() {
    let mut logic = Logic::default();
    assert!(matches!(logic.flags(), Err(ScrambleError::LogicNotSet)));
    logic.set("QF_BV").unwrap();
    assert!(logic.flags().unwrap().bit_vectors);
    assert_eq!(
        logic.set("QF_LIA"),
        Err(RawError::LogicAlreadySet("QF_BV".to_string()))
    );
    assert_eq!(logic.name(), Some("QF_BV"));
}
