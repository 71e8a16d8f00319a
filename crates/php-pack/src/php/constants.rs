//! PHP `serialize()` grammar constants.
#![allow(non_snake_case)]

/// Type-tag bytes. Matching is case-sensitive; `R` and `r` are distinct tags.
pub mod PhpTag {
    pub const INT: u8 = b'i';
    pub const BOOL: u8 = b'b';
    pub const FLOAT: u8 = b'd';
    pub const NULL: u8 = b'N';
    pub const STR: u8 = b's';
    pub const ARR: u8 = b'a';
    pub const OBJ: u8 = b'O';
    pub const CUSTOM: u8 = b'C';
    pub const REF_VALUE: u8 = b'R';
    pub const REF_OBJECT: u8 = b'r';
}

/// Default cap on nesting depth of arrays, objects and custom payloads.
pub const MAX_NESTING_DEPTH: usize = 512;
