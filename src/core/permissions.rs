// src/core/permissions.rs

//! Conversion between `ls -l` style permission strings and numeric modes.

use thiserror::Error;

/// A permission string that is not 9 valid `rwx` characters.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PermissionParseError {
    /// The string does not have exactly 9 characters.
    #[error("Permission string must have 9 characters, got {0}.")]
    WrongLength(usize),
    /// A character is not allowed at its position.
    #[error("Invalid character '{ch}' at position {position} of permission string.")]
    InvalidChar {
        /// The offending character.
        ch: char,
        /// Its zero-based position.
        position: usize,
    },
}

/// One position of a `rwxrwxrwx` string: the bit it sets, the characters that set
/// it and the characters that leave it clear.
struct Slot {
    bit: u32,
    set: &'static str,
    clear: &'static str,
}

// Special-bit letters (`s`, `t`) only tell whether execute is set; the special
// bits themselves are never part of the resulting mode.
const SLOTS: [Slot; 9] = [
    Slot { bit: 0o400, set: "r", clear: "-" },
    Slot { bit: 0o200, set: "w", clear: "-" },
    Slot { bit: 0o100, set: "xs", clear: "-S" },
    Slot { bit: 0o040, set: "r", clear: "-" },
    Slot { bit: 0o020, set: "w", clear: "-" },
    Slot { bit: 0o010, set: "xs", clear: "-S" },
    Slot { bit: 0o004, set: "r", clear: "-" },
    Slot { bit: 0o002, set: "w", clear: "-" },
    Slot { bit: 0o001, set: "xt", clear: "-T" },
];

/// Converts a symbolic permission string such as `rwxr-x---` into its numeric mode.
///
/// Setuid, setgid and sticky markers are accepted but ignored, so `rwsr-xr-x`
/// gives `0o755`.
pub fn symbolic_permissions_to_mode(symbolic: &str) -> Result<u32, PermissionParseError> {
    let count = symbolic.chars().count();
    if count != SLOTS.len() {
        return Err(PermissionParseError::WrongLength(count));
    }
    let mut mode = 0;
    for (position, (ch, slot)) in symbolic.chars().zip(SLOTS.iter()).enumerate() {
        if slot.set.contains(ch) {
            mode |= slot.bit;
        } else if !slot.clear.contains(ch) {
            return Err(PermissionParseError::InvalidChar { ch, position });
        }
    }
    Ok(mode)
}

/// Renders the permission bits of `mode` as a 9-character symbolic string, the
/// way `ls -l` shows them (`s`/`S` for setuid/setgid, `t`/`T` for sticky).
pub fn mode_to_symbolic(mode: u32) -> String {
    let special = [
        (0o4000, 0o100, 's', 'S'),
        (0o2000, 0o010, 's', 'S'),
        (0o1000, 0o001, 't', 'T'),
    ];
    let mut out = String::with_capacity(9);
    for (shift, (special_bit, exec_bit, with_exec, without_exec)) in
        [6u32, 3, 0].into_iter().zip(special)
    {
        out.push(if mode & (0o4 << shift) != 0 { 'r' } else { '-' });
        out.push(if mode & (0o2 << shift) != 0 { 'w' } else { '-' });
        let exec = mode & exec_bit != 0;
        out.push(match (mode & special_bit != 0, exec) {
            (true, true) => with_exec,
            (true, false) => without_exec,
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_modes() {
        assert_eq!(symbolic_permissions_to_mode("rwxr-xr-x"), Ok(0o755));
        assert_eq!(symbolic_permissions_to_mode("rw-r--r--"), Ok(0o644));
        assert_eq!(symbolic_permissions_to_mode("---------"), Ok(0));
        assert_eq!(symbolic_permissions_to_mode("rw-------"), Ok(0o600));
    }

    #[test]
    fn test_special_bits_are_ignored() {
        assert_eq!(symbolic_permissions_to_mode("rwsr-xr-x"), Ok(0o755));
        assert_eq!(symbolic_permissions_to_mode("rwSr--r--"), Ok(0o644));
        assert_eq!(symbolic_permissions_to_mode("rwxr-sr-t"), Ok(0o755));
        assert_eq!(symbolic_permissions_to_mode("rwxrwxrwT"), Ok(0o776));
    }

    #[test]
    fn test_malformed_strings() {
        assert_eq!(
            symbolic_permissions_to_mode("rwx"),
            Err(PermissionParseError::WrongLength(3))
        );
        assert_eq!(
            symbolic_permissions_to_mode("-rwxr-xr-x"),
            Err(PermissionParseError::WrongLength(10))
        );
        assert_eq!(
            symbolic_permissions_to_mode("rwxr-xr-q"),
            Err(PermissionParseError::InvalidChar { ch: 'q', position: 8 })
        );
        // `t` is only valid in the last slot.
        assert_eq!(
            symbolic_permissions_to_mode("rwtr-xr-x"),
            Err(PermissionParseError::InvalidChar { ch: 't', position: 2 })
        );
    }

    #[test]
    fn test_mode_to_symbolic() {
        assert_eq!(mode_to_symbolic(0o755), "rwxr-xr-x");
        assert_eq!(mode_to_symbolic(0o640), "rw-r-----");
        assert_eq!(mode_to_symbolic(0o4755), "rwsr-xr-x");
        assert_eq!(mode_to_symbolic(0o1644), "rw-r--r-T");
        assert_eq!(mode_to_symbolic(0o100644), "rw-r--r--");
    }

    #[test]
    fn test_symbolic_drops_special_bits() {
        for mode in [0o4755, 0o2750, 0o1777, 0o7000] {
            let symbolic = mode_to_symbolic(mode);
            assert_eq!(symbolic_permissions_to_mode(&symbolic), Ok(mode & 0o777));
        }
    }
}
