//! POSIX permission encoding.
//!
//! A mode is handled as three octal digits (owner, group, others). Each
//! digit decomposes into read (4), write (2) and execute (1), which is what
//! a permissions dialog presents as a grid of checkboxes. Textual modes are
//! always interpreted in base 8.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

const READ: u8 = 0b100;
const WRITE: u8 = 0b010;
const EXECUTE: u8 = 0b001;

/// The read/write/execute flags of one permission class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionBits {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

/// Splits an octal digit into its flags. Bits above the low three are ignored.
pub fn decode(digit: u8) -> PermissionBits {
    PermissionBits {
        read: digit & READ != 0,
        write: digit & WRITE != 0,
        execute: digit & EXECUTE != 0,
    }
}

/// Inverse of [`decode`].
pub fn encode(read: bool, write: bool, execute: bool) -> u8 {
    let mut digit = 0;
    if read {
        digit |= READ;
    }
    if write {
        digit |= WRITE;
    }
    if execute {
        digit |= EXECUTE;
    }
    digit
}

impl PermissionBits {
    pub fn digit(self) -> u8 {
        encode(self.read, self.write, self.execute)
    }
}

/// Owner/group/others permission digits, each in `0..=7`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionTriple {
    owner: u8,
    group: u8,
    others: u8,
}

impl PermissionTriple {
    /// Default mode for newly created files (`rw-r--r--`).
    pub const FILE_DEFAULT: Self = Self {
        owner: 6,
        group: 4,
        others: 4,
    };

    /// Default mode for newly created directories (`rwxr-xr-x`).
    pub const DIR_DEFAULT: Self = Self {
        owner: 7,
        group: 5,
        others: 5,
    };

    /// Builds a triple, rejecting any digit above 7.
    pub fn new(owner: u8, group: u8, others: u8) -> CoreResult<Self> {
        if owner > 7 || group > 7 || others > 7 {
            return Err(CoreError::InvalidName(format!(
                "permission digits out of range: {owner}{group}{others}"
            )));
        }
        Ok(Self {
            owner,
            group,
            others,
        })
    }

    /// Takes the low nine bits of a raw `st_mode`; type and special bits are dropped.
    pub fn from_mode(mode: u32) -> Self {
        Self {
            owner: ((mode >> 6) & 0o7) as u8,
            group: ((mode >> 3) & 0o7) as u8,
            others: (mode & 0o7) as u8,
        }
    }

    /// Builds a triple from the checkbox rows of a permissions dialog.
    pub fn from_bits(owner: PermissionBits, group: PermissionBits, others: PermissionBits) -> Self {
        Self {
            owner: owner.digit(),
            group: group.digit(),
            others: others.digit(),
        }
    }

    pub fn owner(self) -> u8 {
        self.owner
    }

    pub fn group(self) -> u8 {
        self.group
    }

    pub fn others(self) -> u8 {
        self.others
    }

    /// Returns the flags for owner, group and others, in that order.
    pub fn bits(self) -> [PermissionBits; 3] {
        [decode(self.owner), decode(self.group), decode(self.others)]
    }

    /// The nine-bit mode value, e.g. `0o754`.
    pub fn mode(self) -> u32 {
        (u32::from(self.owner) << 6) | (u32::from(self.group) << 3) | u32::from(self.others)
    }

    /// `ls -l` style rendering, e.g. `rwxr-xr--`.
    pub fn symbolic(self) -> String {
        self.bits()
            .iter()
            .flat_map(|b| {
                [
                    if b.read { 'r' } else { '-' },
                    if b.write { 'w' } else { '-' },
                    if b.execute { 'x' } else { '-' },
                ]
            })
            .collect()
    }
}

impl fmt::Display for PermissionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.owner, self.group, self.others)
    }
}

impl FromStr for PermissionTriple {
    type Err = CoreError;

    /// Parses `754`, `0754` or `0o754`. Digits are always octal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidName(format!("invalid octal mode: {s}"));
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(invalid());
        }
        let significant = digits.trim_start_matches('0');
        if significant.len() > 3 {
            return Err(invalid());
        }
        let mode = u32::from_str_radix(digits, 8).map_err(|_| invalid())?;
        Ok(Self::from_mode(mode))
    }
}

/// Current modes shown when a permissions dialog opens.
///
/// For a file, `file` holds its own mode and `directory` the mode of the
/// directory containing it. For a directory, `file` is `None` and
/// `directory` is its own mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSnapshot {
    pub file: Option<PermissionTriple>,
    pub directory: PermissionTriple,
}

/// Reads the permission triples for `path` without modifying anything.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `path` does not exist.
/// - [`CoreError::PermissionDenied`] if its metadata cannot be read.
pub fn read_mode(path: &Path) -> CoreResult<ModeSnapshot> {
    let meta = std::fs::metadata(path).map_err(|e| CoreError::from_io(e, path))?;
    if meta.is_dir() {
        return Ok(ModeSnapshot {
            file: None,
            directory: triple_of(&meta),
        });
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let parent_meta = std::fs::metadata(parent).map_err(|e| CoreError::from_io(e, parent))?;
    Ok(ModeSnapshot {
        file: Some(triple_of(&meta)),
        directory: triple_of(&parent_meta),
    })
}

#[cfg(unix)]
fn triple_of(meta: &std::fs::Metadata) -> PermissionTriple {
    use std::os::unix::fs::PermissionsExt;
    PermissionTriple::from_mode(meta.permissions().mode())
}

#[cfg(not(unix))]
fn triple_of(meta: &std::fs::Metadata) -> PermissionTriple {
    let mode = match (meta.is_dir(), meta.permissions().readonly()) {
        (true, true) => 0o555,
        (true, false) => 0o777,
        (false, true) => 0o444,
        (false, false) => 0o666,
    };
    PermissionTriple::from_mode(mode)
}

/// Applies `triple` to `path`.
///
/// Without POSIX mode bits only the read-only flag can be expressed: the
/// entry becomes read-only exactly when the owner write bit is clear.
pub(crate) fn apply_mode(path: &Path, triple: PermissionTriple) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(triple.mode()))
    }
    #[cfg(not(unix))]
    {
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_readonly(!decode(triple.owner()).write);
        std::fs::set_permissions(path, perms)
    }
}
