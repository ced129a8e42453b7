//! Process exit codes.

/// Exit codes for the pixdupe application.
///
/// - 0: Success (completed normally, duplicates found and handled)
/// - 1: General error (cache I/O failure, refused configuration)
/// - 2: No duplicates found (completed normally)
/// - 3: Partial success (completed, but some files were corrupt)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Scan completed and duplicates were found.
    Success = 0,
    /// An unexpected or fatal error occurred.
    GeneralError = 1,
    /// Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Scan completed but some files could not be decoded.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "PX000",
            Self::GeneralError => "PX001",
            Self::NoDuplicates => "PX002",
            Self::PartialSuccess => "PX003",
        }
    }
}
