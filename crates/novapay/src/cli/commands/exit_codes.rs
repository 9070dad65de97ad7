//! Process exit codes.

/// Successful operation.
pub const EXIT_SUCCESS: i32 = 0;

/// The operation ran but the answer is negative: a signature did not match,
/// or a key is not usable.
pub const EXIT_REJECTED: i32 = 1;

/// General error (configuration, I/O, invalid input, etc.).
pub const EXIT_ERROR: i32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(EXIT_SUCCESS, 0);
        assert_eq!(EXIT_REJECTED, 1);
        assert_eq!(EXIT_ERROR, 2);
    }
}
