//! `novapay passphrase`: print a random passphrase for `keygen --encrypt`
//! or `key encrypt`.

use novapay_core::KeyError;
use novapay_crypto::generate_passphrase;
use zeroize::Zeroizing;

/// The `novapay passphrase` command handler.
#[derive(Debug, Clone, Copy)]
pub struct PassphraseCommand {
    length: usize,
    include_special: bool,
}

impl PassphraseCommand {
    /// Create a new `PassphraseCommand`.
    #[must_use]
    pub const fn new(length: usize, include_special: bool) -> Self {
        Self {
            length,
            include_special,
        }
    }

    /// Generate and print the passphrase.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::PassphraseTooShort`] below 12 characters.
    pub fn run(&self) -> Result<(), KeyError> {
        let passphrase = self.execute()?;
        println!("{}", passphrase.as_str());
        Ok(())
    }

    /// Generate the passphrase.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::PassphraseTooShort`] below 12 characters.
    pub fn execute(&self) -> Result<Zeroizing<String>, KeyError> {
        generate_passphrase(self.length, self.include_special)
    }
}
