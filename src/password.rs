//! Password strength checks and salted hashing for user accounts.
//!
//! A raw password string becomes a [ValidatedPassword] once it passes the
//! strength check, and a [PasswordHash] once hashed. Only the hash is stored.

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that has passed the strength check but has not been hashed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password`.
    ///
    /// `user_inputs` are strings the user also typed in, such as their email
    /// address, so that passwords derived from them are scored as weak.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with a hint on how to improve the password if
    /// it scores below three out of four.
    pub fn new(raw_password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, user_inputs);

        match analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => Err(Error::TooWeak(
                analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }

    /// Wrap `raw_password` without checking its strength.
    ///
    /// Only intended for seeding test databases.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The recommended bcrypt cost.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with the bcrypt `cost`.
    ///
    /// Higher costs make both hashing and verification slower. Use
    /// [PasswordHash::DEFAULT_COST] outside of tests.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails, e.g. for an out of range cost.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash that was previously produced by [PasswordHash::new], e.g.
    /// when loading a user from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check `raw_password` against the hash.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, ValidatedPassword};

    #[test]
    fn new_fails_on_empty() {
        let result = ValidatedPassword::new("", &[]);

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_fails_on_common_password() {
        let result = ValidatedPassword::new("password123", &[]);

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_fails_when_password_is_the_email_address() {
        let email = "correct.horse.battery@staple.com";

        let result = ValidatedPassword::new(email, &[email]);

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_succeeds_on_strong_password() {
        let result = ValidatedPassword::new("averysafeandsecurepassword", &[]);

        assert!(result.is_ok());
    }

    #[test]
    fn display_masks_password() {
        let password = ValidatedPassword::new_unchecked("hunter2");

        assert_eq!(password.to_string(), "********");
    }
}

#[cfg(test)]
mod password_hash_tests {
    use crate::{Error, PasswordHash, ValidatedPassword};

    // The minimum bcrypt cost, keeps the tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn verify_succeeds_with_same_password() {
        let hash =
            PasswordHash::new(ValidatedPassword::new_unchecked("hunter2"), TEST_COST).unwrap();

        assert_eq!(hash.verify("hunter2"), Ok(true));
    }

    #[test]
    fn verify_fails_with_different_password() {
        let hash =
            PasswordHash::new(ValidatedPassword::new_unchecked("hunter2"), TEST_COST).unwrap();

        assert_eq!(hash.verify("hunter3"), Ok(false));
    }

    #[test]
    fn verify_fails_with_malformed_hash() {
        let hash = PasswordHash::new_unchecked("not a bcrypt hash");

        assert!(matches!(
            hash.verify("hunter2"),
            Err(Error::HashingError(_))
        ));
    }

    #[test]
    fn new_fails_with_invalid_cost() {
        let result = PasswordHash::new(ValidatedPassword::new_unchecked("hunter2"), 1);

        assert!(matches!(result, Err(Error::HashingError(_))));
    }
}
