//! Username format rules.
//!
//! These are the checks that need no storage access. Uniqueness is resolved by
//! `ProfileService::check_username` through the username index.

use domains::{UsernameStatus, RESERVED_USERNAMES};

/// Usernames must be strictly longer than this many characters.
pub const MIN_USERNAME_EXCLUSIVE: usize = 3;

/// Applies length, whitespace and reserved-word rules.
///
/// Returns `Available` when only the uniqueness check remains.
pub fn check_format(username: &str) -> UsernameStatus {
    if username.chars().count() <= MIN_USERNAME_EXCLUSIVE {
        return UsernameStatus::TooShort;
    }
    if username.chars().any(char::is_whitespace) {
        return UsernameStatus::ContainsWhitespace;
    }
    if is_reserved(username) {
        return UsernameStatus::Reserved;
    }
    UsernameStatus::Available
}

/// Reserved words are matched case-insensitively.
pub fn is_reserved(username: &str) -> bool {
    let lowered = username.to_lowercase();
    RESERVED_USERNAMES.iter().any(|r| *r == lowered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_usernames() {
        assert_eq!(check_format("alice"), UsernameStatus::Available);
        assert_eq!(check_format("bob_"), UsernameStatus::Available);
        assert_eq!(check_format("Crypto.Fan-99"), UsernameStatus::Available);
    }

    #[test]
    fn rejects_short_usernames() {
        assert_eq!(check_format(""), UsernameStatus::TooShort);
        assert_eq!(check_format("bob"), UsernameStatus::TooShort);
        // counted in characters, not bytes
        assert_eq!(check_format("äöü"), UsernameStatus::TooShort);
    }

    #[test]
    fn rejects_whitespace_anywhere() {
        assert_eq!(check_format("al ice"), UsernameStatus::ContainsWhitespace);
        assert_eq!(check_format("alice\t"), UsernameStatus::ContainsWhitespace);
    }

    #[test]
    fn rejects_reserved_words_in_any_case() {
        assert_eq!(check_format("home"), UsernameStatus::Reserved);
        assert_eq!(check_format("Discover"), UsernameStatus::Reserved);
        assert_eq!(check_format("CREATE-POST"), UsernameStatus::Reserved);
        assert_eq!(check_format("admins"), UsernameStatus::Available);
    }
}
