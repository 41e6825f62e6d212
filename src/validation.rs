//! Input validation helpers.

use regex::Regex;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Return `true` when `email` looks like `local@domain.tld`.
///
/// This is a syntactic check only; no DNS lookup or mailbox verification takes place.
pub fn verify_email(email: &str) -> bool {
    email_regex().is_match(email)
}

#[cfg(test)]
mod tests {
    use super::verify_email;

    #[test]
    fn accepts_common_addresses() {
        for email in [
            "alice@example.com",
            "a@b.co",
            "first.last+tag@sub.domain.org",
            "user_name%x@my-host.io",
        ] {
            assert!(verify_email(email), "{email} should be accepted");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "",
            "not-an-email",
            "missing-domain@",
            "@example.com",
            "no-tld@example",
            "two@@example.com",
            "space in@example.com",
            "alice@example.c",
        ] {
            assert!(!verify_email(email), "{email:?} should be rejected");
        }
    }
}
