//! Username and password rules for account registration.

/// Maximum username length.
pub const USERNAME_MAX_LEN: usize = 150;
/// Minimum password length.
pub const PASSWORD_MIN_LEN: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "123456", "12345678", "123456789", "1234567890", "password", "password1",
    "password123", "qwerty", "qwerty123", "qwertyuiop", "abc123", "111111",
    "letmein", "welcome", "iloveyou", "admin", "admin123", "monkey", "dragon",
    "football", "baseball", "sunshine", "princess", "trustno1", "superman",
    "passw0rd", "starwars", "whatever", "master", "login", "1q2w3e4r",
];

/// Validate a username: non-empty, at most [`USERNAME_MAX_LEN`] characters,
/// letters, digits and `@ . + - _` only.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("This field is required.".into());
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(format!(
            "Ensure this value has at most {USERNAME_MAX_LEN} characters."
        ));
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err("Enter a valid username. This value may contain only letters, \
                    numbers, and @/./+/-/_ characters."
            .into());
    }
    Ok(())
}

/// Run every password validator and collect the failures.
///
/// An empty vector means the password is acceptable. `username` and `email`
/// feed the similarity check.
pub fn password_problems(password: &str, username: &str, email: &str) -> Vec<String> {
    let mut problems = Vec::new();

    if password.chars().count() < PASSWORD_MIN_LEN {
        problems.push(format!(
            "This password is too short. It must contain at least {PASSWORD_MIN_LEN} characters."
        ));
    }

    let lowered = password.to_lowercase();
    if is_similar(&lowered, username) || is_similar(&lowered, email_local_part(email)) {
        problems.push("The password is too similar to your account details.".into());
    }

    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        problems.push("This password is too common.".into());
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".into());
    }

    problems
}

fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or_default()
}

fn is_similar(lowered_password: &str, attribute: &str) -> bool {
    let attribute = attribute.to_lowercase();
    if attribute.chars().count() < 3 || lowered_password.is_empty() {
        return false;
    }
    lowered_password.contains(&attribute) || attribute.contains(lowered_password)
}
