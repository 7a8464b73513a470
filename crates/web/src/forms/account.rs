//! Registration and login forms.

use bookreview_core::accounts::{password_problems, validate_username};
use serde::Deserialize;
use validator::Validate;

use super::{required, FormErrors};

/// Shown for any failed login, so the form does not reveal which usernames exist.
pub const INVALID_LOGIN_MESSAGE: &str = "Please enter a correct username and password. \
                                         Note that both fields may be case-sensitive.";

/// `POST /register/` body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    #[validate(
        custom(function = "required"),
        email(message = "Enter a valid email address.")
    )]
    pub email: String,
    #[validate(custom(function = "required"))]
    pub password1: String,
    #[validate(
        custom(function = "required"),
        must_match(other = "password1", message = "The two password fields didn't match.")
    )]
    pub password2: String,
}

/// A registration that passed every field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// Validate the submission. Username uniqueness needs the database and is
    /// checked by the handler afterwards.
    pub fn clean(&self) -> Result<CleanRegistration, FormErrors> {
        let username = self.username.trim().to_string();
        let email = self.email.trim().to_string();
        let form = RegisterForm {
            username: username.clone(),
            email: email.clone(),
            password1: self.password1.clone(),
            password2: self.password2.clone(),
        };

        let mut errors = match form.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from_validation(&e),
        };

        if let Err(message) = validate_username(&username) {
            errors.add("username", message);
        }

        // Strength rules only apply once both entries agree.
        if !errors.has("password1") && !errors.has("password2") {
            for problem in password_problems(&form.password2, &username, &email) {
                errors.add("password2", problem);
            }
        }

        errors.into_result(|| CleanRegistration {
            username,
            email,
            password: form.password1,
        })
    }
}

/// `POST /login/` body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(custom(function = "required"))]
    pub username: String,
    #[validate(custom(function = "required"))]
    pub password: String,
    /// Where to go after signing in.
    pub next: Option<String>,
}

impl LoginForm {
    /// Check that both credentials were supplied. Whether they are correct is
    /// the handler's job.
    pub fn clean(&self) -> Result<(String, String), FormErrors> {
        let form = LoginForm {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            next: None,
        };
        match form.validate() {
            Ok(()) => Ok((form.username, form.password)),
            Err(e) => Err(FormErrors::from_validation(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::REQUIRED_MESSAGE;

    fn valid() -> RegisterForm {
        RegisterForm {
            username: " reader_1 ".into(),
            email: "reader@example.com".into(),
            password1: "Tumbleweed-Orchard-42".into(),
            password2: "Tumbleweed-Orchard-42".into(),
        }
    }

    #[test]
    fn valid_registration_is_trimmed() {
        let clean = valid().clean().unwrap();
        assert_eq!(clean.username, "reader_1");
        assert_eq!(clean.email, "reader@example.com");
        assert_eq!(clean.password, "Tumbleweed-Orchard-42");
    }

    #[test]
    fn email_is_required_and_checked() {
        let mut form = valid();
        form.email = String::new();
        assert_eq!(form.clean().unwrap_err().field("email"), [REQUIRED_MESSAGE]);

        form.email = "not-an-email".into();
        assert_eq!(
            form.clean().unwrap_err().field("email"),
            ["Enter a valid email address."]
        );
    }

    #[test]
    fn mismatched_passwords_skip_strength_rules() {
        let mut form = valid();
        form.password2 = "123".into();
        let errors = form.clean().unwrap_err();
        assert_eq!(errors.field("password2"), ["The two password fields didn't match."]);
    }

    #[test]
    fn weak_password_reports_every_problem() {
        let mut form = valid();
        form.password1 = "1234567".into();
        form.password2 = "1234567".into();
        let errors = form.clean().unwrap_err();
        let messages = errors.field("password2");
        assert!(messages.iter().any(|m| m.contains("too short")));
        assert!(messages.iter().any(|m| m.contains("entirely numeric")));
    }

    #[test]
    fn bad_username_characters() {
        let mut form = valid();
        form.username = "no spaces".into();
        let errors = form.clean().unwrap_err();
        assert!(errors.field("username")[0].starts_with("Enter a valid username."));
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            username: "  ".into(),
            password: String::new(),
            next: None,
        };
        let errors = form.clean().unwrap_err();
        assert_eq!(errors.field("username"), [REQUIRED_MESSAGE]);
        assert_eq!(errors.field("password"), [REQUIRED_MESSAGE]);
    }
}
