use bookreview_core::accounts::{PASSWORD_MIN_LEN, USERNAME_MAX_LEN};
use maud::{html, Markup};

use super::fields;
use super::layout::page;
use crate::forms::account::RegisterForm;
use crate::forms::FormErrors;
use crate::middleware::page::PageContext;

/// `GET|POST /register/`
pub fn register(ctx: &PageContext, form: &RegisterForm, errors: &FormErrors) -> Markup {
    page(
        ctx,
        "Register",
        html! {
            h1 { "Create an account" }
            form method="post" action="/register/" {
                (fields::non_field_errors(errors))
                (fields::input("text", "Username", "username", &form.username, Some(USERNAME_MAX_LEN), errors))
                p.help { small { "Letters, digits and @/./+/-/_ only." } }
                (fields::input("email", "Email", "email", &form.email, None, errors))
                (fields::password("Password", "password1", errors))
                p.help {
                    small {
                        "At least " (PASSWORD_MIN_LEN) " characters; not entirely numeric, "
                        "not a common password, and not too similar to your username."
                    }
                }
                (fields::password("Password confirmation", "password2", errors))
                button type="submit" { "Register" }
            }
            p { "Already have an account? " a href="/login/" { "Log in" } }
        },
    )
}

/// `GET|POST /login/`
pub fn login(ctx: &PageContext, username: &str, next: Option<&str>, errors: &FormErrors) -> Markup {
    page(
        ctx,
        "Log in",
        html! {
            h1 { "Log in" }
            form method="post" action="/login/" {
                (fields::non_field_errors(errors))
                (fields::input("text", "Username", "username", username, Some(USERNAME_MAX_LEN), errors))
                (fields::password("Password", "password", errors))
                @if let Some(next) = next {
                    input type="hidden" name="next" value=(next);
                }
                button type="submit" { "Log in" }
            }
            p { "No account yet? " a href="/register/" { "Register" } }
        },
    )
}
