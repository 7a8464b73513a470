//! Labelled form controls with their validation messages.

use bookreview_core::reviews::RATING_CHOICES;
use maud::{html, Markup};

use crate::forms::FormErrors;

pub fn errors_for(errors: &FormErrors, name: &str) -> Markup {
    html! {
        @let messages = errors.field(name);
        @if !messages.is_empty() {
            ul.errorlist {
                @for message in messages {
                    li { (message) }
                }
            }
        }
    }
}

pub fn non_field_errors(errors: &FormErrors) -> Markup {
    html! {
        @if !errors.non_field().is_empty() {
            ul.errorlist.nonfield {
                @for message in errors.non_field() {
                    li { (message) }
                }
            }
        }
    }
}

/// `<input>` of the given `kind` (`text`, `email`, `date`, `password`...).
pub fn input(
    kind: &str,
    label: &str,
    name: &str,
    value: &str,
    max_len: Option<usize>,
    errors: &FormErrors,
) -> Markup {
    html! {
        div.field {
            label for=(name) { (label) }
            (errors_for(errors, name))
            input type=(kind) id=(name) name=(name) value=(value) maxlength=[max_len];
        }
    }
}

/// Password inputs are never echoed back.
pub fn password(label: &str, name: &str, errors: &FormErrors) -> Markup {
    html! {
        div.field {
            label for=(name) { (label) }
            (errors_for(errors, name))
            input type="password" id=(name) name=(name) autocomplete="off";
        }
    }
}

pub fn textarea(label: &str, name: &str, value: &str, placeholder: &str, errors: &FormErrors) -> Markup {
    html! {
        div.field {
            label for=(name) { (label) }
            (errors_for(errors, name))
            textarea id=(name) name=(name) rows="4" placeholder=(placeholder) { (value) }
        }
    }
}

pub fn file(label: &str, name: &str, errors: &FormErrors) -> Markup {
    html! {
        div.field {
            label for=(name) { (label) }
            (errors_for(errors, name))
            input type="file" id=(name) name=(name) accept="image/png,image/jpeg,image/gif,image/webp";
        }
    }
}

/// Rating `<select>`, best first, keeping the submitted choice selected.
pub fn rating_select(selected: &str, errors: &FormErrors) -> Markup {
    html! {
        div.field {
            label for="rating" { "Rating" }
            (errors_for(errors, "rating"))
            select id="rating" name="rating" {
                option value="" selected[selected.is_empty()] { "---------" }
                @for (value, label) in RATING_CHOICES {
                    @let value = value.to_string();
                    option value=(value) selected[selected == value] { (label) }
                }
            }
        }
    }
}
