use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::flash::Flash;
use crate::middleware::auth::CurrentUser;
use crate::middleware::page::PageContext;

const SITE_NAME: &str = "Book Reviews";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #222; background: #fafafa; }
header { background: #2c3e50; color: #fff; padding: .75rem 1.5rem; display: flex; gap: 1rem; align-items: center; }
header a { color: #fff; text-decoration: none; }
header .spacer { flex: 1; }
header form { display: inline; }
header button { background: none; border: 1px solid #fff; color: #fff; border-radius: 3px; cursor: pointer; }
main { max-width: 960px; margin: 1.5rem auto; padding: 0 1rem; }
.messages { list-style: none; padding: 0; }
.messages li { padding: .6rem 1rem; border-radius: 4px; margin-bottom: .5rem; }
.success { background: #e3f4e1; } .info { background: #e1ecf4; }
.warning { background: #fcf3d9; } .error { background: #f9e0e0; }
.errorlist { color: #b00020; margin: .25rem 0; padding-left: 1rem; }
.field { margin-bottom: 1rem; } .field label { display: block; font-weight: 600; }
.field input, .field textarea, .field select { width: 100%; padding: .4rem; box-sizing: border-box; }
.books { list-style: none; padding: 0; display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 1rem; }
.book-card { background: #fff; padding: 1rem; border-radius: 4px; box-shadow: 0 1px 2px rgba(0,0,0,.1); }
.cover { max-width: 180px; }
.stars { color: #e0a800; letter-spacing: 1px; }
table { border-collapse: collapse; width: 100%; background: #fff; }
th, td { text-align: left; padding: .4rem .6rem; border-bottom: 1px solid #ddd; }
.admin { display: flex; gap: 1.5rem; } .admin .results { flex: 1; }
.admin aside { min-width: 180px; } .admin aside ul { list-style: none; padding: 0; }
.admin aside a.selected { font-weight: 700; }
.danger { background: #b00020; color: #fff; border: none; padding: .4rem .8rem; border-radius: 3px; }
"#;

/// A full page for the current request.
pub fn page(ctx: &PageContext, title: &str, content: Markup) -> Markup {
    document(title, ctx.user.as_ref(), &ctx.messages, content)
}

/// The HTML shell: head, navigation bar, flash messages, then `content`.
pub fn document(
    title: &str,
    user: Option<&CurrentUser>,
    messages: &[Flash],
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | " (SITE_NAME) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                (nav(user))
                main {
                    @if !messages.is_empty() {
                        ul.messages {
                            @for flash in messages {
                                li class=(flash.level.as_str()) { (flash.message) }
                            }
                        }
                    }
                    (content)
                }
            }
        }
    }
}

fn nav(user: Option<&CurrentUser>) -> Markup {
    html! {
        header {
            a href="/" { strong { (SITE_NAME) } }
            a href="/books/" { "Books" }
            @if let Some(user) = user {
                a href="/book/add/" { "Add Book" }
                @if user.is_staff {
                    a href="/admin/" { "Admin" }
                }
                span.spacer {}
                span { "Signed in as " strong { (user.username) } }
                form method="post" action="/logout/" {
                    button type="submit" { "Log out" }
                }
            } @else {
                span.spacer {}
                a href="/login/" { "Log in" }
                a href="/register/" { "Register" }
            }
        }
    }
}
