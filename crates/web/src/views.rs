//! Server-rendered pages.

use maud::{DOCTYPE, Markup, html};
use quiz_core::model::{Question, Score, TraitName};

const STYLE: &str = "\
body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }\
fieldset { border: none; padding: 0; }\
label { display: block; margin: 0.4rem 0; }\
button { margin-top: 1rem; padding: 0.4rem 1.2rem; }";

/// Shared page shell.
pub fn page(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (STYLE) }
            }
            body {
                main { (content) }
            }
        }
    }
}

/// Entry form asking for a username.
pub fn index_page() -> Markup {
    page(
        "Personality Quiz",
        html! {
            h1 { "Personality Quiz" }
            p { "Answer a few statements to see your five trait totals." }
            form method="post" action="/" {
                label for="username" { "Your name" }
                input type="text" id="username" name="username" autofocus;
                button type="submit" { "Start" }
            }
        },
    )
}

/// One quiz step: the statement plus the five Likert options.
pub fn question_page(number: usize, total: usize, question: &Question) -> Markup {
    page(
        "Personality Quiz",
        html! {
            p { "Question " (number) " of " (total) }
            h1 { (question.text()) }
            form method="post" action="/quiz" {
                fieldset {
                    @for (key, label) in question.options() {
                        label {
                            input type="radio" name="option" value=(key);
                            " " (label)
                        }
                    }
                }
                button type="submit" { "Next" }
            }
        },
    )
}

/// Final page with the five trait totals.
pub fn result_page(username: &str, score: &Score) -> Markup {
    page(
        "Your Results",
        html! {
            h1 { "Results for " (username) }
            table {
                thead { tr { th { "Trait" } th { "Total" } } }
                tbody {
                    @for name in TraitName::ALL {
                        tr {
                            td { (name.as_str()) }
                            td { (score.get(name)) }
                        }
                    }
                }
            }
            p { a href="/" { "Take the quiz again" } }
        },
    )
}
