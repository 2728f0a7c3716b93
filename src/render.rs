//! Terminal rendering of the page.

use colored::*;

use crate::page::{ElementId, Page};

const ERROR_ELEMENTS: [(ElementId, &str); 3] = [
    (ElementId::ErrorDiv, "message"),
    (ElementId::ErrorLogin, "login"),
    (ElementId::ErrorRegister, "register"),
];

/// Render the board region, visible error elements and the location.
///
/// Board markup is printed as received. Visible error elements with empty text
/// still get a line, matching a shown-but-empty error box.
pub fn render_page(page: &Page) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "── board ──".bright_cyan().bold()));
    let board = page.content(ElementId::BoardMessage);
    if board.is_empty() {
        out.push_str(&format!("{}\n", "(no messages yet)".dimmed()));
    } else {
        out.push_str(board);
        out.push('\n');
    }

    for (id, label) in ERROR_ELEMENTS {
        if page.is_visible(id) {
            out.push_str(&format!("{} {}\n", format!("[{label}]").yellow(), page.content(id).red()));
        }
    }

    if let Some(location) = page.location() {
        out.push_str(&format!("{} {}\n", "→".green(), location.underline()));
    }

    out
}
