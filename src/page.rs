//! In-memory model of the board page.
//!
//! The page is the fixed set of elements the listener and the form submitters
//! write to, plus the location the page was last navigated to. It is shared as
//! [`SharedPage`]; each element is written by at most one handler.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Shared page handle: one per client session.
pub type SharedPage = Arc<Mutex<Page>>;

/// Every element the client reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
    /// Board display region, mirrors the latest pushed update.
    BoardMessage,
    MessageInput,
    ErrorDiv,
    LoginInput,
    ErrorLogin,
    RegisterInput,
    ErrorRegister,
}

impl ElementId {
    pub const ALL: [ElementId; 7] = [
        ElementId::BoardMessage,
        ElementId::MessageInput,
        ElementId::ErrorDiv,
        ElementId::LoginInput,
        ElementId::ErrorLogin,
        ElementId::RegisterInput,
        ElementId::ErrorRegister,
    ];

    /// The element id used by the server-rendered page.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::BoardMessage => "boardMessage",
            ElementId::MessageInput => "messageInput",
            ElementId::ErrorDiv => "errorDiv",
            ElementId::LoginInput => "loginInput",
            ElementId::ErrorLogin => "errorLogin",
            ElementId::RegisterInput => "registerInput",
            ElementId::ErrorRegister => "errorRegister",
        }
    }

    /// Error elements are hidden until a handler forces them visible.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            ElementId::ErrorDiv | ElementId::ErrorLogin | ElementId::ErrorRegister
        )
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inner content of an element. Markup is stored exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Markup(String),
    Text(String),
}

impl Content {
    pub fn as_str(&self) -> &str {
        match self {
            Content::Markup(s) | Content::Text(s) => s,
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub content: Content,
    /// Current value for input elements; unused by display elements.
    pub value: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    elements: BTreeMap<ElementId, Element>,
    location: Option<String>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        let elements = ElementId::ALL
            .iter()
            .map(|&id| {
                let element = Element {
                    visible: !id.is_error(),
                    ..Element::default()
                };
                (id, element)
            })
            .collect();
        Self {
            elements,
            location: None,
        }
    }

    pub fn shared() -> SharedPage {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn element(&self, id: ElementId) -> &Element {
        // Every id is inserted by `new` and never removed.
        &self.elements[&id]
    }

    fn element_mut(&mut self, id: ElementId) -> &mut Element {
        self.elements.entry(id).or_default()
    }

    pub fn value(&self, id: ElementId) -> &str {
        &self.element(id).value
    }

    pub fn set_value(&mut self, id: ElementId, value: impl Into<String>) {
        self.element_mut(id).value = value.into();
    }

    /// Replace the element's content with raw markup. No sanitization.
    pub fn set_inner_html(&mut self, id: ElementId, markup: impl Into<String>) {
        self.element_mut(id).content = Content::Markup(markup.into());
    }

    pub fn set_inner_text(&mut self, id: ElementId, text: impl Into<String>) {
        self.element_mut(id).content = Content::Text(text.into());
    }

    pub fn show(&mut self, id: ElementId) {
        self.element_mut(id).visible = true;
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.element(id).visible
    }

    pub fn content(&self, id: ElementId) -> &str {
        self.element(id).content.as_str()
    }

    pub fn navigate(&mut self, url: impl Into<String>) {
        self.location = Some(url.into());
    }

    /// Where the page was last navigated to, if anywhere.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Run `f` with the page locked. A poisoned lock still yields the page.
pub fn with_page<R>(page: &SharedPage, f: impl FnOnce(&mut Page) -> R) -> R {
    let mut guard = page.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}
