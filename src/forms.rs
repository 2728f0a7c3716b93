//! Form submitters: message, login, registration.
//!
//! Each submitter reads one input element from the page, POSTs it as JSON text
//! to a fixed endpoint, and writes the interpreted response back to the page.
//!
//! | form         | endpoint    | visible error on |
//! |--------------|-------------|------------------|
//! | message      | `/send`     | every reply      |
//! | login        | `/login`    | 400, 404         |
//! | registration | `/register` | 400              |
//!
//! Requests have no timeout and are never retried.

use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect, Client, Method, Response, Url};
use tracing::{debug, info};

use crate::config::Endpoints;
use crate::error::BoardError;
use crate::page::{with_page, ElementId, Page, SharedPage};
use crate::payload::{decode_error_body, CredentialPayload, MessagePayload, SendReply};

/// Content type the board page's `fetch` calls sent for a string body.
pub const BODY_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

/// Redirect hops followed before a submission fails.
pub const MAX_REDIRECTS: usize = 20;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// `err` was falsy; the input was cleared.
    Accepted,
    /// `err` carried text; the input was kept.
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The server redirected; the page now points at this URL.
    Navigated(String),
    /// A handled error status; the message is shown in the form's error element.
    Rejected(String),
    /// Any other status. Nothing on the page changed.
    Ignored(u16),
}

// ---------------------------------------------------------------------------
// Credential forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthForm {
    Login,
    Register,
}

/// What a credential form does with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Navigate,
    ShowError,
    Ignore,
}

impl AuthForm {
    pub fn input(&self) -> ElementId {
        match self {
            AuthForm::Login => ElementId::LoginInput,
            AuthForm::Register => ElementId::RegisterInput,
        }
    }

    pub fn error_element(&self) -> ElementId {
        match self {
            AuthForm::Login => ElementId::ErrorLogin,
            AuthForm::Register => ElementId::ErrorRegister,
        }
    }

    pub fn endpoint<'a>(&self, endpoints: &'a Endpoints) -> &'a Url {
        match self {
            AuthForm::Login => &endpoints.login,
            AuthForm::Register => &endpoints.register,
        }
    }

    /// Status codes that surface an inline error. Registration does not
    /// handle 404.
    pub fn handles_status(&self, status: u16) -> bool {
        match self {
            AuthForm::Login => matches!(status, 400 | 404),
            AuthForm::Register => status == 400,
        }
    }

    /// A redirect always wins over the status code.
    pub fn action(&self, redirected: bool, status: u16) -> AuthAction {
        if redirected {
            AuthAction::Navigate
        } else if self.handles_status(status) {
            AuthAction::ShowError
        } else {
            AuthAction::Ignore
        }
    }
}

impl std::fmt::Display for AuthForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthForm::Login => write!(f, "login"),
            AuthForm::Register => write!(f, "register"),
        }
    }
}

/// Write a `/send` reply to the page.
///
/// The input is cleared only when `err` is falsy, but `err` is always written
/// to the error element and the element is always made visible, even on
/// success.
pub fn apply_send_reply(page: &mut Page, reply: &SendReply) -> MessageOutcome {
    if reply.is_accepted() {
        page.set_value(ElementId::MessageInput, "");
    }
    let text = reply.error_text();
    page.set_inner_text(ElementId::ErrorDiv, text.clone());
    page.show(ElementId::ErrorDiv);

    if reply.is_accepted() {
        MessageOutcome::Accepted
    } else {
        MessageOutcome::Rejected(text)
    }
}

// ---------------------------------------------------------------------------
// BoardClient
// ---------------------------------------------------------------------------

/// Submits the page's forms to the board server.
pub struct BoardClient {
    http: Client,
    endpoints: Endpoints,
    page: SharedPage,
}

/// A response after all redirects, and whether any hop was taken.
struct Followed {
    resp: Response,
    redirected: bool,
}

impl BoardClient {
    /// Redirects are followed by [`BoardClient::post`], not by reqwest, so
    /// every hop is visible.
    ///
    /// # Errors
    /// `BoardError::Client` when the HTTP client cannot be built (TLS backend
    /// initialisation).
    pub fn new(endpoints: Endpoints, page: SharedPage) -> Result<Self, BoardError> {
        let http = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(BoardError::Client)?;
        Ok(Self {
            http,
            endpoints,
            page,
        })
    }

    pub fn page(&self) -> &SharedPage {
        &self.page
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// POST `body` to `url` and follow redirects.
    ///
    /// 301, 302 and 303 turn a POST into a body-less GET; 307 and 308 repeat
    /// the request unchanged. A redirect status without a usable `Location`
    /// is returned as the final response.
    async fn post(&self, url: &Url, body: String) -> Result<Followed, BoardError> {
        let mut method = Method::POST;
        let mut target = url.clone();
        let mut body = Some(body);
        let mut redirected = false;

        for _ in 0..=MAX_REDIRECTS {
            let mut req = self.http.request(method.clone(), target.clone());
            if let Some(body) = &body {
                req = req.header(CONTENT_TYPE, BODY_CONTENT_TYPE).body(body.clone());
            }
            let resp = req.send().await.map_err(|source| BoardError::Request {
                url: target.to_string(),
                source,
            })?;

            let status = resp.status();
            let next = resp
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|location| target.join(location).ok());
            let next = match (status.as_u16(), next) {
                (301 | 302 | 303, Some(next)) => {
                    if method != Method::HEAD {
                        method = Method::GET;
                    }
                    body = None;
                    next
                }
                (307 | 308, Some(next)) => next,
                _ => return Ok(Followed { resp, redirected }),
            };

            debug!(from = %target, to = %next, status = status.as_u16(), "following redirect");
            redirected = true;
            target = next;
        }

        Err(BoardError::TooManyRedirects {
            url: url.to_string(),
        })
    }

    /// Post the message input to `/send`.
    ///
    /// # Returns
    /// - `Ok(MessageOutcome)` once the reply has been written to the page.
    /// - `Err(BoardError::Request)` when the server cannot be reached.
    /// - `Err(BoardError::Decode)` when the reply is not a JSON object; the
    ///   page is left untouched.
    pub async fn submit_message(&self) -> Result<MessageOutcome, BoardError> {
        let msg = with_page(&self.page, |p| p.value(ElementId::MessageInput).to_string());
        let body = serde_json::to_string(&MessagePayload { msg: &msg })?;
        let url = &self.endpoints.send;

        let Followed { resp, .. } = self.post(url, body).await?;
        let reply: SendReply = resp.json().await.map_err(|e| BoardError::Decode {
            url: url.to_string(),
            detail: e.to_string(),
        })?;

        let outcome = with_page(&self.page, |p| apply_send_reply(p, &reply));
        debug!(?outcome, "message submitted");
        Ok(outcome)
    }

    pub async fn submit_login(&self) -> Result<AuthOutcome, BoardError> {
        self.submit_credentials(AuthForm::Login).await
    }

    pub async fn submit_registration(&self) -> Result<AuthOutcome, BoardError> {
        self.submit_credentials(AuthForm::Register).await
    }

    /// Post a credential form and act on the response.
    ///
    /// On a handled error status the error element is made visible before the
    /// body is decoded, so a body that fails to decode leaves it visible with
    /// its previous text.
    pub async fn submit_credentials(&self, form: AuthForm) -> Result<AuthOutcome, BoardError> {
        let username = with_page(&self.page, |p| p.value(form.input()).to_string());
        let body = serde_json::to_string(&CredentialPayload {
            username: &username,
        })?;
        let url = form.endpoint(&self.endpoints);

        let Followed { resp, redirected } = self.post(url, body).await?;
        let status = resp.status().as_u16();

        match form.action(redirected, status) {
            AuthAction::Navigate => {
                let target = resp.url().to_string();
                info!(%form, %target, "redirected, navigating");
                with_page(&self.page, |p| p.navigate(target.clone()));
                Ok(AuthOutcome::Navigated(target))
            }
            AuthAction::ShowError => {
                with_page(&self.page, |p| p.show(form.error_element()));
                let text = resp.text().await.map_err(|source| BoardError::Request {
                    url: url.to_string(),
                    source,
                })?;
                let message = decode_error_body(&text).map_err(|e| BoardError::Decode {
                    url: url.to_string(),
                    detail: e.to_string(),
                })?;
                with_page(&self.page, |p| {
                    p.set_inner_text(form.error_element(), message.clone())
                });
                debug!(%form, status, %message, "rejected");
                Ok(AuthOutcome::Rejected(message))
            }
            AuthAction::Ignore => {
                debug!(%form, status, "unhandled status, ignoring");
                Ok(AuthOutcome::Ignored(status))
            }
        }
    }
}
