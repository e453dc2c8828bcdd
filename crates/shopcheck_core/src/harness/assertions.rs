use crate::context::ScenarioContext;
use crate::error::{body_prefix, HarnessError, Result};
use crate::oracle::{PageFacet, StateOracle};
use crate::transport::Transport;
use crate::types::{ApplicationState, HttpExchange};

/// Declarative checks against the current actor's last step.
///
/// "Original" refers to the response to the step's own request, "final" to
/// the page the step ended on after redirect resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    // Oracle
    State(ApplicationState),
    NotState(ApplicationState),
    LoginSucceeded,
    LoginFailed,
    CartCount(u32),
    CartCountAtLeast(u32),

    // Session
    SessionPresent,
    NoSession,

    // Envelope
    OriginalStatus(u16),
    OriginalStatusIn(Vec<u16>),
    OriginalStatusNot(u16),
    FinalStatus(u16),
    LocationPresent,

    // Content
    BodyContains(String),
    BodyLacks(String),
    Shows(PageFacet),
    Hides(PageFacet),
}

impl Assertion {
    /// Evaluates the assertion, describing any deviation in the error.
    pub fn check<T: Transport>(
        &self,
        ctx: &ScenarioContext<T>,
        oracle: &StateOracle,
        prefix_chars: usize,
    ) -> Result<()> {
        match self {
            Self::SessionPresent => {
                return session_check(ctx, true, "a session token");
            }
            Self::NoSession => {
                return session_check(ctx, false, "no session token");
            }
            _ => {}
        }

        let last = ctx
            .last()
            .ok_or_else(|| HarnessError::NoExchange(ctx.name().to_string()))?;
        let original = &last.original;
        let destination = last.destination();
        let prefix = |exchange: &HttpExchange| body_prefix(&exchange.body, prefix_chars);

        match self {
            Self::State(expected) => {
                let actual = oracle.classify(destination);
                let ok = *expected == actual;
                expect_state(expected.to_string(), actual, ok, destination, prefix_chars)
            }
            Self::NotState(unwanted) => {
                let actual = oracle.classify(destination);
                let expected = format!("anything but {}", unwanted);
                let ok = *unwanted != actual;
                expect_state(expected, actual, ok, destination, prefix_chars)
            }
            Self::LoginSucceeded => {
                let actual = oracle.classify_login_attempt(destination, ctx.session().is_present());
                let expected = ApplicationState::Authenticated;
                let ok = actual == expected;
                expect_state(expected.to_string(), actual, ok, destination, prefix_chars)
            }
            Self::LoginFailed => {
                let actual = oracle.classify_login_attempt(destination, ctx.session().is_present());
                let expected = ApplicationState::AuthenticationFailed;
                let ok = actual == expected;
                expect_state(expected.to_string(), actual, ok, destination, prefix_chars)
            }
            Self::CartCount(n) => {
                let actual = oracle.cart_state(destination);
                let expected = ApplicationState::CartState(*n);
                let ok = actual == expected;
                expect_state(expected.to_string(), actual, ok, destination, prefix_chars)
            }
            Self::CartCountAtLeast(n) => {
                let actual = oracle.cart_state(destination);
                let ok = matches!(actual, ApplicationState::CartState(m) if m >= *n);
                expect_state(format!("CartState(>= {})", n), actual, ok, destination, prefix_chars)
            }
            Self::OriginalStatus(status) => {
                expect_status("original response", &[*status], original, prefix(original))
            }
            Self::OriginalStatusIn(statuses) => {
                expect_status("original response", statuses, original, prefix(original))
            }
            Self::OriginalStatusNot(status) => {
                if original.status == *status {
                    Err(HarnessError::UnexpectedStatus {
                        context: format!("{} {}", original.method, original.path),
                        expected: format!("anything but {}", status),
                        actual: original.status,
                        body_prefix: prefix(original),
                    })
                } else {
                    Ok(())
                }
            }
            Self::FinalStatus(status) => {
                expect_status("final page", &[*status], destination, prefix(destination))
            }
            Self::LocationPresent => match original.location() {
                Some(_) => Ok(()),
                None => Err(HarnessError::MissingLocation {
                    method: original.method.to_string(),
                    path: original.path.clone(),
                    status: original.status,
                }),
            },
            Self::BodyContains(text) => expect_content(
                destination.body.contains(text.as_str()),
                format!("final page of {} should contain {:?}", original.path, text),
                prefix(destination),
            ),
            Self::BodyLacks(text) => expect_content(
                !destination.body.contains(text.as_str()),
                format!("final page of {} should not contain {:?}", original.path, text),
                prefix(destination),
            ),
            Self::Shows(facet) => expect_content(
                oracle.shows(*facet, destination),
                format!(
                    "final page of {} should show {:?} {:?}",
                    original.path,
                    facet,
                    facet.markers()
                ),
                prefix(destination),
            ),
            Self::Hides(facet) => expect_content(
                !facet.markers().iter().any(|m| destination.body.contains(m)),
                format!(
                    "final page of {} should hide {:?} {:?}",
                    original.path,
                    facet,
                    facet.markers()
                ),
                prefix(destination),
            ),
            Self::SessionPresent | Self::NoSession => Ok(()),
        }
    }
}

fn session_check<T: Transport>(
    ctx: &ScenarioContext<T>,
    want_present: bool,
    expected: &'static str,
) -> Result<()> {
    if ctx.session().is_present() == want_present {
        Ok(())
    } else {
        Err(HarnessError::SessionMismatch {
            actor: ctx.name().to_string(),
            expected,
        })
    }
}

fn expect_state(
    expected: String,
    actual: ApplicationState,
    ok: bool,
    exchange: &HttpExchange,
    prefix_chars: usize,
) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(HarnessError::OracleMismatch {
            expected,
            actual: actual.to_string(),
            body_prefix: body_prefix(&exchange.body, prefix_chars),
        })
    }
}

fn expect_status(
    what: &str,
    accepted: &[u16],
    exchange: &HttpExchange,
    body_prefix: String,
) -> Result<()> {
    if accepted.contains(&exchange.status) {
        return Ok(());
    }
    let expected = accepted
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" or ");
    Err(HarnessError::UnexpectedStatus {
        context: format!("{} of {} {}", what, exchange.method, exchange.path),
        expected,
        actual: exchange.status,
        body_prefix,
    })
}

fn expect_content(ok: bool, context: String, body_prefix: String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(HarnessError::ContentMismatch {
            context,
            body_prefix,
        })
    }
}
