//! Authentication and session management for the Robinhood API.
//!
//! Login is a two-step state machine. The password grant either
//! authenticates right away, asks for a verification code, or is
//! rejected:
//!
//! ```no_run
//! use robinhood_rs::{LoginOutcome, Trader};
//!
//! # async fn example() -> robinhood_rs::Result<()> {
//! let trader = Trader::new()?;
//!
//! match trader.login("username", "password").await? {
//!     LoginOutcome::Authenticated => {}
//!     LoginOutcome::ChallengeRequired(challenge) => {
//!         let code = "123456"; // prompt the user
//!         let outcome = trader.complete_login(challenge, code).await?;
//!         assert!(outcome.is_authenticated());
//!     }
//!     LoginOutcome::Rejected => eprintln!("bad credentials"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Access tokens are not refreshed. An expired token shows up as an
//! [`Error::Api`](crate::Error::Api) with status 401.

mod login;
mod session;

pub use login::{LoginOutcome, MfaChallenge};
pub use session::Session;
pub(crate) use login::{answer_challenge, password_grant, revoke};
