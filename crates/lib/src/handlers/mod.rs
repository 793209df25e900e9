//! Tag handlers.
//!
//! Each handler consumes the decoded request and builds a fresh response. Handlers
//! share nothing mutable; randomness, time and the joke source come in through
//! `HandlerContext` so they can be pinned in tests.

mod accounts;
mod context;
mod greeting;
mod joke;

pub use accounts::{
    generate_account_number, is_registered, validate_account_number, ACCOUNT_NUMBER_PARAM,
    ACCOUNT_REGISTRY, ISSUABLE_ACCOUNTS, VALID_ACCOUNT_NUMBER_PARAM,
};
pub use context::{
    Clock, FixedClock, HandlerContext, LocalClock, Picker, SeededPicker, ThreadRngPicker,
};
pub use greeting::{greeting, salutation, HOURS_PARAM};
pub use joke::joke;

#[cfg(test)]
pub(crate) use testing::{test_context, StaticJokes};
