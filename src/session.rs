//! Session state threaded through a single connection's navigation loop.
//!
//! The reference implementation kept the logged-in user, the last page
//! shown, and the last palette/include sent to the terminal in module
//! globals, so a second concurrent connection in the same process would
//! corrupt another session's picture of what the terminal already has
//! loaded. Here all of that lives in `SessionState`, owned by the one
//! navigation loop driving a single terminal.

use std::collections::HashMap;

use slog::Logger;

use crate::model::PageId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub ext: String,
    pub password: String,
    pub display_name: String,
    pub balance_cents: i64,
}

/// Looks up and authenticates users. `InMemoryUserStore` in `store.rs` is
/// the reference implementation used by tests and the demo binary.
pub trait UserStore: Send + Sync {
    fn exists(&self, user_id: &str) -> bool;
    fn exists_with_ext(&self, user_id: &str, ext: &str) -> bool;
    /// `force` bypasses the password check, for `--user=` auto-login.
    fn login(&self, user_id: &str, ext: &str, password: &str, force: bool) -> Option<User>;
}

/// Accepts messages addressed to a user's mailbox, keyed by `user_id` and
/// the recipient's sub-user `ext`.
pub trait MessagingSink: Send + Sync {
    fn send(&self, user_id: &str, ext: &str, body: &str);
    fn inbox(&self, user_id: &str) -> Vec<(String, String)>;
}

/// What the terminal was last told to load, so the preamble builder can
/// skip re-sending a palette or include file the terminal already has.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreambleCache {
    pub last_palette: Option<String>,
    pub last_include: Option<String>,
}

pub struct SessionState {
    pub user: Option<User>,
    pub preamble_cache: PreambleCache,
    pub history: Vec<PageId>,
    pub current_pageid: Option<PageId>,
    pub compress: bool,
    pub logger: Logger,
    pub fields: HashMap<String, String>,
}

impl SessionState {
    pub fn new(logger: Logger, compress: bool) -> Self {
        SessionState {
            user: None,
            preamble_cache: PreambleCache::default(),
            history: Vec::new(),
            current_pageid: None,
            compress,
            logger,
            fields: HashMap::new(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Pushes the current page onto history before navigating away from
    /// it, mirroring the reference implementation's back-stack.
    pub fn push_history(&mut self, id: PageId) {
        self.history.push(id);
    }

    /// Pops the page we should return to on a `#` (back) navigation.
    /// `None` means there is nowhere to go back to.
    pub fn pop_history(&mut self) -> Option<PageId> {
        self.history.pop()
    }

    /// Per-billing-tick balance update, mirroring the reference
    /// implementation's `User.stats.update()` called once per page view.
    pub fn tick(&mut self, cost_cents: i64) {
        if let Some(user) = &mut self.user {
            user.balance_cents -= cost_cents;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sloggers::null::NullLoggerBuilder;
    use sloggers::Build;

    fn logger() -> Logger {
        NullLoggerBuilder {}.build().unwrap()
    }

    #[test]
    fn history_pushes_and_pops_in_order() {
        let mut s = SessionState::new(logger(), false);
        s.push_history(PageId::new("0a").unwrap());
        s.push_history(PageId::new("7a").unwrap());
        assert_eq!(s.pop_history().unwrap().as_str(), "7a");
        assert_eq!(s.pop_history().unwrap().as_str(), "0a");
        assert!(s.pop_history().is_none());
    }

    #[test]
    fn tick_debits_logged_in_user_only() {
        let mut s = SessionState::new(logger(), false);
        s.tick(50);
        assert!(s.user.is_none());
        s.user = Some(User {
            user_id: "1234567".into(),
            ext: "0001".into(),
            password: "secret".into(),
            display_name: "Test User".into(),
            balance_cents: 1000,
        });
        s.tick(50);
        assert_eq!(s.user.as_ref().unwrap().balance_cents, 950);
    }
}
