//! In-memory reference implementations of [`crate::session::UserStore`] and
//! [`crate::session::MessagingSink`], used by the demo binary and by tests.
//! A real deployment would back these with a database; nothing else in the
//! crate depends on that, only on the trait.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::session::{MessagingSink, User, UserStore};

pub struct InMemoryUserStore {
    users: HashMap<String, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        InMemoryUserStore {
            users: HashMap::new(),
        }
    }

    pub fn insert(&mut self, user: User) {
        self.users.insert(format!("{}{}", user.user_id, user.ext), user);
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for InMemoryUserStore {
    fn exists(&self, user_id: &str) -> bool {
        self.users.values().any(|u| u.user_id == user_id)
    }

    fn exists_with_ext(&self, user_id: &str, ext: &str) -> bool {
        self.users.contains_key(&format!("{user_id}{ext}"))
    }

    fn login(&self, user_id: &str, ext: &str, password: &str, force: bool) -> Option<User> {
        let user = self.users.get(&format!("{user_id}{ext}"))?;
        if force || user.password == password {
            Some(user.clone())
        } else {
            None
        }
    }
}

#[derive(Default)]
pub struct InMemoryMessagingSink {
    mailboxes: Mutex<HashMap<String, Vec<(String, String)>>>,
}

impl InMemoryMessagingSink {
    pub fn new() -> Self {
        InMemoryMessagingSink {
            mailboxes: Mutex::new(HashMap::new()),
        }
    }
}

impl MessagingSink for InMemoryMessagingSink {
    fn send(&self, user_id: &str, ext: &str, body: &str) {
        let mut mailboxes = self.mailboxes.lock().expect("mailbox lock poisoned");
        mailboxes
            .entry(user_id.to_string())
            .or_default()
            .push((ext.to_string(), body.to_string()));
    }

    fn inbox(&self, user_id: &str) -> Vec<(String, String)> {
        let mailboxes = self.mailboxes.lock().expect("mailbox lock poisoned");
        mailboxes.get(user_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_matching_password() {
        let mut store = InMemoryUserStore::new();
        store.insert(User {
            user_id: "1234567".into(),
            ext: "0001".into(),
            password: "hunter2".into(),
            display_name: "Test User".into(),
            balance_cents: 0,
        });
        assert!(store.login("1234567", "0001", "hunter2", false).is_some());
        assert!(store.login("1234567", "0001", "wrong", false).is_none());
        assert!(store.login("1234567", "0001", "wrong", true).is_some());
        assert!(store.exists("1234567"));
        assert!(!store.exists("0000000"));
    }

    #[test]
    fn messages_are_delivered_in_send_order() {
        let sink = InMemoryMessagingSink::new();
        sink.send("bob", "1", "hi");
        sink.send("bob", "2", "hello");
        let inbox = sink.inbox("bob");
        assert_eq!(inbox, vec![("1".to_string(), "hi".to_string()), ("2".to_string(), "hello".to_string())]);
    }
}
