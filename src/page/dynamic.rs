//! Dynamic page generators, checked before the filesystem lookup.
//!
//! Order matters and is fixed by the resolver: login ("00000"/"9a"), then
//! user management ("7" prefix), then messaging ("8" prefix). Each
//! generator returns `None` to fall through to the next one (and
//! eventually to the filesystem) if its prefix doesn't actually apply to
//! this exact id.

use crate::model::PageId;
use crate::session::SessionState;

/// A page generator keyed by id prefix. Returns `(meta_json, payload)` or
/// `None` if this id, despite matching [`matches`], isn't one this
/// provider actually produces a page for.
pub trait DynamicPageProvider {
    fn matches(&self, id: &PageId) -> bool;
    fn create_page(&self, id: &PageId, session: &mut SessionState) -> Option<(String, Vec<u8>)>;
}

/// The login page: collects `user_id`/`ext`/`password` and targets the
/// home page ("0") on success.
pub struct LoginProvider;

impl DynamicPageProvider for LoginProvider {
    fn matches(&self, id: &PageId) -> bool {
        id.starts_with("00000") || id.as_str() == "9a"
    }

    fn create_page(&self, _id: &PageId, session: &mut SessionState) -> Option<(String, Vec<u8>)> {
        if session.is_logged_in() {
            return None;
        }
        let meta = r#"{
            "publisher_name": "Bildschirmtext",
            "publisher_color": 0,
            "links": {},
            "inputs": {
                "fields": [
                    {"name": "user_id", "line": 10, "column": 10, "height": 1, "width": 7, "validate": "user_id", "end_on_legal_string": false, "end_on_illegal_character": false, "echo_ter": true},
                    {"name": "ext", "line": 11, "column": 10, "height": 1, "width": 4, "validate": "ext", "echo_ter": true},
                    {"name": "password", "line": 12, "column": 10, "height": 1, "width": 8, "validate": "$login_password", "echo_ter": true}
                ],
                "confirm": false,
                "no_55": true,
                "target": "page:0"
            }
        }"#;
        Some((meta.to_string(), Vec::new()))
    }
}

/// User-management pages (account settings, password change, ...).
pub struct UserManagementProvider;

impl DynamicPageProvider for UserManagementProvider {
    fn matches(&self, id: &PageId) -> bool {
        id.starts_with("7")
    }

    fn create_page(&self, _id: &PageId, _session: &mut SessionState) -> Option<(String, Vec<u8>)> {
        None
    }
}

/// Messaging pages (inbox, compose).
pub struct MessagingProvider;

impl DynamicPageProvider for MessagingProvider {
    fn matches(&self, id: &PageId) -> bool {
        id.starts_with("8")
    }

    fn create_page(&self, _id: &PageId, _session: &mut SessionState) -> Option<(String, Vec<u8>)> {
        None
    }
}
