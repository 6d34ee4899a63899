//! Registry of custom validators and call-targets.
//!
//! The original system dispatched `call:Class.method` strings dynamically
//! at the moment a field was validated or a form was submitted, so a typo
//! in a `.meta` file only surfaced when a user happened to trigger that
//! field. Here every `call:` tag is resolved against this registry while
//! the metadata document is loaded (see [`crate::model::PageMetadata::parse`]);
//! an unregistered tag is an [`crate::error::Error::UnknownTag`] at startup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::session::SessionState;
use crate::system_message::SystemMessage;

/// Outcome of a custom field validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    Ok,
    Bad(SystemMessage),
}

/// A custom validator referenced from a field's `validate`/`special` tag.
pub trait CustomValidator: Send + Sync {
    fn validate(&self, value: &str, session: &SessionState) -> ValidationOutcome;
}

/// A custom call-target referenced from a form's `target` tag.
///
/// Returns the id of the page to display next.
pub trait CustomTarget: Send + Sync {
    fn invoke(&self, data: &HashMap<String, String>, session: &mut SessionState) -> crate::model::PageId;
}

#[derive(Default, Clone)]
pub struct Registry {
    validators: HashMap<String, Arc<dyn CustomValidator>>,
    targets: HashMap<String, Arc<dyn CustomTarget>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            validators: HashMap::new(),
            targets: HashMap::new(),
        }
    }

    pub fn register_validator(&mut self, name: impl Into<String>, validator: Arc<dyn CustomValidator>) {
        self.validators.insert(name.into(), validator);
    }

    pub fn register_target(&mut self, name: impl Into<String>, target: Arc<dyn CustomTarget>) {
        self.targets.insert(name.into(), target);
    }

    pub fn has_validator(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    pub fn has_target(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    pub fn validator(&self, name: &str) -> Option<&Arc<dyn CustomValidator>> {
        self.validators.get(name)
    }

    pub fn target(&self, name: &str) -> Option<&Arc<dyn CustomTarget>> {
        self.targets.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysOk;
    impl CustomValidator for AlwaysOk {
        fn validate(&self, _value: &str, _session: &SessionState) -> ValidationOutcome {
            ValidationOutcome::Ok
        }
    }

    #[test]
    fn unregistered_tag_is_absent() {
        let registry = Registry::new();
        assert!(!registry.has_validator("Foo.bar"));
    }

    #[test]
    fn registered_tag_is_present() {
        let mut registry = Registry::new();
        registry.register_validator("Foo.bar", Arc::new(AlwaysOk));
        assert!(registry.has_validator("Foo.bar"));
    }
}
