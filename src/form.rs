//! Form driver: walks a [`FormSpec`]'s fields through their editors, runs
//! per-field validation, the confirm sub-dialog, and target resolution.

use std::collections::HashMap;

use crate::editor::{EditOutcome, FieldEditor};
use crate::io::Terminal;
use crate::model::{FormSpec, PageId, TargetSpec, ValidatorTag};
use crate::registry::{Registry, ValidationOutcome as CustomValidationOutcome};
use crate::session::SessionState;
use crate::system_message::SystemMessage;

/// What a completed form hands back to the navigation loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormOutcome {
    Command(String),
    Data(HashMap<String, String>),
}

fn wait_for_ter(terminal: &mut dyn Terminal) -> std::io::Result<()> {
    loop {
        if terminal.read_byte()? == crate::cept::TER {
            return Ok(());
        }
    }
}

fn show_message_and_wait(terminal: &mut dyn Terminal, message: &SystemMessage) -> std::io::Result<()> {
    terminal.write_all(&message.to_cept_bytes())?;
    terminal.flush()?;
    wait_for_ter(terminal)
}

/// `OK` (advance), `BAD`/`RESTART` mirror the specification's named
/// validation outcomes, each carrying the message to show before waiting
/// for TER.
enum Validated {
    Ok,
    Bad(SystemMessage),
    Restart(SystemMessage),
}

/// Runs a form to completion against the given store/messaging/registry
/// collaborators.
pub fn run_form(
    terminal: &mut dyn Terminal,
    form: &FormSpec,
    session: &mut SessionState,
    registry: &Registry,
    user_store: &dyn crate::session::UserStore,
    messaging: &dyn crate::session::MessagingSink,
) -> std::io::Result<FormOutcome> {
    let mut editors: Vec<FieldEditor<'_>> = form
        .fields
        .iter()
        .map(|f| FieldEditor::new(f, form.no_navigation))
        .collect();
    for editor in &editors {
        editor.draw(terminal)?;
    }

    let mut data: HashMap<String, String> = HashMap::new();
    let mut i = 0usize;
    let mut skip = false;

    while i < form.fields.len() {
        let field = &form.fields[i];
        let (outcome, dct) = editors[i].edit(terminal, skip)?;
        if dct {
            skip = true;
        }

        let value = match outcome {
            EditOutcome::Command(cmd) => return Ok(FormOutcome::Command(cmd)),
            EditOutcome::Entered(s) => s,
        };

        data.insert(field.name.clone(), value);

        let validated = match &field.validator {
            None => Validated::Ok,
            Some(ValidatorTag::UserId) => {
                let user_id = data.get(&field.name).map(String::as_str).unwrap_or("");
                if user_store.exists(user_id) {
                    Validated::Ok
                } else {
                    Validated::Bad(SystemMessage::Custom(
                        "Teilnehmerkennung ungültig! -> #".to_string(),
                    ))
                }
            }
            Some(ValidatorTag::Ext) => {
                let user_id = data.get("user_id").cloned().unwrap_or_default();
                let raw_ext = data.get(&field.name).cloned().unwrap_or_default();
                let ext = if raw_ext.is_empty() { "1".to_string() } else { raw_ext };
                if user_store.exists_with_ext(&user_id, &ext) {
                    // write the normalized value back so later fields
                    // (e.g. the password field's login) see it too.
                    data.insert(field.name.clone(), ext);
                    Validated::Ok
                } else {
                    Validated::Bad(SystemMessage::Custom(
                        "Mitbenutzernummer ungültig! -> #".to_string(),
                    ))
                }
            }
            Some(ValidatorTag::LoginPassword) => {
                let user_id = data.get("user_id").map(String::as_str).unwrap_or("");
                let ext = data.get("ext").map(String::as_str).unwrap_or("1");
                let password = data.get(&field.name).map(String::as_str).unwrap_or("");
                match user_store.login(user_id, ext, password, false) {
                    Some(user) => {
                        session.user = Some(user);
                        Validated::Ok
                    }
                    None => Validated::Restart(SystemMessage::Custom(
                        "Ungültiger Teilnehmer/Kennwort -> #".to_string(),
                    )),
                }
            }
            Some(ValidatorTag::Custom(name)) => {
                let validator = registry.validator(name).expect("registered at load time");
                let value = data.get(&field.name).map(String::as_str).unwrap_or("");
                match validator.validate(value, session) {
                    CustomValidationOutcome::Ok => Validated::Ok,
                    CustomValidationOutcome::Bad(msg) => Validated::Bad(msg),
                }
            }
        };

        match validated {
            Validated::Ok => i += 1,
            Validated::Bad(msg) => {
                show_message_and_wait(terminal, &msg)?;
                // re-enter the same field; do not advance i.
            }
            Validated::Restart(msg) => {
                show_message_and_wait(terminal, &msg)?;
                i = 0;
                skip = false;
                data.clear();
            }
        }
    }

    if form.confirm {
        if confirm(terminal, 0)? {
            if form.action.as_deref() == Some("send_message") {
                let user_id = data.get("user_id").cloned().unwrap_or_default();
                let ext = data.get("ext").cloned().unwrap_or_else(|| "1".to_string());
                let body = data.get("body").cloned().unwrap_or_default();
                messaging.send(&user_id, &ext, &body);
                show_message_and_wait(terminal, &SystemMessage::Sent)?;
            }
        }
    } else if !form.no_55 {
        terminal.write_all(&SystemMessage::Accepted.to_cept_bytes())?;
        terminal.flush()?;
    }

    match &form.target {
        None => Ok(FormOutcome::Data(data)),
        Some(TargetSpec::Page(id)) => Ok(FormOutcome::Command(id.as_str().to_string())),
        Some(TargetSpec::Call(name)) => {
            let target = registry.target(name).expect("registered at load time");
            let id: PageId = target.invoke(&data, session);
            Ok(FormOutcome::Command(id.as_str().to_string()))
        }
    }
}

/// '2' cancels, '1' then '9' commits, backspace after '1' retracts it.
/// Any other key is ignored.
fn confirm(terminal: &mut dyn Terminal, price_cents: i64) -> std::io::Result<bool> {
    let message = if price_cents > 0 {
        SystemMessage::ConfirmWithPrice(price_cents)
    } else {
        SystemMessage::ConfirmFree
    };
    terminal.write_all(&message.to_cept_bytes())?;
    terminal.write_all(&crate::cept::set_cursor(24, 1))?;
    terminal.write_all(&crate::cept::sequence_end_of_page())?;
    terminal.flush()?;

    let mut seen_a_one = false;
    loop {
        let c = terminal.read_byte()?;
        match c {
            b'2' => return Ok(false),
            b'1' if !seen_a_one => {
                seen_a_one = true;
                terminal.write_all(&[c])?;
                terminal.flush()?;
            }
            b'9' if seen_a_one => return Ok(true),
            0x08 if seen_a_one => {
                seen_a_one = false;
                terminal.write_all(b"\x08 \x08")?;
                terminal.flush()?;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::InMemoryTerminal;
    use crate::store::{InMemoryMessagingSink, InMemoryUserStore};
    use sloggers::null::NullLoggerBuilder;
    use sloggers::Build;

    fn session() -> SessionState {
        SessionState::new(NullLoggerBuilder {}.build().unwrap(), false)
    }

    #[test]
    fn confirm_commits_on_one_then_nine() {
        let mut term = InMemoryTerminal::with_input(b"19");
        assert!(confirm(&mut term, 0).unwrap());
    }

    #[test]
    fn confirm_cancels_on_two() {
        let mut term = InMemoryTerminal::with_input(b"2");
        assert!(!confirm(&mut term, 0).unwrap());
    }

    #[test]
    fn confirm_retracts_the_one_on_backspace() {
        let mut term = InMemoryTerminal::with_input(&[b'1', 0x08, b'9', b'2']);
        // After backspace, '9' alone does not commit (no preceding '1'
        // left); the trailing '2' then cancels.
        assert!(!confirm(&mut term, 0).unwrap());
    }

    #[test]
    fn form_with_no_target_returns_collected_data() {
        let form = FormSpec {
            fields: vec![],
            no_navigation: false,
            confirm: false,
            no_55: true,
            action: None,
            target: None,
        };
        let registry = Registry::new();
        let store = InMemoryUserStore::new();
        let sink = InMemoryMessagingSink::new();
        let mut sess = session();
        let mut term = InMemoryTerminal::with_input(b"");
        let outcome = run_form(&mut term, &form, &mut sess, &registry, &store, &sink).unwrap();
        assert_eq!(outcome, FormOutcome::Data(HashMap::new()));
    }
}
