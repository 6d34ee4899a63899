//! Top-level navigation loop: resolves a page, transmits it, collects a
//! form (the page's own or a synthesized navigation prompt), and computes
//! the next page id, all driven against one [`Terminal`].

use std::path::Path;

use crate::cept;
use crate::form::{self, FormOutcome};
use crate::io::Terminal;
use crate::model::{FormSpec, PageId};
use crate::page::{self, DynamicPageProvider};
use crate::preamble::{self, FsDataSource};
use crate::registry::Registry;
use crate::session::{MessagingSink, SessionState, UserStore};
use crate::system_message::SystemMessage;

/// A desired next page id, as computed by the loop or requested by a form.
enum Desired {
    Id(String),
    /// `""` in the reference implementation: go back.
    Back,
    /// `"09"`: hard reload of the current page.
    HardReload,
    /// `"00"`: re-transmit the cached bytes for the current page.
    Resend,
}

fn classify(raw: &str) -> Desired {
    match raw {
        "" => Desired::Back,
        "09" => Desired::HardReload,
        "00" => Desired::Resend,
        other => Desired::Id(other.to_string()),
    }
}

pub struct NavigationLoop<'a> {
    data_root: &'a Path,
    registry: &'a Registry,
    providers: Vec<&'a dyn DynamicPageProvider>,
    user_store: &'a dyn UserStore,
    messaging: &'a dyn MessagingSink,
    source: FsDataSource,
    last_transmitted: Vec<u8>,
    last_links: std::collections::HashMap<String, String>,
    last_inputs: Option<FormSpec>,
}

impl<'a> NavigationLoop<'a> {
    pub fn new(
        data_root: &'a Path,
        registry: &'a Registry,
        providers: Vec<&'a dyn DynamicPageProvider>,
        user_store: &'a dyn UserStore,
        messaging: &'a dyn MessagingSink,
    ) -> Self {
        NavigationLoop {
            data_root,
            registry,
            providers,
            user_store,
            messaging,
            source: FsDataSource::new(data_root),
            last_transmitted: Vec::new(),
            last_links: std::collections::HashMap::new(),
            last_inputs: None,
        }
    }

    /// Runs the loop until the terminal's input stream is exhausted or a
    /// fatal I/O error occurs. `initial_pageid` seeds `desired_pageid`
    /// (the spec's `--page=` default is `"00000"`).
    pub fn run(&mut self, terminal: &mut dyn Terminal, session: &mut SessionState, initial_pageid: &str) -> std::io::Result<()> {
        let mut desired_pageid: Option<String> = Some(initial_pageid.to_string());
        let mut error: u16 = 0;

        loop {
            if session.is_logged_in() {
                session.tick(0);
            }

            let mut add_to_history = true;

            if error == 0 {
                match desired_pageid.as_deref().map(classify) {
                    None => error = 100,
                    Some(Desired::Back) => {
                        if session.history.len() < 2 {
                            error = 10;
                            desired_pageid = None;
                        } else {
                            session.history.pop();
                            let target = session.history.pop().unwrap();
                            desired_pageid = Some(target.as_str().to_string());
                        }
                    }
                    Some(Desired::HardReload) => {
                        add_to_history = false;
                        let current = session.history.last().cloned();
                        desired_pageid = current.map(|id| id.as_str().to_string());
                    }
                    Some(Desired::Resend) => {
                        add_to_history = false;
                        error = 0;
                    }
                    Some(Desired::Id(id)) => {
                        desired_pageid = Some(id);
                    }
                }
            }

            let mut links = std::collections::HashMap::new();
            let mut inputs = None;

            if error == 0 {
                if let Some(raw_id) = &desired_pageid {
                    if raw_id == "00" {
                        // resend: reuse the cached transmission and the
                        // links/inputs that went with it, untouched.
                        links = self.last_links.clone();
                        inputs = self.last_inputs.clone();
                    } else {
                        let id = PageId::new(raw_id.as_str()).map_err(to_io_error)?;
                        match page::resolve(self.data_root, &id, self.registry, &self.providers, session)
                            .map_err(to_io_error)?
                        {
                            Some(resolved) => {
                                let mut bytes = cept::hide_cursor();
                                if resolved.meta.clear_screen {
                                    bytes.extend(cept::serial_limited_mode());
                                    bytes.extend(cept::clear_screen());
                                }
                                bytes.extend(
                                    preamble::build_preamble(
                                        &self.source,
                                        &resolved.basedir,
                                        &resolved.meta,
                                        &mut session.preamble_cache,
                                    )
                                    .map_err(to_io_error)?,
                                );
                                if resolved.meta.cls2 {
                                    bytes.extend(cept::serial_limited_mode());
                                    bytes.extend(cept::clear_screen());
                                }
                                let hf = preamble::header_footer(
                                    id.normalized().as_str(),
                                    &resolved.meta.publisher_name,
                                    resolved.meta.publisher_color,
                                );
                                bytes.extend(&hf);
                                bytes.extend(&resolved.payload);
                                bytes.extend(cept::serial_limited_mode());
                                bytes.extend(&hf);
                                bytes.extend(cept::sequence_end_of_page());

                                self.last_transmitted = bytes;
                                links = resolved.meta.links.clone();
                                inputs = resolved.meta.inputs.clone();
                                self.last_links = links.clone();
                                self.last_inputs = inputs.clone();
                                error = 0;
                            }
                            None => {
                                error = if ends_in_subpage_letter(raw_id) { 101 } else { 100 };
                            }
                        }
                    }
                } else {
                    error = 100;
                }
            } else {
                links = self.last_links.clone();
                inputs = self.last_inputs.clone();
            }

            if error == 0 {
                let to_send = if session.compress {
                    cept::compress(&self.last_transmitted)
                } else {
                    self.last_transmitted.clone()
                };
                terminal.write_all(&to_send)?;
                terminal.flush()?;

                let current = PageId::new(desired_pageid.clone().unwrap()).map_err(to_io_error)?;
                session.current_pageid = Some(current.clone());
                if add_to_history {
                    session.push_history(current);
                }
            } else {
                links = self.last_links.clone();
                inputs = self.last_inputs.clone();
                let mut bytes = SystemMessage::from_error_code(error).to_cept_bytes();
                bytes.extend(cept::sequence_end_of_page());
                terminal.write_all(&bytes)?;
                terminal.flush()?;
            }

            let form = inputs.unwrap_or_else(|| FormSpec::default_navigation(&links));
            let outcome = form::run_form(terminal, &form, session, self.registry, self.user_store, self.messaging)?;

            error = 0;
            desired_pageid = match outcome {
                FormOutcome::Command(cmd) => Some(cmd),
                FormOutcome::Data(data) => {
                    let value = data.get("$navigation").cloned().unwrap_or_default();
                    if let Some(next) = links.get(&value) {
                        Some(next.clone())
                    } else if value.is_empty() {
                        if let Some(hash_link) = links.get("#") {
                            Some(hash_link.clone())
                        } else {
                            match session.current_pageid.as_ref().and_then(|id| id.successor()) {
                                Some(next) => Some(next.as_str().to_string()),
                                None => {
                                    error = 101;
                                    None
                                }
                            }
                        }
                    } else {
                        error = 100;
                        None
                    }
                }
            };
        }
    }
}

fn ends_in_subpage_letter(id: &str) -> bool {
    matches!(id.chars().last(), Some(c) if ('b'..='z').contains(&c))
}

fn to_io_error(e: crate::error::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_reserved_ids() {
        assert!(matches!(classify(""), Desired::Back));
        assert!(matches!(classify("09"), Desired::HardReload));
        assert!(matches!(classify("00"), Desired::Resend));
        assert!(matches!(classify("0a"), Desired::Id(_)));
    }

    #[test]
    fn subpage_letter_detection() {
        assert!(ends_in_subpage_letter("0b"));
        assert!(ends_in_subpage_letter("0z"));
        assert!(!ends_in_subpage_letter("0a"));
        assert!(!ends_in_subpage_letter("00000"));
    }
}
