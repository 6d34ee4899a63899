use std::io::{stdin, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use slog::info;

use btx_server::config::{self, Cli};
use btx_server::io::StdTerminal;
use btx_server::logging::build_logger;
use btx_server::nav::NavigationLoop;
use btx_server::page::dynamic::{LoginProvider, MessagingProvider, UserManagementProvider};
use btx_server::registry::Registry;
use btx_server::session::SessionState;
use btx_server::store::{InMemoryMessagingSink, InMemoryUserStore};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logger = build_logger(cli.log_file.as_deref(), cli.severity());
    info!(logger, "btx-server starting"; "data_root" => &cli.data_root);

    let data_root = PathBuf::from(&cli.data_root);
    let registry = Registry::new();
    let user_store = InMemoryUserStore::new();
    let messaging = InMemoryMessagingSink::new();

    let providers: Vec<&dyn btx_server::page::DynamicPageProvider> =
        vec![&LoginProvider, &UserManagementProvider, &MessagingProvider];

    let mut session = SessionState::new(logger.clone(), cli.compress);
    let mut terminal = StdTerminal::new(stdin(), stdout());

    if cli.modem {
        if let Err(e) = config::wait_for_dial_command(&mut terminal) {
            info!(logger, "fatal i/o waiting for dial command"; "error" => %e);
            return ExitCode::FAILURE;
        }
    }

    if let Some(user_id) = &cli.user {
        if let Some(user) = user_store.login(user_id, "1", "", true) {
            session.user = Some(user);
        }
    }

    let mut nav = NavigationLoop::new(&data_root, &registry, providers, &user_store, &messaging);

    match nav.run(&mut terminal, &mut session, &cli.page) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            info!(logger, "fatal i/o error"; "error" => %e);
            ExitCode::FAILURE
        }
    }
}
