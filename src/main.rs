mod cli;
mod error;
mod fmt;
mod ledger;
mod logging;
mod models;
mod render;
mod session;
mod settings;
mod storage;
mod sync;
mod tui;
mod view;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // init and load choose the data dir, so they log only once it is saved
    let moves_data_dir = matches!(
        cli.command,
        Some(Commands::Init { .. }) | Some(Commands::Load { .. })
    );
    if !moves_data_dir {
        start_logging();
    }

    let result = match cli.command {
        Some(Commands::Init { data_dir }) => cli::init::run(data_dir),
        Some(Commands::Add {
            date,
            category,
            memo,
            amount,
        }) => cli::entry::add(date.as_deref(), &category, &memo, &amount),
        Some(Commands::Delete { id }) => cli::entry::delete(id),
        Some(Commands::List) => cli::show::list(),
        Some(Commands::Chart) => cli::show::chart(),
        Some(Commands::Show) => cli::show::show(),
        Some(Commands::Export { format, output }) => cli::export::run(format, output),
        Some(Commands::Load { path }) => cli::load::run(&path),
        Some(Commands::Backup { output }) => cli::backup::run(output),
        Some(Commands::Status) => cli::status::run(),
        Some(Commands::Browse) | None => cli::browse::run(),
    };

    if moves_data_dir && result.is_ok() {
        start_logging();
        let settings = settings::load_settings();
        log::info!("event=data_dir_set data_dir={}", settings.data_dir);
    }

    if let Err(e) = &result {
        log::error!("event=command_failed error=\"{e}\"");
    }
    log::Log::flush(log::logger());

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn start_logging() {
    let settings = settings::load_settings();
    if let Err(e) = logging::init_logging(&settings.log_level, &settings.log_dir()) {
        eprintln!("Warning: {e}");
    }
}
