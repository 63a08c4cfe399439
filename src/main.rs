use clap::Parser;
use nlrexpress::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{annotate, predict},
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Predict(_) => "predict",
        Command::Annotate(_) => "annotate",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        *FULL_VERSION,
        subcommand_name
    );
    match cli.command {
        Command::Predict(args) => predict::predict(args)?,
        Command::Annotate(args) => annotate::annotate(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
