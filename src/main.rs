use clap::Parser;
use miette::Result;
use stoneworks::cli::commands;
use stoneworks::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE so piping into `head` terminates quietly instead of panicking
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    stoneworks::core::logging::init_cli_logger(cli.global.verbose);
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::New(args) => commands::new::run(args, &global),
        Commands::Calc(args) => commands::calc::run(args, &global),
        Commands::Set(args) => commands::set::run(args, &global),
        Commands::List(args) => commands::list::run(args, &global),
        Commands::Validate(args) => commands::validate::run(args, &global),
        Commands::Item(args) => commands::item::run(args, &global),
        Commands::Tax(args) => commands::tax::run(args, &global),
        Commands::Schedule(args) => commands::schedule::run(args, &global),
        Commands::Export(args) => commands::export::run(args, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
