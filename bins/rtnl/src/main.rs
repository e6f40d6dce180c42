//! rtnl command - dump links, addresses and routes and watch for changes.

mod commands;

use clap::{Parser, Subcommand};
use rtnl::netlink::{AF_INET, AF_INET6, ReceiveMode};

#[derive(Parser)]
#[command(name = "rtnl", version, about = "Query the kernel routing tables over rtnetlink")]
struct Cli {
    /// Use IPv4 only.
    #[arg(short = '4', global = true)]
    ipv4: bool,

    /// Use IPv6 only.
    #[arg(short = '6', global = true)]
    ipv6: bool,

    /// Poll without blocking while waiting for replies.
    #[arg(long, global = true)]
    nonblock: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dump network interfaces.
    #[command(visible_alias = "l")]
    Links,

    /// Dump interface addresses.
    #[command(visible_alias = "a", visible_alias = "addr")]
    Addresses,

    /// Dump routes.
    #[command(visible_alias = "r")]
    Routes,

    /// Print change notifications.
    #[command(visible_alias = "m", visible_alias = "mon")]
    Monitor(commands::monitor::MonitorCmd),

    /// Dump everything, then print change notifications.
    All {
        /// Number of notifications to print before exiting.
        #[arg(short = 'c', long, default_value_t = 10)]
        count: usize,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let families = match (cli.ipv4, cli.ipv6) {
        (true, false) => vec![AF_INET],
        (false, true) => vec![AF_INET6],
        _ => vec![AF_INET, AF_INET6],
    };
    let mode = if cli.nonblock {
        ReceiveMode::Nonblock
    } else {
        ReceiveMode::Wait
    };

    let result = match cli.command {
        Command::Links => commands::dump::links(mode),
        Command::Addresses => commands::dump::addresses(&families, mode),
        Command::Routes => commands::dump::routes(&families, mode),
        Command::Monitor(cmd) => cmd.run(),
        Command::All { count } => commands::dump::all(&families, mode, count),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
