//! rtnl monitor - print change notifications.

use std::io::{self, Write};

use clap::Args;
use rtnl::netlink::{ReceiveMode, Received, SocketError};
use rtnl::{Result, Socket};

#[derive(Args)]
pub struct MonitorCmd {
    /// Watch link changes.
    #[arg(long)]
    links: bool,

    /// Watch address changes.
    #[arg(long)]
    addresses: bool,

    /// Watch route changes.
    #[arg(long)]
    routes: bool,

    /// Exit after this many notifications.
    #[arg(short = 'c', long)]
    count: Option<usize>,
}

impl MonitorCmd {
    pub fn run(&self) -> Result<()> {
        let any = self.links || self.addresses || self.routes;
        let builder = if any {
            Socket::builder()
                .links(self.links)
                .addresses(self.addresses)
                .routes(self.routes)
        } else {
            Socket::builder().all()
        };

        let mut socket = builder.open()?;
        print_notifications(&mut socket, self.count, &mut io::stdout().lock())
    }
}

/// Print notifications until `count` have been seen, or forever.
pub fn print_notifications(
    socket: &mut Socket,
    count: Option<usize>,
    out: &mut impl Write,
) -> Result<()> {
    let mut seen = 0;
    while count.is_none_or(|count| seen < count) {
        match socket.receive(ReceiveMode::Wait) {
            Ok(Received::Notification(entity)) => {
                writeln!(out, "{}", entity)?;
                out.flush()?;
                seen += 1;
            }
            Ok(other) => tracing::debug!(?other, "ignoring dump response"),
            Err(e) if e.socket_error() == Some(SocketError::Noop) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
