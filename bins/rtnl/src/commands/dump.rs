//! Dump commands.
//!
//! Each dump sends one request and prints the reassembled reply, one entity
//! per line. Notifications that arrive in between are printed as they come.

use std::fmt::Display;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use rtnl::netlink::{
    AF_UNSPEC, AddressRequest, LinkRequest, ReceiveMode, Received, RequestKind, Response,
    RouteRequest,
};
use rtnl::{Result, Socket};

use super::monitor::print_notifications;

/// Delay between polls in non-blocking mode.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Send a dump request of kind `K` and wait for its completed response.
pub fn dump<K: RequestKind>(
    socket: &mut Socket,
    family: u8,
    mode: ReceiveMode,
    out: &mut impl Write,
) -> Result<Response<K::Item>> {
    socket.send_request::<K>(family)?;

    loop {
        match socket.receive(mode) {
            Ok(Received::Notification(entity)) => writeln!(out, "{}", entity)?,
            Ok(received) => return Ok(K::unwrap_response(received)?),
            Err(e) if e.is_would_block() => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(e),
        }
    }
}

fn print<T: Display>(out: &mut impl Write, title: &str, response: &Response<T>) -> Result<()> {
    writeln!(out, "{} (request {}):", title, response.id)?;
    for item in &response.data {
        writeln!(out, "  {}", item)?;
    }
    Ok(())
}

fn family_name(family: u8) -> &'static str {
    match family {
        rtnl::netlink::AF_INET => "IPv4",
        rtnl::netlink::AF_INET6 => "IPv6",
        _ => "any",
    }
}

fn dump_links(socket: &mut Socket, mode: ReceiveMode, out: &mut impl Write) -> Result<()> {
    let links = dump::<LinkRequest>(socket, AF_UNSPEC, mode, out)?;
    print(out, "Links", &links)
}

fn dump_addresses(
    socket: &mut Socket,
    families: &[u8],
    mode: ReceiveMode,
    out: &mut impl Write,
) -> Result<()> {
    for &family in families {
        let addrs = dump::<AddressRequest>(socket, family, mode, out)?;
        print(out, &format!("{} addresses", family_name(family)), &addrs)?;
    }
    Ok(())
}

fn dump_routes(
    socket: &mut Socket,
    families: &[u8],
    mode: ReceiveMode,
    out: &mut impl Write,
) -> Result<()> {
    for &family in families {
        let routes = dump::<RouteRequest>(socket, family, mode, out)?;
        print(out, &format!("{} routes", family_name(family)), &routes)?;
    }
    Ok(())
}

pub fn links(mode: ReceiveMode) -> Result<()> {
    let mut socket = Socket::open(&[])?;
    dump_links(&mut socket, mode, &mut io::stdout().lock())
}

pub fn addresses(families: &[u8], mode: ReceiveMode) -> Result<()> {
    let mut socket = Socket::open(&[])?;
    dump_addresses(&mut socket, families, mode, &mut io::stdout().lock())
}

pub fn routes(families: &[u8], mode: ReceiveMode) -> Result<()> {
    let mut socket = Socket::open(&[])?;
    dump_routes(&mut socket, families, mode, &mut io::stdout().lock())
}

/// Dump links, routes and addresses on one socket joined to every group,
/// then print `count` notifications.
pub fn all(families: &[u8], mode: ReceiveMode, count: usize) -> Result<()> {
    let mut socket = Socket::builder().all().open()?;
    let mut out = io::stdout().lock();

    dump_links(&mut socket, mode, &mut out)?;
    dump_routes(&mut socket, families, mode, &mut out)?;
    dump_addresses(&mut socket, families, mode, &mut out)?;

    writeln!(out, "Waiting for {} notifications...", count)?;
    print_notifications(&mut socket, Some(count), &mut out)
}
