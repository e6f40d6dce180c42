//! Dumps against the running kernel.
//!
//! Reading rtnetlink dumps needs no privileges, so these only require a
//! Linux host with a loopback interface.

use rtnl::netlink::{
    AF_INET, AF_UNSPEC, AddressRequest, InterfaceType, LinkRequest, ReceiveMode, RouteRequest,
};
use rtnl::{Result, Socket};

fn open() -> Result<Socket> {
    // Let the kernel pick the port ID so tests can run in parallel.
    Socket::builder().pid(0).open()
}

#[test]
fn test_live_link_dump() -> Result<()> {
    let mut socket = open()?;
    let id = socket.send_request::<LinkRequest>(AF_UNSPEC)?;

    let links = socket.receive_typed::<LinkRequest>(ReceiveMode::Wait)?;
    assert_eq!(links.id, id);
    let lo = links
        .data
        .iter()
        .find(|l| l.name == "lo")
        .expect("loopback interface");
    assert_eq!(lo.kind, InterfaceType::Loopback);

    Ok(())
}

#[test]
fn test_live_address_dump() -> Result<()> {
    let mut socket = open()?;
    socket.send_request::<AddressRequest>(AF_INET)?;

    let addrs = socket.receive_typed::<AddressRequest>(ReceiveMode::Wait)?;
    assert!(
        addrs
            .data
            .iter()
            .any(|a| a.address == Some("127.0.0.1".parse().unwrap())),
        "127.0.0.1 should be configured"
    );

    Ok(())
}

#[test]
fn test_live_route_dump() -> Result<()> {
    let mut socket = open()?;
    socket.send_request::<RouteRequest>(AF_INET)?;
    socket.receive_typed::<RouteRequest>(ReceiveMode::Wait)?;

    socket.send_request::<RouteRequest>(AF_INET)?;
    socket.receive_typed::<RouteRequest>(ReceiveMode::Wait)?;
    assert_eq!(socket.sequence(), 2);

    Ok(())
}

#[test]
fn test_live_nonblock_idle() -> Result<()> {
    let mut socket = open()?;
    let err = socket.receive(ReceiveMode::Nonblock).unwrap_err();
    assert!(err.is_would_block());

    Ok(())
}
