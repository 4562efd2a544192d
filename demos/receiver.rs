extern crate oscore;
extern crate tracing_subscriber;

use oscore::decoder;
use oscore::receiver::Receiver;
use std::env;
use std::net::{SocketAddrV4, UdpSocket};
use std::str::FromStr;

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let usage = format!("Usage {} IP:PORT", &args[0]);
    if args.len() < 2 {
        println!("{}", usage);
        ::std::process::exit(1)
    }
    let addr = match SocketAddrV4::from_str(&args[1]) {
        Ok(addr) => addr,
        Err(_) => panic!("{}", usage),
    };
    let sock = UdpSocket::bind(addr).unwrap();
    println!("Listening to {}", addr);

    let receiver = Receiver::new();
    receiver
        .add_callback("/*", |msg| {
            println!("OSC address: {}", msg.addr);
            println!("OSC arguments: {:?}", msg.args);
        })
        .unwrap();

    let mut buf = [0u8; decoder::MTU];
    loop {
        match sock.recv_from(&mut buf) {
            Ok((size, source)) => {
                println!("Received packet with size {} from: {}", size, source);
                if let Err(e) = receiver.on_datagram(&buf[..size], source) {
                    println!("Failed to decode packet: {}", e);
                }
            }
            Err(e) => {
                println!("Error receiving from socket: {}", e);
                break;
            }
        }
    }
}
