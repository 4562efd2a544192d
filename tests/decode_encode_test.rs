extern crate hex;
extern crate oscore;

use oscore::{decoder, encoder, OscBundle, OscMessage, OscPacket, OscTime, OscType};

// "/some/addr\0\0" (12 bytes) + ",\0\0\0" (4 bytes)
const GOLDEN_MESSAGE_WO_ARGS: &str = "2f736f6d652f6164647200002c000000";

#[test]
fn golden_bytes_for_message_without_args() {
    let packet = OscPacket::Message(OscMessage {
        addr: "/some/addr".to_string(),
        args: vec![],
    });
    let bytes = encoder::encode(&packet).unwrap();
    assert_eq!(hex::encode(&bytes), GOLDEN_MESSAGE_WO_ARGS);

    let (decoded, rest) = decoder::decode(&hex::decode(GOLDEN_MESSAGE_WO_ARGS).unwrap()).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded, packet);
}

#[test]
fn deeply_nested_bundles_round_trip() {
    let mut innermost = OscBundle::new();
    innermost.add(OscMessage {
        addr: "/osc/1/freq".into(),
        args: vec![OscType::Float(220.0)],
    });

    let mut middle = OscBundle::new();
    middle.timetag = OscTime::from((0x10e1, 0x04d2));
    middle.add(OscPacket::Bundle(innermost));
    middle.add(OscMessage {
        addr: "/mixer/channel/1/amp".into(),
        args: vec![OscType::Float(0.8)],
    });

    let mut root = OscBundle::new();
    root.add(OscMessage {
        addr: "/view/1".into(),
        args: vec![],
    });
    root.add(OscPacket::Bundle(middle));

    let packet = OscPacket::Bundle(root);
    let bytes = encoder::encode(&packet).unwrap();
    let (decoded, rest) = decoder::decode(&bytes).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded, packet);

    // Flattened dispatch order must match the nesting's depth-first order.
    if let OscPacket::Bundle(bundle) = decoded {
        let addrs: Vec<&str> = bundle.messages().iter().map(|m| m.addr.as_str()).collect();
        assert_eq!(
            addrs,
            vec!["/view/1", "/osc/1/freq", "/mixer/channel/1/amp"]
        );
    } else {
        panic!("expected a bundle");
    }
}
