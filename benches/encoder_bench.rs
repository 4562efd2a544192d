#![feature(test)]
extern crate oscore;
extern crate test;

use self::test::Bencher;
use oscore::*;

#[bench]
fn bench_encode_args_blob(b: &mut Bencher) {
    // Encoded message contains 1000 arguments, each of which is a Blob containing 0-20 bytes.
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Blobs".into(),
        args: (0..1000)
            .map(|x| OscType::Blob((0..(x % 20) as u8).collect()))
            .collect(),
    });

    b.iter(|| encoder::encode(&packet).unwrap());
}

#[bench]
fn bench_encode_args_bool(b: &mut Bencher) {
    // Encoded message contains 1000 arguments, each of which is a Bool. Half are false and half
    // are true.
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Bools".into(),
        args: (0..1000).map(|x| OscType::Bool((x % 2) == 1)).collect(),
    });

    b.iter(|| encoder::encode(&packet).unwrap());
}

#[bench]
fn bench_encode_args_float(b: &mut Bencher) {
    // Encoded message contains 1000 arguments, each of which is a Float.
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Floats".into(),
        args: (0..1000).map(|x| OscType::Float(x as f32)).collect(),
    });

    b.iter(|| encoder::encode(&packet).unwrap());
}

#[bench]
fn bench_encode_args_int(b: &mut Bencher) {
    // Encoded message contains 1000 arguments, each of which is an Int.
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Ints".into(),
        args: (0..1000).map(OscType::Int).collect(),
    });

    b.iter(|| encoder::encode(&packet).unwrap());
}

#[bench]
fn bench_encode_args_nil(b: &mut Bencher) {
    // Encoded message contains 1000 arguments, each of which is Nil.
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Nils".into(),
        args: (0..1000).map(|_| OscType::Nil).collect(),
    });

    b.iter(|| encoder::encode(&packet).unwrap());
}

#[bench]
fn bench_encode_args_string(b: &mut Bencher) {
    // Encoded message contains 1000 arguments, each of which is a String containing the string
    // representation of its argument index.
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Strings".into(),
        args: (0..1000).map(|x| OscType::String(x.to_string())).collect(),
    });

    b.iter(|| encoder::encode(&packet).unwrap());
}

#[bench]
fn bench_encode_bundles(b: &mut Bencher) {
    // Encoded bundle contains 1000 sub-bundles, each of which are empty.
    let packet = OscPacket::Bundle(OscBundle {
        timetag: (0, 0).into(),
        content: vec![
            OscPacket::Bundle(OscBundle {
                timetag: (0, 0).into(),
                content: vec![],
            });
            1000
        ],
    });

    b.iter(|| encoder::encode(&packet).unwrap());
}

#[bench]
fn bench_encode_bundles_into_reused_vec(b: &mut Bencher) {
    // Encoded bundle contains 1000 sub-bundles, each of which are empty.
    // The packet is encoded into the same Vec each time, resulting in no allocation after the
    // first.
    let packet = OscPacket::Bundle(OscBundle {
        timetag: (0, 0).into(),
        content: vec![
            OscPacket::Bundle(OscBundle {
                timetag: (0, 0).into(),
                content: vec![],
            });
            1000
        ],
    });

    let mut buffer = Vec::new();
    b.iter(|| {
        buffer.clear();
        encoder::encode_into(&packet, &mut buffer).unwrap()
    });
}

#[bench]
fn bench_encode_huge_bundle(b: &mut Bencher) {
    // Encoded bundle contains 1000 messages, each of which contains an argument of every
    // supported type (including a 1 KB blob).
    let packet = OscPacket::Bundle(OscBundle {
        timetag: (0, 0).into(),
        content: vec![
            OscPacket::Message(OscMessage {
                addr: "/OSC/Message".into(),
                args: vec![
                    4i32.into(),
                    3.1415926f32.into(),
                    "String".into(),
                    (0..1024).map(|x| x as u8).collect::<Vec<u8>>().into(),
                    (123, 456).into(),
                    false.into(),
                    true.into(),
                    OscType::Nil,
                    OscType::Inf,
                ],
            });
            1000
        ],
    });

    b.iter(|| encoder::encode(&packet).unwrap());
}

#[bench]
fn bench_encode_messages(b: &mut Bencher) {
    // Encoded bundle contains 1000 messages, each of which has no arguments.
    let packet = OscPacket::Bundle(OscBundle {
        timetag: (0, 0).into(),
        content: vec![
            OscPacket::Message(OscMessage {
                addr: "/OSC/Message".into(),
                args: vec![],
            });
            1000
        ],
    });

    b.iter(|| encoder::encode(&packet).unwrap());
}

#[bench]
fn bench_encode_messages_into_reused_vec(b: &mut Bencher) {
    // Encoded bundle contains 1000 messages, each of which has no arguments.
    // The packet is encoded into the same Vec each time, resulting in no allocation after the
    // first.
    let packet = OscPacket::Bundle(OscBundle {
        timetag: (0, 0).into(),
        content: vec![
            OscPacket::Message(OscMessage {
                addr: "/OSC/Message".into(),
                args: vec![],
            });
            1000
        ],
    });

    let mut buffer = Vec::new();
    b.iter(|| {
        buffer.clear();
        encoder::encode_into(&packet, &mut buffer).unwrap()
    });
}

#[bench]
fn bench_encode_nested_bundles(b: &mut Bencher) {
    // 20 levels of nested bundles, wrapping a single leaf message.
    let mut packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Nested".into(),
        args: vec![],
    });

    for _ in 0..20 {
        packet = OscPacket::Bundle(OscBundle {
            timetag: (0, 0).into(),
            content: vec![packet],
        });
    }

    b.iter(|| encoder::encode(&packet).unwrap());
}
