#![feature(test)]
extern crate oscore;
extern crate test;

use self::test::Bencher;

#[bench]
fn bench_decode(b: &mut Bencher) {
    // OscBundle { timetag: (0, 1), content: [Message(OscMessage { addr:
    // "/OSCILLATORS/OSC2/ADSR/x", args: [Float(0.1234567); 4] })] }
    let raw_msg: [u8; 72] = [
        35, 98, 117, 110, 100, 108, 101, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 52, 47, 79, 83, 67,
        73, 76, 76, 65, 84, 79, 82, 83, 47, 79, 83, 67, 50, 47, 65, 68, 83, 82, 47, 122, 0, 0, 0,
        0, 44, 102, 102, 102, 102, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    b.iter(|| oscore::decoder::decode(&raw_msg).unwrap());
}
