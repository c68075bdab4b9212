use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;
use trafstat::capture::CaptureReader;
use trafstat::{bucket, filter, metrics};

fn synthetic_capture(packets: u32) -> Vec<u8> {
    let mut bytes = 0xa1b2_c3d4u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    for word in [0u32, 0, 65_535, 1] {
        bytes.extend_from_slice(&word.to_le_bytes());
    }

    for i in 0..packets {
        let mut frame = vec![0u8; 12];
        frame.extend_from_slice(&[0x08, 0x00]);
        frame.extend_from_slice(&[0x45, 0, 0, 20, 0, 0, 0, 0, 64, 17, 0, 0]);
        frame.extend_from_slice(&[10, 0, (i % 16) as u8, (i % 250) as u8]);
        frame.extend_from_slice(&[10, 1, 0, (i % 7) as u8]);

        for word in [i / 1000, (i % 1000) * 1000, frame.len() as u32, 60 + i % 1400] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes.extend_from_slice(&frame);
    }
    bytes
}

fn bench_pipeline(c: &mut Criterion) {
    let capture = synthetic_capture(50_000);

    c.bench_function("decode 50k records", |b| {
        b.iter(|| {
            let reader = CaptureReader::new(Cursor::new(black_box(&capture))).unwrap();
            reader.read_all().unwrap()
        })
    });

    let records = CaptureReader::new(Cursor::new(&capture))
        .unwrap()
        .read_all()
        .unwrap();
    let sequence = filter::filter(records);

    c.bench_function("summarize 50k events", |b| {
        b.iter(|| metrics::summarize(black_box(&sequence)).unwrap())
    });

    c.bench_function("bucket 50k events", |b| {
        b.iter(|| bucket::bucket(black_box(&sequence)).unwrap())
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
