//! Performance benchmarks for decoding, merging and fingerprinting

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use netfacts::collector::{merge, RawSubtrees};
use netfacts::snmp::decoder::decode;
use netfacts::snmp::oids::{IF_TABLE, IF_X_TABLE};
use netfacts::InterfaceSetFingerprint;

/// Synthetic ifTable walk of a chassis with `ports` interfaces
fn if_table(ports: u32) -> String {
    let mut raw = String::new();
    for i in 1..=ports {
        raw.push_str(&format!(".1.3.6.1.2.1.2.2.1.2.{} = STRING: \"GigabitEthernet1/0/{}\"\n", i, i));
    }
    for i in 1..=ports {
        raw.push_str(&format!(".1.3.6.1.2.1.2.2.1.5.{} = Gauge32: 1000000000\n", i));
    }
    for i in 1..=ports {
        raw.push_str(&format!(
            ".1.3.6.1.2.1.2.2.1.6.{} = Hex-STRING: B0 7D 47 F5 {:02X} {:02X}\n",
            i,
            i / 256,
            i % 256
        ));
    }
    for column in [7, 8] {
        for i in 1..=ports {
            raw.push_str(&format!(".1.3.6.1.2.1.2.2.1.{}.{} = INTEGER: up(1)\n", column, i));
        }
    }
    raw
}

fn if_x_table(ports: u32) -> String {
    let mut raw = String::new();
    for i in 1..=ports {
        raw.push_str(&format!(".1.3.6.1.2.1.31.1.1.1.1.{} = STRING: \"Gi1/0/{}\"\n", i, i));
    }
    for i in 1..=ports {
        raw.push_str(&format!(".1.3.6.1.2.1.31.1.1.1.6.{} = Counter64: {}\n", i, u64::from(i) * 1_000_003));
    }
    for i in 1..=ports {
        raw.push_str(&format!(".1.3.6.1.2.1.31.1.1.1.15.{} = Gauge32: 1000\n", i));
    }
    for i in 1..=ports {
        raw.push_str(&format!(".1.3.6.1.2.1.31.1.1.1.18.{} = STRING: \"desk {}\"\n", i, i));
    }
    raw
}

fn ip_tables(ports: u32) -> (String, String) {
    let mut index = String::new();
    let mut mask = String::new();
    for i in 1..=ports {
        let ip = format!("10.{}.{}.1", i / 256, i % 256);
        index.push_str(&format!(".1.3.6.1.2.1.4.20.1.2.{} = INTEGER: {}\n", ip, i));
        mask.push_str(&format!(".1.3.6.1.2.1.4.20.1.3.{} = IpAddress: 255.255.255.0\n", ip));
    }
    (index, mask)
}

fn subtrees(ports: u32) -> RawSubtrees {
    let (ip_index, ip_mask) = ip_tables(ports);
    RawSubtrees {
        if_table: Some(if_table(ports)),
        if_x_table: Some(if_x_table(ports)),
        ip_index: Some(ip_index),
        ip_mask: Some(ip_mask),
        if_phys_address: None,
    }
}

/// Benchmark table decoding
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for ports in [48u32, 512, 4096] {
        let if_raw = if_table(ports);
        let if_x_raw = if_x_table(ports);

        group.bench_with_input(BenchmarkId::new("if_table", ports), &if_raw, |b, raw| {
            b.iter(|| black_box(decode(black_box(raw), &IF_TABLE)))
        });
        group.bench_with_input(BenchmarkId::new("if_x_table", ports), &if_x_raw, |b, raw| {
            b.iter(|| black_box(decode(black_box(raw), &IF_X_TABLE)))
        });
    }

    group.finish();
}

/// Benchmark subtree merging
fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for ports in [48u32, 512, 4096] {
        let raw = subtrees(ports);
        group.bench_with_input(BenchmarkId::from_parameter(ports), &raw, |b, raw| {
            b.iter(|| black_box(merge(black_box(raw))))
        });
    }

    group.finish();
}

/// Benchmark interface-set fingerprinting
fn bench_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint");

    for ports in [48u32, 512, 4096] {
        let (records, _) = merge(&subtrees(ports));
        group.bench_with_input(BenchmarkId::from_parameter(ports), &records, |b, records| {
            b.iter(|| black_box(InterfaceSetFingerprint::compute(black_box(records))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_merge, bench_fingerprint);
criterion_main!(benches);
