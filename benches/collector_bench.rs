//! Collector 벤치마크
//!
//! XML 디코딩 및 메트릭 변환 성능 측정

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use monit_exporter::collector::parse_status;
use monit_exporter::transformer::{transform, PrometheusFormatter};
use std::hint::black_box;

const SYSTEM_STATUS: &str = include_str!("../tests/fixtures/system_status.xml");
const HOST_STATUS: &str = include_str!("../tests/fixtures/host_status.xml");

/// Status document with `count` process services, each carrying a port check
fn large_status(count: usize) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><monit>"#);
    for i in 0..count {
        xml.push_str(&format!(
            r#"<service type="3"><name>worker-{i}</name><status>0</status><monitor>1</monitor>
<memory><percent>0.5</percent><percenttotal>0.5</percenttotal><kilobyte>{kb}</kilobyte><kilobytetotal>{kb}</kilobytetotal></memory>
<cpu><percent>1.5</percent><percenttotal>1.5</percenttotal></cpu>
<read><bytes><count>10</count><total>1000</total></bytes></read>
<write><bytes><count>20</count><total>2000</total></bytes></write>
<port><hostname>localhost</hostname><portnumber>{port}</portnumber><protocol>HTTP</protocol><type>TCP</type><responsetime>0.002</responsetime></port>
</service>"#,
            kb = 1024 + i,
            port = 8000 + i
        ));
    }
    xml.push_str("</monit>");
    xml
}

fn benchmark_parse_status(c: &mut Criterion) {
    let large = large_status(200);
    let inputs = [
        ("system", SYSTEM_STATUS.to_string()),
        ("host", HOST_STATUS.to_string()),
        ("processes_200", large),
    ];

    let mut group = c.benchmark_group("parse_status");

    for (name, xml) in &inputs {
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode", name), xml, |b, xml| {
            b.iter(|| parse_status(black_box(xml.as_bytes())))
        });
    }

    group.finish();
}

fn benchmark_transform(c: &mut Criterion) {
    let document = parse_status(large_status(200).as_bytes()).expect("benchmark document");
    let formatter = PrometheusFormatter::new();

    let mut group = c.benchmark_group("transform");

    group.bench_function("map_processes_200", |b| {
        b.iter(|| transform(black_box(&document)))
    });

    let metrics = transform(&document);
    group.bench_function("format_processes_200", |b| {
        b.iter(|| formatter.format(black_box(&metrics)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_parse_status, benchmark_transform);
criterion_main!(benches);
