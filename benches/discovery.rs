//! Benchmarks for subtree discovery and full conversion
//!
//! Run with: cargo bench --bench discovery

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use vnfd_convert::converters::{Converter, ConverterConfig, Sol6Converter};
use vnfd_convert::documents::{from_yaml_str, Tree};
use vnfd_convert::keys::SchemaKeys;
use vnfd_convert::paths::find_by;

/// A descriptor with `vdus` compute nodes and two virtual links
fn descriptor(vdus: usize) -> Tree {
    let mut text = String::from(
        "topology_template:\n  node_templates:\n    mgmt: {type: tosca.nodes.nfv.VnfVirtualLink}\n    orch: {type: tosca.nodes.nfv.VnfVirtualLink}\n",
    );
    for i in 0..vdus {
        text.push_str(&format!(
            "    vdu{i}:\n      type: tosca.nodes.nfv.Vdu.Compute\n      properties: {{vdu_profile: {{min_number_of_instances: 1, max_number_of_instances: 2}}}}\n      capabilities: {{virtual_compute: {{properties: {{requested_additional_capabilities: {{properties: {{requested_additional_capability_name: flavor{f}}}}}, virtual_memory: {{virtual_mem_size: 4 GB}}}}}}}}\n",
            f = i % 4
        ));
    }
    from_yaml_str(&text).expect("valid benchmark descriptor")
}

fn bench_discovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery/find_by");

    for vdus in [10, 100, 1000] {
        let doc = descriptor(vdus);
        group.throughput(Throughput::Elements(vdus as u64));
        group.bench_with_input(BenchmarkId::from_parameter(vdus), &doc, |b, doc| {
            b.iter(|| black_box(find_by(doc, "type", "tosca.nodes.nfv.Vdu.Compute")))
        });
    }

    group.finish();
}

fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery/to_sol6");
    let keys = SchemaKeys::default();

    for vdus in [10, 100] {
        let doc = descriptor(vdus);
        group.throughput(Throughput::Elements(vdus as u64));
        group.bench_with_input(BenchmarkId::from_parameter(vdus), &doc, |b, doc| {
            b.iter(|| {
                let skeleton = keys.sol6.skeleton().expect("skeleton");
                let out = Sol6Converter::new(doc, skeleton, &keys, ConverterConfig::new())
                    .convert()
                    .expect("conversion");
                black_box(out)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_discovery, bench_conversion);
criterion_main!(benches);
