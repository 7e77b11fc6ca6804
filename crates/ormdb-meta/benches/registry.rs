//! Metadata registry benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ormdb_meta::parser::build_metadata;
use ormdb_meta::{
    Entity, FieldDescriptor, MetadataRegistry, RecordType, RegistryConfig, ScalarType, TypeKind,
};

struct Produto;

impl Entity for Produto {
    const NAME: &'static str = "Produto";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("ID", TypeKind::scalar(ScalarType::Int64))
                .tag("pk;autoincrement"),
            FieldDescriptor::new("Nome", TypeKind::scalar(ScalarType::String))
                .tag("size:120;notnull;index"),
            FieldDescriptor::new("Sku", TypeKind::scalar(ScalarType::String)).tag("uniqueindex"),
            FieldDescriptor::new("Preco", TypeKind::scalar(ScalarType::Decimal))
                .tag("type:numeric;precision:10;scale:2"),
            FieldDescriptor::new(
                "Descricao",
                TypeKind::nullable(TypeKind::scalar(ScalarType::String)),
            ),
            FieldDescriptor::new("CriadoEm", TypeKind::scalar(ScalarType::Timestamp))
                .tag("createdat"),
            FieldDescriptor::new("AtualizadoEm", TypeKind::scalar(ScalarType::Timestamp))
                .tag("updatedat"),
            FieldDescriptor::new(
                "RemovidoEm",
                TypeKind::nullable(TypeKind::scalar(ScalarType::Timestamp)),
            )
            .tag("deletedat"),
        ]
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/build");
    let config = RegistryConfig::default();

    group.bench_function("cold_build", |b| {
        b.iter(|| {
            black_box(build_metadata(RecordType::of::<Produto>(), &config).unwrap());
        });
    });

    group.bench_function("parse_after_clear", |b| {
        let registry = MetadataRegistry::new();
        b.iter(|| {
            registry.clear();
            black_box(registry.parse::<Produto>().unwrap());
        });
    });

    group.finish();
}

fn bench_cached(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/cached");

    group.bench_function("hit", |b| {
        let registry = MetadataRegistry::new();
        registry.parse::<Produto>().unwrap();
        b.iter(|| {
            black_box(registry.parse::<Produto>().unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_cached);
criterion_main!(benches);
