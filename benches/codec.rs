use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nson::{decode_map, from_slice, to_map, to_vec, Id, Map, Timestamp, Value};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: Id,
    name: String,
    email: String,
    age: u8,
    active: bool,
    created: Timestamp,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Clone)]
struct Catalog {
    products: Vec<Product>,
}

fn sample_user() -> User {
    User {
        id: Id::new(),
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        age: 30,
        active: true,
        created: Timestamp::from_millis(1_700_000_000_000),
    }
}

fn catalog(size: u32) -> Catalog {
    Catalog {
        products: (0..size)
            .map(|i| Product {
                sku: format!("SKU{}", i),
                price: 9.99 + f64::from(i),
                quantity: i,
            })
            .collect(),
    }
}

fn benchmark_marshal_simple(c: &mut Criterion) {
    let user = sample_user();
    c.bench_function("marshal_simple_struct", |b| b.iter(|| to_map(black_box(&user))));
}

fn benchmark_unmarshal_simple(c: &mut Criterion) {
    let bytes = to_vec(&sample_user()).unwrap();
    c.bench_function("unmarshal_simple_struct", |b| {
        b.iter(|| from_slice::<User>(black_box(&bytes)))
    });
}

fn benchmark_encode_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_catalog");

    for size in [10, 100, 1000].iter() {
        let map = to_map(&catalog(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            b.iter(|| black_box(map).to_bytes())
        });
    }
    group.finish();
}

fn benchmark_decode_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_catalog");

    for size in [10, 100, 1000].iter() {
        let bytes = to_vec(&catalog(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| decode_map(black_box(bytes)))
        });
    }
    group.finish();
}

fn benchmark_wide_document(c: &mut Criterion) {
    let mut map = Map::new();
    for i in 0..256u32 {
        map.insert(format!("field{}", i), Value::U32(i));
    }
    let bytes = map.to_bytes().unwrap();

    let mut group = c.benchmark_group("wide_document");
    group.bench_function("encode", |b| b.iter(|| black_box(&map).to_bytes()));
    group.bench_function("decode", |b| b.iter(|| decode_map(black_box(&bytes))));
    group.finish();
}

fn benchmark_id_generation(c: &mut Criterion) {
    c.bench_function("id_new", |b| b.iter(Id::new));
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let data = catalog(100);
    let mut group = c.benchmark_group("comparison");

    group.bench_function("nson_serialize", |b| b.iter(|| to_vec(black_box(&data))));
    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_vec(black_box(&data)))
    });

    let nson_bytes = to_vec(&data).unwrap();
    let json_bytes = serde_json::to_vec(&data).unwrap();

    group.bench_function("nson_deserialize", |b| {
        b.iter(|| from_slice::<Catalog>(black_box(&nson_bytes)))
    });
    group.bench_function("json_deserialize", |b| {
        b.iter(|| serde_json::from_slice::<Catalog>(black_box(&json_bytes)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_marshal_simple,
    benchmark_unmarshal_simple,
    benchmark_encode_catalog,
    benchmark_decode_catalog,
    benchmark_wide_document,
    benchmark_id_generation,
    benchmark_comparison_with_json
);
criterion_main!(benches);
