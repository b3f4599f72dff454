use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jsonbind::{bindable, from_json, from_json_value, to_json};

bindable! {
    #[derive(Default, Debug, PartialEq, Clone)]
    struct User {
        id: u32,
        name: String,
        email: String,
        active: bool,
    }
}

bindable! {
    #[derive(Default, Debug, PartialEq, Clone)]
    struct Product {
        sku: String,
        name: String,
        price: f64,
        quantity: u32,
    }
}

fn benchmark_write_simple(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    c.bench_function("write_simple_struct", |b| {
        b.iter(|| to_json(black_box(&user)))
    });
}

fn benchmark_read_simple(c: &mut Criterion) {
    let text = r#"{"id":123,"name":"Alice","email":"alice@example.com","active":true}"#;

    c.bench_function("read_simple_struct", |b| {
        b.iter(|| from_json::<User>(black_box(text)))
    });
}

fn benchmark_write_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_array");

    for size in [10u32, 100, 500].iter() {
        let products: Vec<Product> = (0..*size)
            .map(|i| Product {
                sku: format!("SKU-{i:05}"),
                name: format!("Product {i}"),
                price: i as f64 + 0.99,
                quantity: i,
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &products, |b, products| {
            b.iter(|| to_json(black_box(products)));
        });
    }

    group.finish();
}

fn benchmark_read_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_array");

    for size in [10u32, 100, 500].iter() {
        let products: Vec<Product> = (0..*size)
            .map(|i| Product {
                sku: format!("SKU-{i:05}"),
                name: format!("Product {i}"),
                price: i as f64 + 0.99,
                quantity: i,
            })
            .collect();
        let text = to_json(&products).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_json::<Vec<Product>>(black_box(text)));
        });
    }

    group.finish();
}

fn benchmark_read_dynamic(c: &mut Criterion) {
    let products: Vec<Product> = (0..100u32)
        .map(|i| Product {
            sku: format!("SKU-{i:05}"),
            name: format!("Product {i}"),
            price: i as f64 + 0.99,
            quantity: i,
        })
        .collect();
    let text = to_json(&products).unwrap();

    c.bench_function("read_dynamic_value", |b| {
        b.iter(|| from_json_value(black_box(&text)))
    });
}

criterion_group!(
    benches,
    benchmark_write_simple,
    benchmark_read_simple,
    benchmark_write_array,
    benchmark_read_array,
    benchmark_read_dynamic
);
criterion_main!(benches);
