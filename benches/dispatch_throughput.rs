use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use itemrouter::config::ServiceConfig;
use itemrouter::dispatcher::ApiRequest;
use itemrouter::routes::item_routes;
use itemrouter::{App, Item, ResponseValidation, Router};
use serde_json::json;
use std::hint::black_box;

fn seeded_app(responses: ResponseValidation) -> App {
    let mut config = ServiceConfig {
        seed: (0..1000)
            .map(|i| Item::new(i.to_string(), format!("Item {i}")))
            .collect(),
        ..ServiceConfig::default()
    };
    config.validation.responses = responses;
    App::build(&config).expect("build app")
}

fn bench_route_match(c: &mut Criterion) {
    let router = Router::new(item_routes()).expect("routing table");
    let test_paths = [
        (Method::GET, "/items"),
        (Method::GET, "/items/123"),
        (Method::PUT, "/items/123"),
        (Method::DELETE, "/items/abc"),
        (Method::PATCH, "/items/123"),
    ];
    c.bench_function("route_match", |b| {
        b.iter(|| {
            for (method, path) in &test_paths {
                black_box(router.route(method.clone(), path));
            }
        })
    });
}

fn bench_dispatch(c: &mut Criterion) {
    for (label, mode) in [
        ("dispatch_get_item_unchecked", ResponseValidation::Off),
        ("dispatch_get_item_checked", ResponseValidation::Warn),
    ] {
        let app = seeded_app(mode);
        c.bench_function(label, |b| {
            b.iter(|| black_box(app.dispatcher.handle(ApiRequest::new(Method::GET, "/items/500"))))
        });
    }

    let app = seeded_app(ResponseValidation::Off);
    c.bench_function("dispatch_create_rejected", |b| {
        b.iter(|| {
            black_box(
                app.dispatcher
                    .handle(ApiRequest::new(Method::POST, "/items").with_body(json!({"name": 1}))),
            )
        })
    });
}

criterion_group!(benches, bench_route_match, bench_dispatch);
criterion_main!(benches);
