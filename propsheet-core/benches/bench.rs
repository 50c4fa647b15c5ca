use criterion::{Criterion, black_box, criterion_group, criterion_main};
use propsheet_core::{compile, entry, materialize, parse, rewrite_pattern};

const SHEET: &str = r#"
manufacturer = "acme", hwVersion = "rev-b" { timeout: 30, verbose: true }
swVersion ~ /fw-(?v >= 1.2 < 2)(-rc[0-9]+)?/ { retries: 3 }
swVersion ~ /^(release|beta)-(?v = 2.0.1)$/, model ~ /[[:upper:]]{2}-\d{3,}/ { mode: "safe" }
{ a: -1, b: "test", { c: false } }
"#;

fn bench_parse_plain(c: &mut Criterion) {
    let pattern = r"^(a+)\1*,\1+$";

    c.bench_function("parse_plain", |b| {
        b.iter(|| black_box(parse(black_box(pattern))))
    });
}

fn bench_parse_classes(c: &mut Criterion) {
    let pattern = r"(?=.*[[:lower:]])(?=.*[[:upper:]])(?=.*[[:punct:]])[^a-z0-9-]{6,}";

    c.bench_function("parse_classes", |b| {
        b.iter(|| black_box(parse(black_box(pattern))))
    });
}

fn bench_rewrite_versions(c: &mut Criterion) {
    let pattern = r"abc ()(?:())(?v >= 1)-(?v > 1.2 <= 3.4.5)";

    c.bench_function("rewrite_versions", |b| {
        b.iter(|| black_box(rewrite_pattern(black_box(pattern))))
    });
}

fn bench_parse_entries(c: &mut Criterion) {
    c.bench_function("parse_entries", |b| {
        b.iter(|| black_box(entry::parse(black_box(SHEET))))
    });
}

fn bench_materialize(c: &mut Criterion) {
    let entries = entry::parse(SHEET).unwrap();

    c.bench_function("materialize", |b| {
        b.iter(|| black_box(materialize(black_box(&entries))))
    });
}

fn bench_compile_to_json(c: &mut Criterion) {
    c.bench_function("compile_to_json", |b| {
        b.iter(|| {
            let doc = compile(black_box(SHEET)).unwrap();
            black_box(serde_json::to_string(&doc))
        })
    });
}

criterion_group!(
    benches,
    bench_parse_plain,
    bench_parse_classes,
    bench_rewrite_versions,
    bench_parse_entries,
    bench_materialize,
    bench_compile_to_json,
);

criterion_main!(benches);
