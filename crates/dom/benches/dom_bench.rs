use criterion::{black_box, criterion_group, criterion_main, Criterion};
use html_dom::{parse, parse_fragment, Namespace, TagCode};

fn sample_page(rows: usize) -> String {
    let mut html = String::from("<!DOCTYPE html><html><head><title>bench</title></head><body><table>");
    for i in 0..rows {
        html.push_str(&format!(
            "<tr class=\"row r{i}\"><td id=\"c{i}\">cell &amp; {i}</td><td><a href=\"/x/{i}\">link</a><br></td></tr>"
        ));
    }
    html.push_str("</table><script>if (a < b) { go(); }</script></body></html>");
    html
}

fn bench_parse(c: &mut Criterion) {
    let page = sample_page(500);
    c.bench_function("parse_document_500_rows", |b| {
        b.iter(|| parse(black_box(&page)).unwrap())
    });

    let deep = "<div>".repeat(5_000);
    c.bench_function("parse_fragment_deep_5000", |b| {
        b.iter(|| parse_fragment(black_box(&deep), TagCode::Div, Namespace::Html).unwrap())
    });
}

fn bench_query(c: &mut Criterion) {
    let tree = parse(&sample_page(500)).unwrap();
    c.bench_function("nodes_by_tag_code", |b| {
        b.iter(|| tree.nodes_by_tag_code(black_box(TagCode::Td)).len())
    });
    c.bench_function("nodes_by_attribute_value_ci", |b| {
        b.iter(|| tree.nodes_by_attribute_value(black_box("ROW R42"), true).len())
    });
}

fn bench_serialize(c: &mut Criterion) {
    let tree = parse(&sample_page(500)).unwrap();
    c.bench_function("serialize_document_500_rows", |b| {
        b.iter(|| black_box(tree.serialize()))
    });
}

criterion_group!(benches, bench_parse, bench_query, bench_serialize);
criterion_main!(benches);
