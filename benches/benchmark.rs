use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fol_parser::analyzer::parsers::parse_formula;
use fol_parser::analyzer::{Cursor, Parser};
use fol_parser::FormulaParser;

const RELATION: &str = "R(  x,y,  z ,false ,w)";
const QUANTIFIED: &str = "forall x, y,   z. exist w. R(x, w, z)";
const NESTED: &str = "((a and b) or (c => d)) <=> (forall x. ((P(x)) and (q or r)))";

fn bench_grammar(c: &mut Criterion) {
    let parser = parse_formula();
    c.bench_function("relation application", |b| {
        b.iter(|| parser.parse(Cursor::new(black_box(RELATION))))
    });
    c.bench_function("quantified formula", |b| {
        b.iter(|| parser.parse(Cursor::new(black_box(QUANTIFIED))))
    });
}

fn bench_document(c: &mut Criterion) {
    let parser = FormulaParser::default();
    c.bench_function("nested document", |b| {
        b.iter(|| parser.parse(black_box(NESTED)))
    });
}

// ベンチマークグループの定義
criterion_group!(benches, bench_grammar, bench_document);
criterion_main!(benches);
