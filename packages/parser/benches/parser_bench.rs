use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scrawl_parser::parse;

fn parse_short_note(c: &mut Criterion) {
    let source = "Meeting notes\n\nSketch of the layout: ?[[drawings/layout.png]]\nSee also [[Roadmap]].";

    c.bench_function("parse_short_note", |b| b.iter(|| parse(black_box(source))));
}

fn parse_long_note(c: &mut Criterion) {
    let mut source = String::new();
    for i in 0..500 {
        source.push_str(&format!(
            "Paragraph {i} links to [[note-{i}]] and embeds ?[[drawings/{i}.png]] inline.\n"
        ));
    }

    c.bench_function("parse_long_note", |b| b.iter(|| parse(black_box(&source))));
}

criterion_group!(benches, parse_short_note, parse_long_note);
criterion_main!(benches);
