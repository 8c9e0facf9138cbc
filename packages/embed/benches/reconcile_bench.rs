use criterion::{black_box, criterion_group, criterion_main, Criterion};
use futures::executor::LocalPool;
use scrawl_common::MemoryStore;
use scrawl_editor::{EditorState, TransactionSpec};
use scrawl_embed::{DrawingPlugin, EmbedConfig, Host, LogNotifier};
use std::rc::Rc;

fn note(embeds: usize) -> String {
    (0..embeds)
        .map(|i| format!("Paragraph {} with some prose.\n?[[drawings/{}.png]]\n", i, i % 8))
        .collect()
}

fn bench_reconcile(c: &mut Criterion) {
    let mut pool = LocalPool::new();
    let host = Host::new(
        Rc::new(MemoryStore::new()),
        Rc::new(LogNotifier),
        Rc::new(pool.spawner()),
    );
    let plugin = DrawingPlugin::new(host, EmbedConfig::default());

    c.bench_function("open_note_64_embeds", |b| {
        let text = note(64);
        b.iter(|| {
            let session = plugin.open(EditorState::new(black_box(text.as_str())));
            pool.run_until_stalled();
            session.drawings().len()
        })
    });

    c.bench_function("type_into_note_64_embeds", |b| {
        let mut session = plugin.open(EditorState::new(note(64)));
        pool.run_until_stalled();
        b.iter(|| {
            session.dispatch(TransactionSpec::insert(0, "x")).unwrap();
        })
    });
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
