//! Guard activation overhead benchmarks

use async_trait::async_trait;
use clinigate_guard::{AuthGuard, MemoryDemoFlag, Navigator, Session, SessionError, SessionSource};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

struct AlwaysSignedIn;

#[async_trait]
impl SessionSource for AlwaysSignedIn {
    async fn current_session(&self) -> Result<Option<Session>, SessionError> {
        Ok(Some(Session::new("bench")))
    }
}

struct Discard;

impl Navigator for Discard {
    fn redirect_to(&self, _path: &str) {}
}

fn bench_activation(c: &mut Criterion) {
    let mut group = c.benchmark_group("guard_activation");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let demo = AuthGuard::builder()
        .demo_flag(MemoryDemoFlag::with_value(true))
        .navigator(Discard)
        .build();
    group.bench_function("demo_mode", |b| {
        b.iter(|| black_box(demo.activate().decision()))
    });

    let remote = AuthGuard::builder()
        .session_source(AlwaysSignedIn)
        .navigator(Discard)
        .build();
    group.bench_function("remote_session", |b| {
        b.iter(|| runtime.block_on(async { black_box(remote.activate().resolve().await) }))
    });

    group.finish();
}

criterion_group!(benches, bench_activation);
criterion_main!(benches);
