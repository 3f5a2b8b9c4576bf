//! 规划与查询性能基准测试
//!
//! `SCurveProfile::new` 在后台任务中调用，`calc_*` 在周期性 tick 中调用，
//! 两者都需要在微秒量级内完成。

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use motion_profile::{PlannerConfig, SCurveProfile, VelocityProfile};

fn config() -> PlannerConfig {
    PlannerConfig::new(360.0, 180.0, 360.0)
}

fn bench_plan_with_cruise(c: &mut Criterion) {
    c.bench_function("plan_with_cruise", |b| {
        b.iter(|| {
            SCurveProfile::new(
                black_box(config()),
                black_box(0.0),
                black_box(0.0),
                black_box(0.0),
                black_box(1000.0),
            )
        })
    });
}

fn bench_plan_binary_search(c: &mut Criterion) {
    c.bench_function("plan_binary_search", |b| {
        b.iter(|| {
            SCurveProfile::new(
                black_box(config()),
                black_box(0.0),
                black_box(0.0),
                black_box(0.0),
                black_box(90.0),
            )
        })
    });
}

fn bench_plan_retarget_with_braking(c: &mut Criterion) {
    c.bench_function("plan_retarget_with_braking", |b| {
        b.iter(|| {
            SCurveProfile::new(
                black_box(config()),
                black_box(40.0),
                black_box(120.0),
                black_box(-90.0),
                black_box(300.0),
            )
        })
    });
}

fn bench_query(c: &mut Criterion) {
    let profile = match SCurveProfile::new(config(), 0.0, 0.0, 0.0, 1000.0) {
        Ok(profile) => profile,
        Err(e) => panic!("benchmark profile must be feasible: {e}"),
    };
    let total = profile.total_time();

    c.bench_function("profile_query_xva", |b| {
        let mut t = 0.0;
        b.iter(|| {
            t += 0.001;
            if t > total {
                t = 0.0;
            }
            let x = profile.calc_x(black_box(t));
            let v = profile.calc_v(black_box(t));
            let a = profile.calc_a(black_box(t));
            black_box((x, v, a))
        })
    });
}

criterion_group!(
    benches,
    bench_plan_with_cruise,
    bench_plan_binary_search,
    bench_plan_retarget_with_braking,
    bench_query
);
criterion_main!(benches);
