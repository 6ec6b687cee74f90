use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fitcrew::models::workout::{WorkoutDoc, WorkoutType};
use fitcrew::stats::{aggregate, streak};
use std::collections::BTreeSet;

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 29).unwrap() - Days::new(offset)
}

fn record(offset: u64, t: WorkoutType) -> WorkoutDoc {
    WorkoutDoc {
        user_id: "bench".to_string(),
        user_name: "Bench".to_string(),
        user_photo: String::new(),
        workout_type: t,
        date: day(offset),
        image_url: String::new(),
        thumbnail_url: String::new(),
        memo: String::new(),
        likes: 0,
        comments: 0,
        hashtags: vec![],
        group_ids: vec![],
        created_at: chrono::Utc::now(),
    }
}

fn benchmark_streak_recompute(c: &mut Criterion) {
    let today = day(0);

    // Ten years of daily workouts, the worst case for the walk-back.
    let unbroken: BTreeSet<NaiveDate> = (0..3650).map(day).collect();

    // Same span but with every 7th day missing: the walk stops early,
    // the longest-run scan still covers everything.
    let gappy: BTreeSet<NaiveDate> = (0..3650).filter(|o| o % 7 != 6).map(day).collect();

    let mut group = c.benchmark_group("streak_recompute");

    group.bench_function("unbroken_10y", |b| {
        b.iter(|| streak::recompute(black_box(&unbroken), 3650, today, 0))
    });

    group.bench_function("weekly_gaps_10y", |b| {
        b.iter(|| streak::recompute(black_box(&gappy), 3650, today, 0))
    });

    group.bench_function("longest_run_10y", |b| {
        b.iter(|| streak::longest_run(black_box(&gappy)))
    });

    group.finish();
}

fn benchmark_aggregation(c: &mut Criterion) {
    let records: Vec<WorkoutDoc> = (0..3650)
        .map(|o| record(o, WorkoutType::ALL[(o % 13) as usize]))
        .collect();

    let mut group = c.benchmark_group("aggregation");

    group.bench_function("type_distribution_10y", |b| {
        b.iter(|| aggregate::type_distribution(black_box(&records)))
    });

    group.bench_function("weekday_type_series_10y", |b| {
        b.iter(|| aggregate::weekday_type_series(black_box(&records)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_streak_recompute, benchmark_aggregation);
criterion_main!(benches);
