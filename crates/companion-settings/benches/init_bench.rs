//! Criterion benchmarks for [`AppSettings::init`].
//!
//! `init` reads every profile, joystick and global option, so its cost grows
//! with the number of stored keys.  Measured on an in-memory store so the
//! numbers reflect the property layer rather than the file system.
//!
//! Run with:
//! ```bash
//! cargo bench --package companion-settings --bench init_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use companion_settings::{
    AppSettings, MemoryBackend, MemoryStoreLocator, SettingValue, SettingsStore, MAX_PROFILES,
};

// ── Store fixture builders ────────────────────────────────────────────────────

/// Store with `configured` named profiles, each with a handful of non-default fields.
fn store_with_profiles(configured: usize) -> MemoryBackend {
    let mut entries = vec![(
        "settings_version".to_string(),
        SettingValue::String("220".to_string()),
    )];
    for i in 0..configured {
        let path = format!("Profiles/profile{i}/");
        entries.push((format!("{path}Name"), SettingValue::String(format!("radio-{i}"))));
        entries.push((format!("{path}fwType"), SettingValue::String("opentx-x9d+".into())));
        entries.push((format!("{path}volumeGain"), SettingValue::Int(12)));
        entries.push((format!("{path}StickPotCalib"), SettingValue::String("0A1B2C".into())));
    }
    MemoryBackend::from_entries(entries)
}

fn bench_init(c: &mut Criterion) {
    let mut group = c.benchmark_group("app_settings_init");
    for configured in [0, 5, MAX_PROFILES] {
        let backend = store_with_profiles(configured);
        group.bench_with_input(
            BenchmarkId::from_parameter(configured),
            &backend,
            |b, backend| {
                b.iter(|| {
                    let store = SettingsStore::new(backend.clone());
                    let mut settings = AppSettings::new(store, MemoryStoreLocator::new());
                    settings.init().expect("init on a memory store must succeed");
                    black_box(settings.active_profiles().expect("memory store is infallible"))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_init);
criterion_main!(benches);
