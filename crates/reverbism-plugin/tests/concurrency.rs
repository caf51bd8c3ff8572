//! Cross-thread parameter access.
//!
//! A control thread restores whole parameter sets while an audio-side
//! reader snapshots them. The reader must only ever see complete batches.

use reverbism_plugin::{
    AudioBuffer, ParamKey, ParamLayout, ParamSnapshot, ParamStore, ReverbPlugin,
};
use std::sync::atomic::{AtomicBool, Ordering};

const ROUNDS: usize = 20_000;

fn extremes(store: &ParamStore) -> (Vec<f32>, Vec<f32>) {
    let min: Vec<f32> = store.descriptors().iter().map(|d| d.min).collect();
    let max: Vec<f32> = store.descriptors().iter().map(|d| d.max).collect();
    (min, max)
}

#[test]
fn reader_never_sees_a_torn_restore() {
    for layout in [ParamLayout::Percentage, ParamLayout::Independent] {
        let store = ParamStore::for_layout(layout).unwrap();
        let (min, max) = extremes(&store);
        store.restore(&min);
        let done = AtomicBool::new(false);

        std::thread::scope(|scope| {
            let writer = store.clone();
            let (lo, hi) = (&min, &max);
            let done = &done;
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    writer.restore(if round % 2 == 0 { hi } else { lo });
                }
                done.store(true, Ordering::Release);
            });

            let mut snapshot = ParamSnapshot::default();
            while !done.load(Ordering::Acquire) {
                if store.try_snapshot_into(&mut snapshot) {
                    let values = snapshot.as_slice();
                    assert!(
                        values == min.as_slice() || values == max.as_slice(),
                        "{layout:?}: torn snapshot {values:?}"
                    );
                }
            }

            assert!(store.try_snapshot_into(&mut snapshot));
            assert!(snapshot.as_slice() == min.as_slice() || snapshot.as_slice() == max.as_slice());
        });
    }
}

#[test]
fn control_snapshot_is_consistent() {
    let store = ParamStore::for_layout(ParamLayout::Percentage).unwrap();
    let (min, max) = extremes(&store);

    std::thread::scope(|scope| {
        let writer = store.clone();
        let (lo, hi) = (&min, &max);
        scope.spawn(move || {
            for round in 0..ROUNDS {
                writer.restore(if round % 2 == 0 { hi } else { lo });
            }
        });

        for _ in 0..ROUNDS / 10 {
            let snapshot = store.snapshot();
            let values = snapshot.as_slice();
            assert!(values == min.as_slice() || values == max.as_slice());
        }
    });
}

#[test]
fn automation_while_processing() {
    let mut plugin = ReverbPlugin::new().unwrap();
    plugin.prepare_to_play(48000.0, 64).unwrap();
    let store = plugin.params().clone();
    let done = AtomicBool::new(false);

    std::thread::scope(|scope| {
        let done = &done;
        scope.spawn(move || {
            let mut value = 0.0f32;
            while !done.load(Ordering::Acquire) {
                store.set_key(ParamKey::Size, value);
                store.set_key(ParamKey::Mix, 100.0 - value);
                store.set_key(ParamKey::Freeze, if value > 50.0 { 1.0 } else { 0.0 });
                value = (value + 7.3) % 100.0;
            }
        });

        let mut first_bad = None;
        for block in 0..2000 {
            let input: Vec<f32> = (0..64).map(|i| ((block * 64 + i) as f32 * 0.03).sin()).collect();
            let mut buffer = AudioBuffer::from_channels(&[input.clone(), input]);
            plugin.process_block(&mut buffer);
            if !buffer.channels().all(|c| c.iter().all(|s| s.is_finite())) {
                first_bad = Some(block);
                break;
            }
        }
        done.store(true, Ordering::Release);
        assert_eq!(first_bad, None, "non-finite output under automation");
    });
}
