//! Real-time safety of the audio path.
//!
//! Every `process_block` call below runs inside `assert_no_alloc`. In debug
//! builds the global allocator aborts the test binary if the audio thread
//! touches the heap during such a call. Setup, parameter writes and state
//! restores happen outside the guarded region or on other threads.

use assert_no_alloc::assert_no_alloc;
use reverbism_plugin::{
    AudioBuffer, BusesLayout, ParamKey, ParamLayout, ParamStore, PluginConfig, ProcessStatus,
    ReverbPlugin,
};
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(debug_assertions)]
#[global_allocator]
static ALLOCATOR: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

const BLOCK: usize = 256;

fn signal(block: usize) -> Vec<f32> {
    (0..BLOCK)
        .map(|i| ((block * BLOCK + i) as f32 * 0.02).sin() * 0.5)
        .collect()
}

fn fill(buffer: &mut AudioBuffer, input: &[f32]) {
    for channel in 0..buffer.num_channels() {
        buffer.channel_mut(channel).copy_from_slice(input);
    }
}

#[test]
fn stereo_processing_does_not_allocate() {
    let mut plugin = ReverbPlugin::new().unwrap();
    plugin.prepare_to_play(48000.0, BLOCK as u32).unwrap();
    let mut buffer = AudioBuffer::new(2, BLOCK);

    for block in 0..50 {
        fill(&mut buffer, &signal(block));
        plugin.set_value(ParamKey::Size.param_id(), (block * 2) as f64);
        plugin.set_value(ParamKey::Mix.param_id(), 100.0 - block as f64);
        plugin.set_value(ParamKey::Freeze.param_id(), if block % 10 == 9 { 1.0 } else { 0.0 });

        let status = assert_no_alloc(|| plugin.process_block(&mut buffer));
        assert_eq!(status, ProcessStatus::Processed);
    }
}

#[test]
fn mono_processing_does_not_allocate() {
    let mut plugin =
        ReverbPlugin::with_config(PluginConfig::with_layout(ParamLayout::Independent)).unwrap();
    plugin.set_buses_layout(BusesLayout::MONO).unwrap();
    plugin.prepare_to_play(44100.0, BLOCK as u32).unwrap();
    let mut buffer = AudioBuffer::new(1, BLOCK);

    for block in 0..50 {
        fill(&mut buffer, &signal(block));
        plugin.set_normalized(ParamKey::Wet.param_id(), block as f64 / 50.0);

        let status = assert_no_alloc(|| plugin.process_block(&mut buffer));
        assert_eq!(status, ProcessStatus::Processed);
    }
}

#[test]
fn clearing_extra_outputs_does_not_allocate() {
    let mut plugin = ReverbPlugin::new().unwrap();
    plugin.set_buses_layout(BusesLayout::MONO).unwrap();
    plugin.prepare_to_play(48000.0, BLOCK as u32).unwrap();
    let mut buffer = AudioBuffer::new(3, BLOCK);

    for block in 0..10 {
        fill(&mut buffer, &signal(block));
        let status = assert_no_alloc(|| plugin.process_block(&mut buffer));
        assert_eq!(status, ProcessStatus::Processed);
        assert!(buffer.channel(2).iter().all(|&s| s == 0.0));
    }
}

#[test]
fn processing_during_restores_does_not_allocate() {
    let mut plugin = ReverbPlugin::new().unwrap();
    plugin.prepare_to_play(48000.0, BLOCK as u32).unwrap();
    let store: ParamStore = plugin.params().clone();
    let min: Vec<f32> = store.descriptors().iter().map(|d| d.min).collect();
    let max: Vec<f32> = store.descriptors().iter().map(|d| d.max).collect();
    let inputs: Vec<Vec<f32>> = (0..500).map(signal).collect();
    let mut buffer = AudioBuffer::new(2, BLOCK);
    let done = AtomicBool::new(false);

    std::thread::scope(|scope| {
        let done = &done;
        let (lo, hi) = (&min, &max);
        scope.spawn(move || {
            let mut round = 0usize;
            while !done.load(Ordering::Acquire) {
                store.restore(if round % 2 == 0 { hi } else { lo });
                round += 1;
            }
        });

        let mut statuses = [ProcessStatus::NotPrepared; 500];
        for (status, input) in statuses.iter_mut().zip(&inputs) {
            fill(&mut buffer, input);
            *status = assert_no_alloc(|| plugin.process_block(&mut buffer));
        }
        done.store(true, Ordering::Release);
        assert!(statuses.iter().all(|&s| s == ProcessStatus::Processed));
    });
}

#[test]
fn unprepared_paths_do_not_allocate() {
    let mut plugin = ReverbPlugin::new().unwrap();
    let mut buffer = AudioBuffer::new(3, BLOCK);
    fill(&mut buffer, &signal(0));

    let status = assert_no_alloc(|| plugin.process_block(&mut buffer));
    assert_eq!(status, ProcessStatus::NotPrepared);
    assert!(buffer.channel(2).iter().all(|&s| s == 0.0));

    plugin.prepare_to_play(48000.0, BLOCK as u32).unwrap();
    plugin.release_resources();
    fill(&mut buffer, &signal(1));

    let status = assert_no_alloc(|| plugin.process_block(&mut buffer));
    assert_eq!(status, ProcessStatus::NotPrepared);
}
