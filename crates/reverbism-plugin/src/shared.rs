//! Thread-safe parameter store.
//!
//! `ParamStore` lives for the lifetime of the plugin instance and is shared
//! between the audio thread (block processing) and any number of control
//! threads (automation, UI, state save/load). Values are stored as atomic
//! `u32` (f32 bit-cast): reads use acquire ordering, writes use release
//! ordering, and neither ever blocks.
//!
//! Batch replacement (state load) goes through [`ParamStore::restore`],
//! which brackets the writes with a sequence counter. The audio thread's
//! [`ParamStore::try_snapshot_into`] checks the counter and keeps its
//! previous snapshot when it would otherwise observe half a batch.

use crate::error::ConfigError;
use crate::params::{ParamKey, ParamLayout};
use parking_lot::Mutex;
use reverbism_core::{ParamDescriptor, ParamId};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering, fence};

/// Most parameters a store (and therefore a snapshot) can hold.
pub const MAX_PARAMS: usize = 8;

/// Inner storage, shared behind an `Arc`.
struct ParamStoreData {
    /// Descriptors, indexed by parameter position. Immutable after build.
    descriptors: Vec<ParamDescriptor>,
    /// Current values as f32 bit-cast to u32.
    values: Vec<AtomicU32>,
    /// Even while idle, odd while a `restore` batch is being written.
    sequence: AtomicU32,
    /// Serializes control-side batch operations. Never taken on the audio thread.
    control: Mutex<()>,
}

/// Lock-free parameter store shared by all plugin threads.
///
/// Cloning is cheap and yields another handle to the same values.
///
/// # Example
///
/// ```rust
/// use reverbism_plugin::{ParamKey, ParamLayout, ParamStore};
///
/// let store = ParamStore::for_layout(ParamLayout::Percentage).unwrap();
/// let ui = store.clone();
///
/// ui.set_key(ParamKey::Mix, 140.0);
/// assert_eq!(store.value_of(ParamKey::Mix), Some(100.0));
/// ```
#[derive(Clone)]
pub struct ParamStore {
    inner: Arc<ParamStoreData>,
}

impl std::fmt::Debug for ParamStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (index, desc) in self.inner.descriptors.iter().enumerate() {
            map.entry(&desc.string_id, &self.load(index));
        }
        map.finish()
    }
}

/// Collects parameter declarations before the store is shared.
#[derive(Debug, Default)]
pub struct ParamStoreBuilder {
    descriptors: Vec<ParamDescriptor>,
}

impl ParamStoreBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter and return its index.
    ///
    /// Fails when the string or numeric identifier is already taken, or
    /// when the store is full.
    pub fn declare(&mut self, descriptor: ParamDescriptor) -> Result<usize, ConfigError> {
        if self.descriptors.iter().any(|d| {
            d.string_id == descriptor.string_id || d.id == descriptor.id
        }) {
            return Err(ConfigError::DuplicateParam(descriptor.string_id.to_owned()));
        }
        if self.descriptors.len() >= MAX_PARAMS {
            return Err(ConfigError::TooManyParams {
                count: self.descriptors.len() + 1,
                max: MAX_PARAMS,
            });
        }
        tracing::debug!(
            id = descriptor.string_id,
            param_id = descriptor.id.0,
            min = descriptor.min,
            max = descriptor.max,
            default = descriptor.default,
            "declared parameter"
        );
        self.descriptors.push(descriptor);
        Ok(self.descriptors.len() - 1)
    }

    /// Freeze the declarations. Every value starts at its (snapped) default.
    pub fn build(self) -> ParamStore {
        let values = self
            .descriptors
            .iter()
            .map(|d| AtomicU32::new(d.default_value().to_bits()))
            .collect();
        ParamStore {
            inner: Arc::new(ParamStoreData {
                descriptors: self.descriptors,
                values,
                sequence: AtomicU32::new(0),
                control: Mutex::new(()),
            }),
        }
    }
}

/// Fixed-capacity copy of every parameter value.
///
/// Plain data, so the audio thread can hold one without allocating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    values: [f32; MAX_PARAMS],
    len: usize,
}

impl ParamSnapshot {
    /// Snapshot holding `values` (truncated to [`MAX_PARAMS`]).
    pub fn from_values(values: &[f32]) -> Self {
        let len = values.len().min(MAX_PARAMS);
        let mut snapshot = Self {
            values: [0.0; MAX_PARAMS],
            len,
        };
        snapshot.values[..len].copy_from_slice(&values[..len]);
        snapshot
    }

    /// Value at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.as_slice().get(index).copied()
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the snapshot holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Values in declaration order.
    pub fn as_slice(&self) -> &[f32] {
        &self.values[..self.len]
    }
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            values: [0.0; MAX_PARAMS],
            len: 0,
        }
    }
}

impl ParamStore {
    /// Store declaring every control of `layout`.
    pub fn for_layout(layout: ParamLayout) -> Result<Self, ConfigError> {
        let mut builder = ParamStoreBuilder::new();
        for desc in layout.descriptors() {
            builder.declare(desc)?;
        }
        Ok(builder.build())
    }

    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        self.inner.descriptors.len()
    }

    /// Descriptor by index.
    pub fn descriptor(&self, index: usize) -> Option<&ParamDescriptor> {
        self.inner.descriptors.get(index)
    }

    /// All descriptors.
    pub fn descriptors(&self) -> &[ParamDescriptor] {
        &self.inner.descriptors
    }

    /// Index of the parameter with the given string identifier.
    pub fn index_of(&self, string_id: &str) -> Option<usize> {
        self.inner
            .descriptors
            .iter()
            .position(|d| d.string_id == string_id)
    }

    /// Index of the parameter with the given numeric identifier.
    pub fn index_by_id(&self, id: ParamId) -> Option<usize> {
        self.inner.descriptors.iter().position(|d| d.id == id)
    }

    /// Index of a typed key, if this store declares it.
    pub fn index_of_key(&self, key: ParamKey) -> Option<usize> {
        self.index_of(key.string_id())
    }

    #[inline]
    fn load(&self, index: usize) -> f32 {
        f32::from_bits(self.inner.values[index].load(Ordering::Acquire))
    }

    /// Current value (lock-free).
    #[inline]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.inner
            .values
            .get(index)
            .map(|v| f32::from_bits(v.load(Ordering::Acquire)))
    }

    /// Current value by string identifier.
    pub fn get_by_id(&self, string_id: &str) -> Option<f32> {
        self.index_of(string_id).and_then(|i| self.get(i))
    }

    /// Current value by typed key.
    pub fn value_of(&self, key: ParamKey) -> Option<f32> {
        self.index_of_key(key).and_then(|i| self.get(i))
    }

    /// Write a value (lock-free). Clamps and snaps to the descriptor's grid.
    ///
    /// This is the only single-value mutation path. Writing an index that
    /// was never declared is a caller bug: it asserts in debug builds and is
    /// ignored in release builds.
    pub fn set(&self, index: usize, value: f32) {
        debug_assert!(
            index < self.param_count(),
            "set on undeclared parameter index {index}"
        );
        if let Some((atomic, desc)) = self
            .inner
            .values
            .get(index)
            .zip(self.inner.descriptors.get(index))
        {
            atomic.store(desc.snap(value).to_bits(), Ordering::Release);
        }
    }

    /// Write by string identifier. Same rules as [`set`](Self::set).
    pub fn set_by_id(&self, string_id: &str, value: f32) {
        let index = self.index_of(string_id);
        debug_assert!(
            index.is_some(),
            "set on undeclared parameter '{string_id}'"
        );
        if let Some(index) = index {
            self.set(index, value);
        }
    }

    /// Write by typed key. Same rules as [`set`](Self::set).
    pub fn set_key(&self, key: ParamKey, value: f32) {
        self.set_by_id(key.string_id(), value);
    }

    /// Current value mapped to `0.0..=1.0` through the descriptor's scale.
    pub fn get_normalized(&self, index: usize) -> Option<f32> {
        let desc = self.descriptor(index)?;
        self.get(index).map(|v| desc.normalize(v))
    }

    /// Write a normalized value.
    pub fn set_normalized(&self, index: usize, normalized: f32) {
        let plain = self
            .descriptor(index)
            .map_or(normalized, |desc| desc.denormalize(normalized));
        self.set(index, plain);
    }

    /// Declared default, snapped to the grid.
    pub fn default_value(&self, index: usize) -> Option<f32> {
        self.descriptor(index).map(ParamDescriptor::default_value)
    }

    /// Render `value` with the parameter's display format.
    pub fn value_to_text(&self, index: usize, value: f32) -> Option<String> {
        self.descriptor(index).map(|d| d.format_value(value))
    }

    /// Parse display text into a plain value.
    pub fn text_to_value(&self, index: usize, text: &str) -> Option<f32> {
        self.descriptor(index)?.parse_value(text)
    }

    /// Consistent copy of every value, for control threads.
    ///
    /// Takes the control lock, so it never observes a half-applied
    /// [`restore`](Self::restore).
    pub fn snapshot(&self) -> ParamSnapshot {
        let _guard = self.inner.control.lock();
        let mut snapshot = ParamSnapshot {
            len: self.param_count(),
            ..ParamSnapshot::default()
        };
        for (slot, index) in snapshot.values.iter_mut().zip(0..self.param_count()) {
            *slot = self.load(index);
        }
        snapshot
    }

    /// Refresh `snapshot` from the store without blocking. Audio-thread safe.
    ///
    /// Returns `false` and leaves `snapshot` untouched when a
    /// [`restore`](Self::restore) batch is in flight or completed while
    /// reading; the caller keeps using its previous values for this block.
    pub fn try_snapshot_into(&self, snapshot: &mut ParamSnapshot) -> bool {
        let before = self.inner.sequence.load(Ordering::Acquire);
        if before & 1 == 1 {
            return false;
        }

        let mut scratch = [0.0f32; MAX_PARAMS];
        for (slot, atomic) in scratch.iter_mut().zip(self.inner.values.iter()) {
            *slot = f32::from_bits(atomic.load(Ordering::Acquire));
        }

        fence(Ordering::Acquire);
        if self.inner.sequence.load(Ordering::Relaxed) != before {
            return false;
        }

        snapshot.values = scratch;
        snapshot.len = self.param_count();
        true
    }

    /// Replace every value as one batch.
    ///
    /// `values` is in declaration order; missing entries take the declared
    /// default and extra entries are ignored. Each value is clamped and
    /// snapped. Audio-thread readers see either the old or the new batch.
    pub fn restore(&self, values: &[f32]) {
        let _guard = self.inner.control.lock();

        let sequence = self.inner.sequence.load(Ordering::Relaxed);
        self.inner
            .sequence
            .store(sequence.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        for (index, (atomic, desc)) in self
            .inner
            .values
            .iter()
            .zip(self.inner.descriptors.iter())
            .enumerate()
        {
            let value = values
                .get(index)
                .map_or_else(|| desc.default_value(), |&v| desc.snap(v));
            atomic.store(value.to_bits(), Ordering::Release);
        }

        self.inner
            .sequence
            .store(sequence.wrapping_add(2), Ordering::Release);
    }

    /// Put every parameter back to its default as one batch.
    pub fn reset_to_defaults(&self) {
        self.restore(&[]);
    }
}
