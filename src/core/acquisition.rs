use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

/// One of the two ping-pong sample buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferSlot {
    A,
    B,
}

impl BufferSlot {
    #[inline]
    fn index(self) -> usize {
        match self {
            BufferSlot::A => 0,
            BufferSlot::B => 1,
        }
    }

    #[inline]
    fn other(self) -> Self {
        match self {
            BufferSlot::A => BufferSlot::B,
            BufferSlot::B => BufferSlot::A,
        }
    }
}

/// Which buffer the acquisition side is currently writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    FillingA,
    FillingB,
}

struct Slot<const N: usize> {
    samples: [AtomicU16; N],
    ready: AtomicBool,
    reading: AtomicBool,
}

impl<const N: usize> Slot<N> {
    fn new() -> Self {
        Slot {
            samples: core::array::from_fn(|_| AtomicU16::new(0)),
            ready: AtomicBool::new(false),
            reading: AtomicBool::new(false),
        }
    }
}

struct Shared<const N: usize> {
    slots: [Slot<N>; 2],
    overruns: AtomicU32,
}

/// Double-buffered hand-off between the acquisition context and the
/// processing loop.
///
/// The writer fills A, then B, then A again without ever waiting. Completing a
/// fill raises that slot's readiness flag; the reader clears it when it takes
/// the buffer, so each fill can be consumed at most once.
///
/// There is no backpressure. If the writer comes back to a slot whose last fill
/// was never taken, that fill is dropped; if the reader is still copying out of
/// it, the copy is torn. Both cases are counted in `overruns()`.
///
/// `N` must be non-zero:
///
/// ```compile_fail
/// let _ = specbar_core::core::acquisition::AcquisitionBridge::<0>::new();
/// ```
pub struct AcquisitionBridge<const N: usize> {
    shared: Arc<Shared<N>>,
}

impl<const N: usize> AcquisitionBridge<N> {
    pub fn new() -> Self {
        const { assert!(N > 0, "acquisition buffers must hold at least one sample") };
        AcquisitionBridge {
            shared: Arc::new(Shared {
                slots: [Slot::new(), Slot::new()],
                overruns: AtomicU32::new(0),
            }),
        }
    }

    /// Splits the bridge into its producer and consumer halves.
    pub fn split(self) -> (AcquisitionWriter<N>, AcquisitionReader<N>) {
        let writer = AcquisitionWriter {
            shared: self.shared.clone(),
            filling: BufferSlot::A,
            cursor: 0,
        };
        let reader = AcquisitionReader {
            shared: self.shared,
        };
        (writer, reader)
    }
}

impl<const N: usize> Default for AcquisitionBridge<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer half, driven by the acquisition collaborator.
pub struct AcquisitionWriter<const N: usize> {
    shared: Arc<Shared<N>>,
    filling: BufferSlot,
    cursor: usize,
}

impl<const N: usize> AcquisitionWriter<N> {
    /// Stores one sample. Returns the slot whose fill this sample completed.
    #[inline]
    pub fn push(&mut self, sample: u16) -> Option<BufferSlot> {
        if self.cursor == 0 {
            self.begin_fill();
        }

        let slot = &self.shared.slots[self.filling.index()];
        slot.samples[self.cursor].store(sample, Ordering::Relaxed);
        self.cursor += 1;

        if self.cursor < N {
            return None;
        }

        slot.ready.store(true, Ordering::Release);
        let done = self.filling;
        self.filling = done.other();
        self.cursor = 0;
        Some(done)
    }

    /// Stores a burst of samples, chaining across slots as needed.
    ///
    /// Returns the number of fills completed by this burst.
    pub fn write(&mut self, samples: &[u16]) -> usize {
        let mut completed = 0;
        for &sample in samples {
            if self.push(sample).is_some() {
                completed += 1;
            }
        }
        completed
    }

    fn begin_fill(&self) {
        let slot = &self.shared.slots[self.filling.index()];
        // Withdraw a fill nobody took so the reader never picks up a half-overwritten buffer.
        let skipped = slot.ready.swap(false, Ordering::SeqCst);
        let torn = slot.reading.load(Ordering::SeqCst);
        if skipped || torn {
            self.shared.overruns.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn state(&self) -> AcquisitionState {
        match self.filling {
            BufferSlot::A => AcquisitionState::FillingA,
            BufferSlot::B => AcquisitionState::FillingB,
        }
    }

    pub fn overruns(&self) -> u32 {
        self.shared.overruns.load(Ordering::Relaxed)
    }
}

/// Consumer half, polled by the processing loop.
pub struct AcquisitionReader<const N: usize> {
    shared: Arc<Shared<N>>,
}

impl<const N: usize> AcquisitionReader<N> {
    /// Takes the next ready buffer, checking A before B.
    ///
    /// Clears the readiness flag it consumes. The returned handle borrows the
    /// reader, so only one buffer can be held at a time; dropping it tells the
    /// writer the slot has been read.
    pub fn try_acquire(&mut self) -> Option<ReadyBuffer<'_, N>> {
        for id in [BufferSlot::A, BufferSlot::B] {
            let slot = &self.shared.slots[id.index()];
            if !slot.ready.load(Ordering::Acquire) {
                continue;
            }

            slot.reading.store(true, Ordering::SeqCst);
            if slot.ready.swap(false, Ordering::SeqCst) {
                return Some(ReadyBuffer { slot, id });
            }
            slot.reading.store(false, Ordering::Release);
        }
        None
    }

    /// True if at least one buffer is waiting to be processed.
    pub fn has_ready(&self) -> bool {
        self.shared
            .slots
            .iter()
            .any(|slot| slot.ready.load(Ordering::Acquire))
    }

    pub fn overruns(&self) -> u32 {
        self.shared.overruns.load(Ordering::Relaxed)
    }
}

/// Read access to one completed fill.
pub struct ReadyBuffer<'a, const N: usize> {
    slot: &'a Slot<N>,
    id: BufferSlot,
}

impl<'a, const N: usize> ReadyBuffer<'a, N> {
    pub fn slot(&self) -> BufferSlot {
        self.id
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    /// The samples in acquisition order.
    pub fn samples(&self) -> impl Iterator<Item = u16> + '_ {
        self.slot.samples.iter().map(|s| s.load(Ordering::Relaxed))
    }

    pub fn copy_to(&self, out: &mut [u16; N]) {
        for (dst, s) in out.iter_mut().zip(self.slot.samples.iter()) {
            *dst = s.load(Ordering::Relaxed);
        }
    }
}

impl<'a, const N: usize> Drop for ReadyBuffer<'a, N> {
    fn drop(&mut self) {
        self.slot.reading.store(false, Ordering::Release);
    }
}
