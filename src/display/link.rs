use super::framebuffer::FrameBuffer;

/// The display output collaborator.
///
/// The sink scans frames out on its own timing. While a scan is in flight it
/// treats the last frame it was given as read-only and must not be handed
/// another one.
pub trait DisplaySink {
    /// Returns true while a previously started transfer is still scanning.
    fn transfer_in_flight(&self) -> bool;

    /// Starts scanning `frame`. Only called when no transfer is in flight.
    fn start_transfer(&mut self, frame: &FrameBuffer);
}

/// Result of handing a finished frame to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The sink was idle and started scanning the frame. A pending frame that
    /// never reached the sink is counted as superseded.
    Started,
    /// A transfer is in flight; the frame waits for the next flush.
    Deferred,
    /// A transfer is in flight and an older pending frame was dropped in
    /// favor of this one.
    Superseded,
}

/// Non-blocking, single-in-flight hand-off of frames to a `DisplaySink`.
///
/// There is no queue: at most one finished frame waits for the sink, and a
/// newer frame always replaces it.
pub struct DisplayLink<S: DisplaySink> {
    sink: S,
    pending: bool,
    presented: u64,
    superseded: u64,
}

impl<S: DisplaySink> DisplayLink<S> {
    pub fn new(sink: S) -> Self {
        DisplayLink {
            sink,
            pending: false,
            presented: 0,
            superseded: 0,
        }
    }

    /// Hands over a newly completed frame.
    pub fn submit(&mut self, frame: &FrameBuffer) -> Submission {
        if !self.sink.transfer_in_flight() {
            // The deferred frame was never shown; this one replaces it.
            if self.pending {
                self.superseded += 1;
            }
            self.start(frame);
            return Submission::Started;
        }

        if self.pending {
            self.superseded += 1;
            Submission::Superseded
        } else {
            self.pending = true;
            Submission::Deferred
        }
    }

    /// Starts a deferred frame if the sink has become idle.
    ///
    /// `frame` must be the buffer last passed to `submit`. Returns true if a
    /// transfer was started.
    pub fn flush(&mut self, frame: &FrameBuffer) -> bool {
        if self.pending && !self.sink.transfer_in_flight() {
            self.start(frame);
            true
        } else {
            false
        }
    }

    fn start(&mut self, frame: &FrameBuffer) {
        self.sink.start_transfer(frame);
        self.pending = false;
        self.presented += 1;
    }

    /// True if a finished frame is waiting for the sink.
    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// Frames whose transfer was started.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Pending frames replaced by a newer one before they were shown.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeSink {
        busy: bool,
        started: usize,
        last_lit: usize,
    }

    impl DisplaySink for FakeSink {
        fn transfer_in_flight(&self) -> bool {
            self.busy
        }

        fn start_transfer(&mut self, frame: &FrameBuffer) {
            assert!(!self.busy, "transfer started while another is in flight");
            self.busy = true;
            self.started += 1;
            self.last_lit = frame.column_height(0);
        }
    }

    fn frame_with_height(h: usize) -> FrameBuffer {
        let mut frame = FrameBuffer::new();
        for y in (FrameBuffer::HEIGHT - h)..FrameBuffer::HEIGHT {
            frame.set_pixel(0, y);
        }
        frame
    }

    #[test]
    fn test_idle_sink_starts_immediately() {
        let mut link = DisplayLink::new(FakeSink::default());
        assert_eq!(link.submit(&frame_with_height(3)), Submission::Started);
        assert_eq!(link.sink().started, 1);
        assert_eq!(link.sink().last_lit, 3);
        assert!(!link.has_pending());
    }

    #[test]
    fn test_newest_frame_wins() {
        let mut link = DisplayLink::new(FakeSink::default());
        link.submit(&frame_with_height(1));

        assert_eq!(link.submit(&frame_with_height(2)), Submission::Deferred);
        assert_eq!(link.submit(&frame_with_height(3)), Submission::Superseded);

        let newest = frame_with_height(4);
        assert_eq!(link.submit(&newest), Submission::Superseded);
        assert!(!link.flush(&newest));

        link.sink_mut().busy = false;
        assert!(link.flush(&newest));
        assert_eq!(link.sink().last_lit, 4);
        assert_eq!(link.presented(), 2);
        assert_eq!(link.superseded(), 2);

        link.sink_mut().busy = false;
        assert!(!link.flush(&newest));
    }

    #[test]
    fn test_deferred_frame_replaced_after_sink_goes_idle() {
        let mut link = DisplayLink::new(FakeSink::default());
        link.sink_mut().busy = true;

        let first = frame_with_height(1);
        assert_eq!(link.submit(&first), Submission::Deferred);
        assert!(!link.flush(&first));

        link.sink_mut().busy = false;
        assert_eq!(link.submit(&frame_with_height(2)), Submission::Started);
        assert!(!link.has_pending());
        assert_eq!(link.sink().last_lit, 2);
        assert_eq!(link.presented(), 1);
        assert_eq!(link.superseded(), 1);
        assert_eq!(link.presented() + link.superseded(), 2);
    }
}
