use specbar_core::display::framebuffer::FrameBuffer;
use specbar_core::display::link::DisplaySink;
use std::io::Write;
use std::time::{Duration, Instant};

const TEXT_COLUMNS: usize = 80;
const TEXT_ROWS: usize = 24;

/// A display collaborator that "scans" frames to the terminal.
///
/// Each transfer is considered in flight for one `scan_period`, like a
/// fixed-rate video output, so faster producers see their frames deferred or
/// superseded.
pub struct TerminalDisplay {
    scan_period: Duration,
    scan_started: Option<Instant>,
    frames_shown: u64,
}

impl TerminalDisplay {
    pub fn new(scan_period: Duration) -> Self {
        TerminalDisplay {
            scan_period,
            scan_started: None,
            frames_shown: 0,
        }
    }

    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }

    /// Downsamples the frame into text cells; a cell is lit if any pixel in it is.
    pub fn render(frame: &FrameBuffer) -> String {
        let cell_w = FrameBuffer::WIDTH / TEXT_COLUMNS;
        let cell_h = FrameBuffer::HEIGHT / TEXT_ROWS;
        let mut out = String::with_capacity((TEXT_COLUMNS + 1) * TEXT_ROWS);

        for row in 0..TEXT_ROWS {
            for col in 0..TEXT_COLUMNS {
                let lit = (0..cell_h).any(|dy| {
                    (0..cell_w).any(|dx| frame.pixel(col * cell_w + dx, row * cell_h + dy))
                });
                out.push(if lit { '#' } else { ' ' });
            }
            out.push('\n');
        }
        out
    }
}

impl DisplaySink for TerminalDisplay {
    fn transfer_in_flight(&self) -> bool {
        self.scan_started
            .is_some_and(|start| start.elapsed() < self.scan_period)
    }

    fn start_transfer(&mut self, frame: &FrameBuffer) {
        self.scan_started = Some(Instant::now());
        self.frames_shown += 1;

        let text = Self::render(frame);
        let mut stdout = std::io::stdout().lock();
        // Home the cursor and redraw in place.
        let _ = write!(stdout, "\x1b[H{}", text);
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_shape() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(0, FrameBuffer::HEIGHT - 1);

        let text = TerminalDisplay::render(&frame);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), TEXT_ROWS);
        assert!(lines.iter().all(|l| l.chars().count() == TEXT_COLUMNS));
        assert!(lines[TEXT_ROWS - 1].starts_with('#'));
        assert_eq!(text.matches('#').count(), 1);
    }

    #[test]
    fn test_scan_period_keeps_transfer_in_flight() {
        let mut display = TerminalDisplay::new(Duration::from_secs(60));
        assert!(!display.transfer_in_flight());
        display.scan_started = Some(Instant::now());
        assert!(display.transfer_in_flight());
    }
}
