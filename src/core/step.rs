//! Nested step bookkeeping

use super::clock::Timestamp;

/// One active unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepFrame {
    pub sequence: u64,
    pub started_at: Timestamp,
}

/// Stack of active step frames for one logger instance
///
/// Sequence numbers start at 1 and are never reused, whether frames nest or
/// follow one another.
#[derive(Debug, Default)]
pub struct StepStack {
    last_sequence: u64,
    frames: Vec<StepFrame>,
}

impl StepStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, started_at: Timestamp) -> StepFrame {
        self.last_sequence += 1;
        let frame = StepFrame {
            sequence: self.last_sequence,
            started_at,
        };
        self.frames.push(frame);
        frame
    }

    /// Remove the frame with `sequence`.
    ///
    /// Guards normally drop innermost-first, so this is the top frame; a
    /// frame left behind by out-of-order drops is removed from wherever it is.
    pub fn pop(&mut self, sequence: u64) -> Option<StepFrame> {
        match self.frames.last() {
            Some(top) if top.sequence == sequence => self.frames.pop(),
            _ => {
                let pos = self.frames.iter().position(|f| f.sequence == sequence)?;
                Some(self.frames.remove(pos))
            }
        }
    }

    pub fn breadcrumb(&self) -> Vec<u64> {
        self.frames.iter().map(|f| f.sequence).collect()
    }

    pub fn innermost(&self) -> Option<&StepFrame> {
        self.frames.last()
    }

    pub fn outermost(&self) -> Option<&StepFrame> {
        self.frames.first()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }
}
