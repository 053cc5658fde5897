#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    InChirp,
}

#[derive(Debug, Clone, Copy)]
pub struct GateOutput {
    /// Output samples should carry phase while this holds.
    pub valid: bool,
    /// Length in samples of a chirp that ended on this sample.
    pub ended: Option<u64>,
}

/// Threshold gate over the windowed energy statistic.
///
/// When the integral first reaches the threshold, the window already
/// spans `window_len` samples of elevated energy, so the chirp length
/// starts there. The validity tail is pinned to `window_len` for the
/// whole chirp and only drains while the gate is idle.
pub struct ChirpGate {
    threshold: f32,
    window_len: u64,
    state: State,
    chirp_len: u64,
    tail: u64,
}

impl ChirpGate {
    pub fn new(threshold: f32, window_len: usize) -> Self {
        Self {
            threshold,
            window_len: window_len as u64,
            state: State::Idle,
            chirp_len: 0,
            tail: 0,
        }
    }

    pub fn update(&mut self, integral: f32) -> GateOutput {
        let mut ended = None;

        match self.state {
            State::InChirp => {
                if integral < self.threshold {
                    ended = Some(self.chirp_len);
                    self.state = State::Idle;
                } else {
                    self.chirp_len += 1;
                }
            }
            State::Idle => {
                if integral >= self.threshold {
                    self.state = State::InChirp;
                    self.chirp_len = self.window_len;
                    self.tail = self.window_len;
                }
            }
        }

        if self.state != State::InChirp && self.tail > 0 {
            self.tail -= 1;
        }

        GateOutput {
            valid: self.tail != 0,
            ended,
        }
    }
}
