use std::mem;

use crate::predict::types::{GeometrySample, Pass};

#[derive(Debug)]
enum State {
    Idle,
    Active(Pass),
}

/// Splits a chronological stream of classified samples into passes.
///
/// A pass opens on the first visible sample after an idle stretch (or at the
/// start of the sweep), grows with every following visible sample and closes
/// on the first non-visible one. Pass ids start at 1 and are handed out in
/// opening order.
#[derive(Debug)]
pub struct PassSegmenter {
    state: State,
    counter: u32,
    closed: Vec<Pass>,
}

impl Default for PassSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl PassSegmenter {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            counter: 0,
            closed: Vec::new(),
        }
    }

    /// Feed one sample. Returns the id of the pass the sample belongs to, or
    /// `None` when it is not visible.
    pub fn advance(&mut self, sample: &GeometrySample, visible: bool) -> Option<u32> {
        if !visible {
            self.close_active();
            return None;
        }

        if let State::Active(pass) = &mut self.state {
            pass.end_time = sample.timestamp;
            pass.end_azimuth_deg = sample.azimuth_deg;
            if sample.elevation_deg > pass.max_elevation_deg {
                pass.max_elevation_deg = sample.elevation_deg;
                pass.max_elevation_time = sample.timestamp;
            }
            return Some(pass.pass_id);
        }

        self.counter += 1;
        log::debug!("Pass {} opened at {}", self.counter, sample.timestamp);
        self.state = State::Active(Pass {
            pass_id: self.counter,
            start_time: sample.timestamp,
            end_time: sample.timestamp,
            max_elevation_deg: sample.elevation_deg,
            max_elevation_time: sample.timestamp,
            start_azimuth_deg: sample.azimuth_deg,
            end_azimuth_deg: sample.azimuth_deg,
            duration_sec: 0.0,
        });
        Some(self.counter)
    }

    /// Close the open pass, if any, without a sample. Returns the closed id.
    pub fn interrupt(&mut self) -> Option<u32> {
        self.close_active()
    }

    /// Close a pass still open at the end of the sweep and hand back every
    /// pass together with the final counter value.
    pub fn finish(mut self) -> (Vec<Pass>, u32) {
        self.close_active();
        (self.closed, self.counter)
    }

    fn close_active(&mut self) -> Option<u32> {
        let State::Active(mut pass) = mem::replace(&mut self.state, State::Idle) else {
            return None;
        };
        pass.duration_sec = (pass.end_time - pass.start_time).num_milliseconds() as f64 / 1000.0;
        log::debug!(
            "Pass {} closed at {} ({:.1} s, max {:.2} deg)",
            pass.pass_id,
            pass.end_time,
            pass.duration_sec,
            pass.max_elevation_deg
        );
        let id = pass.pass_id;
        self.closed.push(pass);
        Some(id)
    }
}
