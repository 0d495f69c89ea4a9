/// Warp scheduling.
///
/// Each cluster owns one FIFO scheduler. Warps are issued strictly in
/// enqueue order; `drain` is the immediate-batch mode and `dispatch_next`
/// the explicit one-at-a-time mode, both over the same queue.
use std::collections::VecDeque;

use crate::error::Result;
use crate::warp::Warp;

/// Anything that can execute a whole warp and return per-instruction
/// results in instruction order.
pub trait WarpExecutor {
    fn execute_warp(&mut self, warp: &Warp) -> Result<Vec<i64>>;
}

#[derive(Debug, Default)]
pub struct WarpScheduler {
    pending: VecDeque<Warp>,
    /// Warps popped and executed successfully
    dispatched: u64,
}

impl WarpScheduler {
    pub fn new() -> Self {
        WarpScheduler::default()
    }

    /// Append a warp to the tail of the queue.
    pub fn enqueue(&mut self, warp: Warp) {
        self.pending.push_back(warp);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Drop every queued warp without executing it.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Pop the head warp and run it on `target`. Returns `None` when the
    /// queue is empty.
    pub fn dispatch_next<E>(&mut self, target: &mut E) -> Result<Option<Vec<i64>>>
    where
        E: WarpExecutor + ?Sized,
    {
        let Some(warp) = self.pending.pop_front() else {
            return Ok(None);
        };
        let results = target.execute_warp(&warp)?;
        self.dispatched += 1;
        Ok(Some(results))
    }

    /// Dispatch until the queue is empty, preserving FIFO order.
    /// On failure the remaining warps are discarded.
    pub fn drain<E>(&mut self, target: &mut E) -> Result<Vec<Vec<i64>>>
    where
        E: WarpExecutor + ?Sized,
    {
        let mut out = Vec::with_capacity(self.pending.len());
        loop {
            match self.dispatch_next(target) {
                Ok(Some(results)) => out.push(results),
                Ok(None) => return Ok(out),
                Err(e) => {
                    self.clear();
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::warp::Instruction;

    /// Records the first operand of every instruction it sees.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<i64>,
        fail_on: Option<i64>,
    }

    impl WarpExecutor for Recorder {
        fn execute_warp(&mut self, warp: &Warp) -> Result<Vec<i64>> {
            let mut out = Vec::new();
            for inst in &warp.instructions {
                if Some(inst.operand1) == self.fail_on {
                    return Err(SimError::UnsupportedOperation("boom".into()));
                }
                self.seen.push(inst.operand1);
                out.push(inst.operand1);
            }
            Ok(out)
        }
    }

    fn warp_of(a: i64) -> Warp {
        Warp::new(vec![Instruction::add(a, 0)])
    }

    #[test]
    fn dispatch_on_empty_queue_is_a_noop() {
        let mut sched = WarpScheduler::new();
        let mut rec = Recorder::default();
        assert_eq!(sched.dispatch_next(&mut rec).unwrap(), None);
        assert_eq!(sched.dispatched(), 0);
    }

    #[test]
    fn drain_preserves_fifo_order() {
        let mut sched = WarpScheduler::new();
        let mut rec = Recorder::default();
        for a in [3, 1, 2] {
            sched.enqueue(warp_of(a));
        }
        assert_eq!(sched.pending(), 3);

        let results = sched.drain(&mut rec).unwrap();
        assert_eq!(results, vec![vec![3], vec![1], vec![2]]);
        assert_eq!(rec.seen, vec![3, 1, 2]);
        assert!(sched.is_idle());
        assert_eq!(sched.dispatched(), 3);
    }

    #[test]
    fn failed_drain_discards_remaining_warps() {
        let mut sched = WarpScheduler::new();
        let mut rec = Recorder { fail_on: Some(2), ..Default::default() };
        for a in [1, 2, 3] {
            sched.enqueue(warp_of(a));
        }
        assert!(sched.drain(&mut rec).is_err());
        assert!(sched.is_idle());
        assert_eq!(rec.seen, vec![1]);
    }
}
