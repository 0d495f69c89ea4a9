/// Core cluster ("streaming multiprocessor").
/// A fixed-size group of execution cores fed by one FIFO warp scheduler.
use crate::core::ExecutionCore;
use crate::error::{Result, SimError};
use crate::scheduler::{WarpExecutor, WarpScheduler};
use crate::warp::Warp;

pub struct CoreCluster {
    pub id: usize,
    cores: Vec<ExecutionCore>,
    scheduler: WarpScheduler,
}

impl CoreCluster {
    pub fn new(id: usize, num_cores: usize, registers_per_core: usize) -> Result<Self> {
        if num_cores == 0 {
            return Err(SimError::Configuration(format!("cluster {} has no cores", id)));
        }
        if registers_per_core == 0 {
            return Err(SimError::Configuration(format!(
                "cluster {}: cores need at least one register",
                id
            )));
        }
        Ok(CoreCluster {
            id,
            cores: (0..num_cores).map(|c| ExecutionCore::new(c, registers_per_core)).collect(),
            scheduler: WarpScheduler::new(),
        })
    }

    pub fn cores(&self) -> &[ExecutionCore] {
        &self.cores
    }

    pub fn num_cores(&self) -> usize {
        self.cores.len()
    }

    /// Run a warp immediately, bypassing the queue.
    pub fn execute_warp(&mut self, warp: &Warp) -> Result<Vec<i64>> {
        self.cores.as_mut_slice().execute_warp(warp)
    }

    pub fn enqueue(&mut self, warp: Warp) {
        self.scheduler.enqueue(warp);
    }

    pub fn dispatch_next(&mut self) -> Result<Option<Vec<i64>>> {
        self.scheduler.dispatch_next(self.cores.as_mut_slice())
    }

    pub fn drain(&mut self) -> Result<Vec<Vec<i64>>> {
        self.scheduler.drain(self.cores.as_mut_slice())
    }

    pub fn scheduler(&self) -> &WarpScheduler {
        &self.scheduler
    }

    /// Warps executed through this cluster's scheduler.
    pub fn warps_executed(&self) -> u64 {
        self.scheduler.dispatched()
    }

    pub(crate) fn clear_pending(&mut self) {
        self.scheduler.clear();
    }
}

/// Instruction j goes to core j mod the core count; results come back in
/// instruction order, not core order.
impl WarpExecutor for [ExecutionCore] {
    fn execute_warp(&mut self, warp: &Warp) -> Result<Vec<i64>> {
        let n = self.len();
        if n == 0 {
            return Err(SimError::Configuration("warp issued to an empty core group".into()));
        }
        warp.instructions
            .iter()
            .enumerate()
            .map(|(j, inst)| self[j % n].run(inst))
            .collect()
    }
}
