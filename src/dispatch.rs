/// Dispatch engine.
/// Distributes warps across clusters round-robin by submission index and
/// collects the results back in submission order.
use rayon::prelude::*;

use crate::error::{Result, SimError};
use crate::sm::CoreCluster;
use crate::warp::Warp;

pub struct DispatchEngine {
    clusters: Vec<CoreCluster>,
    /// Drain clusters concurrently instead of one warp at a time
    parallel: bool,
}

impl DispatchEngine {
    pub fn new(clusters: Vec<CoreCluster>) -> Result<Self> {
        if clusters.is_empty() {
            return Err(SimError::Configuration("dispatch engine needs at least one cluster".into()));
        }
        Ok(DispatchEngine { clusters, parallel: false })
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn clusters(&self) -> &[CoreCluster] {
        &self.clusters
    }

    /// Cluster that warp `index` is routed to.
    pub fn cluster_for(&self, index: usize) -> usize {
        index % self.clusters.len()
    }

    /// Execute a batch. Warp i runs on cluster i mod C; the outer result
    /// vector is indexed by submission position.
    pub fn execute(&mut self, warps: Vec<Warp>) -> Result<Vec<Vec<i64>>> {
        if self.parallel {
            self.execute_parallel(warps)
        } else {
            self.execute_serial(warps)
        }
    }

    fn execute_serial(&mut self, warps: Vec<Warp>) -> Result<Vec<Vec<i64>>> {
        let mut results = Vec::with_capacity(warps.len());
        for (i, warp) in warps.into_iter().enumerate() {
            let c = self.cluster_for(i);
            let cluster = &mut self.clusters[c];
            tracing::debug!(warp = i, cluster = c, len = warp.len(), "dispatching warp");
            cluster.enqueue(warp);
            results.extend(cluster.drain()?);
        }
        Ok(results)
    }

    /// Enqueue everything first, then drain every cluster on the rayon pool.
    /// Each cluster's FIFO output is scattered into pre-allocated slots
    /// i = c, c + C, c + 2C, ... so arrival order never matters.
    fn execute_parallel(&mut self, warps: Vec<Warp>) -> Result<Vec<Vec<i64>>> {
        let total = warps.len();
        let num_clusters = self.clusters.len();
        for (i, warp) in warps.into_iter().enumerate() {
            self.clusters[i % num_clusters].enqueue(warp);
        }

        let drained: Vec<Result<Vec<Vec<i64>>>> =
            self.clusters.par_iter_mut().map(|cluster| cluster.drain()).collect();

        let mut slots: Vec<Option<Vec<i64>>> = vec![None; total];
        let mut first_err = None;
        for (c, outcome) in drained.into_iter().enumerate() {
            match outcome {
                Ok(per_cluster) => {
                    for (k, results) in per_cluster.into_iter().enumerate() {
                        slots[c + k * num_clusters] = Some(results);
                    }
                }
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_err {
            for cluster in self.clusters.iter_mut() {
                cluster.clear_pending();
            }
            return Err(e);
        }

        tracing::debug!(warps = total, clusters = num_clusters, "parallel dispatch complete");
        slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| SimError::out_of_range("warp result", i, total))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warp::Instruction;

    fn engine(clusters: usize, cores: usize) -> DispatchEngine {
        let sms = (0..clusters).map(|id| CoreCluster::new(id, cores, 4).unwrap()).collect();
        DispatchEngine::new(sms).unwrap()
    }

    fn tagged_warps(n: i64) -> Vec<Warp> {
        (0..n).map(|i| Warp::new(vec![Instruction::add(i, 100)])).collect()
    }

    #[test]
    fn no_clusters_is_a_configuration_error() {
        assert!(matches!(DispatchEngine::new(vec![]), Err(SimError::Configuration(_))));
    }

    #[test]
    fn round_robin_across_clusters() {
        let mut eng = engine(3, 2);
        let results = eng.execute(tagged_warps(7)).unwrap();

        let expected: Vec<Vec<i64>> = (0..7).map(|i| vec![i + 100]).collect();
        assert_eq!(results, expected);
        let per_cluster: Vec<u64> = eng.clusters().iter().map(|c| c.warps_executed()).collect();
        assert_eq!(per_cluster, vec![3, 2, 2]);
    }

    #[test]
    fn parallel_matches_serial_order() {
        let mut serial = engine(4, 3);
        let mut parallel = engine(4, 3).with_parallel(true);
        let warps: Vec<Warp> = (0..11)
            .map(|i| (0..5).map(|j| Instruction::mul(i, j)).collect())
            .collect();

        let a = serial.execute(warps.clone()).unwrap();
        let b = parallel.execute(warps).unwrap();
        assert_eq!(a, b);
        let counts: Vec<u64> = parallel.clusters().iter().map(|c| c.warps_executed()).collect();
        assert_eq!(counts, vec![3, 3, 3, 2]);
    }

    #[test]
    fn parallel_drain_leaves_queues_empty() {
        let mut eng = engine(2, 1).with_parallel(true);
        eng.execute(tagged_warps(5)).unwrap();
        assert!(eng.clusters().iter().all(|c| c.scheduler().is_idle()));
    }
}
