use std::io::Write;

use warpsim::alu::Opcode;
use warpsim::config::DeviceConfig;
use warpsim::gpu::GpuDevice;
use warpsim::warp::{Instruction, Warp};
use warpsim::SimError;

fn doubling_batch() -> Vec<Vec<Instruction>> {
    vec![
        (0..4).map(|i| Instruction::add(i, i)).collect(),
        (0..4).map(|i| Instruction::mul(i, 2)).collect(),
    ]
}

#[test]
fn two_clusters_four_cores_doubling_scenario() {
    let mut gpu = GpuDevice::with_topology(2, 4).unwrap();
    let results = gpu.load_instructions(doubling_batch()).unwrap();
    assert_eq!(results, vec![vec![0, 2, 4, 6], vec![0, 2, 4, 6]]);

    // One warp per cluster, one instruction per core
    for cluster in gpu.clusters() {
        assert_eq!(cluster.warps_executed(), 1);
        let latest: Vec<i64> = cluster.cores().iter().map(|c| c.register(0).unwrap()).collect();
        assert_eq!(latest, vec![0, 2, 4, 6]);
    }
}

#[test]
fn division_by_zero_returns_zero() {
    let mut gpu = GpuDevice::with_topology(1, 1).unwrap();
    let results = gpu.load_instructions(vec![vec![Instruction::div(5, 0)]]).unwrap();
    assert_eq!(results, vec![vec![0]]);
}

#[test]
fn warp_i_lands_on_cluster_i_mod_c() {
    let mut gpu = GpuDevice::with_topology(3, 2).unwrap();
    let warps: Vec<Warp> = (0..10).map(|i| Warp::new(vec![Instruction::add(i, 0)])).collect();
    let results = gpu.load_instructions(warps).unwrap();

    let expected: Vec<Vec<i64>> = (0..10).map(|i| vec![i]).collect();
    assert_eq!(results, expected);
    let counts: Vec<u64> = gpu.clusters().iter().map(|c| c.warps_executed()).collect();
    assert_eq!(counts, vec![4, 3, 3]);
    // Last warp on cluster 0 was warp 9
    assert_eq!(gpu.clusters()[0].cores()[0].register(0).unwrap(), 9);
    assert_eq!(gpu.dispatch_engine().cluster_for(9), 0);
}

#[test]
fn instruction_j_lands_on_core_j_mod_m() {
    let mut gpu = GpuDevice::with_topology(1, 3).unwrap();
    let warp: Vec<Instruction> = (10..18).map(|i| Instruction::sub(i, 0)).collect();
    let results = gpu.load_instructions(vec![warp]).unwrap();
    assert_eq!(results, vec![(10..18).collect::<Vec<i64>>()]);

    let cores = gpu.clusters()[0].cores();
    let counts: Vec<u64> = cores.iter().map(|c| c.instructions_executed()).collect();
    assert_eq!(counts, vec![3, 3, 2]);
    let latest: Vec<i64> = cores.iter().map(|c| c.register(0).unwrap()).collect();
    assert_eq!(latest, vec![16, 17, 15]);
}

#[test]
fn clock_and_temperature_track_warp_count() {
    let mut gpu = GpuDevice::new(DeviceConfig::reference().with_power(1.2, 50.0)).unwrap();
    let watts = gpu.power().power_consumption();
    assert!(watts > 0.0);

    let mut last_temp = gpu.thermal().temperature();
    let mut total = 0u64;
    for k in [1usize, 5, 2] {
        let warps = vec![vec![Instruction::add(1, 2)]; k];
        gpu.load_instructions(warps).unwrap();
        total += k as u64;
        assert_eq!(gpu.clock().cycles(), total);
        assert!(gpu.thermal().temperature() > last_temp);
        last_temp = gpu.thermal().temperature();
    }
    let expected = 25.0 + total as f64 * watts * 0.01;
    assert!((gpu.thermal().temperature() - expected).abs() < 1e-9);
}

#[test]
fn zero_power_keeps_temperature_flat() {
    let mut gpu = GpuDevice::new(DeviceConfig::reference().with_power(0.0, 3.0)).unwrap();
    gpu.load_instructions(doubling_batch()).unwrap();
    assert_eq!(gpu.clock().cycles(), 2);
    assert_eq!(gpu.thermal().temperature(), 25.0);
}

#[test]
fn describe_has_no_side_effects() {
    let gpu = GpuDevice::flagship().unwrap();
    let first = gpu.describe();
    let second = gpu.describe();
    assert_eq!(first, second);
    assert_eq!(gpu.snapshot(), gpu.snapshot());
    assert_eq!(gpu.clock().cycles(), 0);

    for key in [
        "name",
        "clusters",
        "cores_per_cluster",
        "total_cores",
        "memory_bytes",
        "clock_hz",
        "power_watts",
        "amplitude_samples",
    ] {
        assert!(first.contains_key(key), "missing {}", key);
    }
}

#[test]
fn describe_reflects_dispatch_history() {
    let mut gpu = GpuDevice::reference().unwrap();
    gpu.load_instructions(doubling_batch()).unwrap();
    let desc = gpu.describe();
    assert_eq!(desc["cycles"], 2);
    assert_eq!(desc["material"], "Silicon");
}

#[test]
fn parallel_device_matches_serial_device() {
    let warps: Vec<Vec<Instruction>> = (0..25)
        .map(|i| (0..9).map(|j| Instruction::new(Opcode::Or, i, j)).collect())
        .collect();

    let mut serial = GpuDevice::new(DeviceConfig::reference().with_topology(4, 3)).unwrap();
    let mut parallel = GpuDevice::new(
        DeviceConfig::reference().with_topology(4, 3).with_parallel(true),
    )
    .unwrap();

    let a = serial.load_instructions(warps.clone()).unwrap();
    let b = parallel.load_instructions(warps).unwrap();
    assert_eq!(a, b);
    assert_eq!(parallel.clock().cycles(), 25);
    assert_eq!(serial.thermal().temperature(), parallel.thermal().temperature());
}

#[test]
fn memory_and_cache_are_caller_driven_side_stores() {
    let mut gpu = GpuDevice::flagship().unwrap();
    gpu.memory_mut().write(0, 42).unwrap();
    assert_eq!(gpu.memory().read(0).unwrap(), 42);
    let size = gpu.memory().size_bytes();
    assert!(matches!(gpu.memory().read(size), Err(SimError::OutOfRange { .. })));

    let results = gpu.load_instructions(vec![vec![Instruction::add(2, 3)]]).unwrap();
    let cache = gpu.cache_mut().unwrap();
    assert!(cache.is_empty());
    cache.set(0x10, results[0][0]);
    assert_eq!(gpu.cache().unwrap().get(0x10), Some(5));

    let amp = gpu.amplitude().unwrap();
    assert!(amp.get_amplitude(amp.len() + 1).is_err());
}

#[test]
fn config_file_builds_device() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"name": "lab", "clusters": 3, "cores_per_cluster": 2, "amplitude_slots": 16,
            "voltage": 0.9, "current": 10.0}}"#
    )
    .unwrap();

    let config = DeviceConfig::from_json_file(file.path()).unwrap();
    let gpu = GpuDevice::new(config).unwrap();
    let snap = gpu.snapshot();
    assert_eq!(snap.name, "lab");
    assert_eq!(snap.total_cores, 6);
    assert!((snap.power_watts - 9.0).abs() < 1e-9);
    assert_eq!(snap.amplitude_samples.map(|s| s.len()), Some(4));
}

#[test]
fn invalid_config_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"clusters": 0}}"#).unwrap();
    assert!(matches!(
        DeviceConfig::from_json_file(file.path()),
        Err(SimError::Configuration(_))
    ));

    let mut garbage = tempfile::NamedTempFile::new().unwrap();
    write!(garbage, "not json").unwrap();
    assert!(matches!(DeviceConfig::from_json_file(garbage.path()), Err(SimError::Json(_))));
}

#[test]
fn warp_batch_from_json() {
    let json = r#"[[{"op":"ADD","a":0,"b":0},{"op":"ADD","a":1,"b":1}],[{"op":"DIV","a":9,"b":0}]]"#;
    let warps: Vec<Warp> = serde_json::from_str(json).unwrap();
    let mut gpu = GpuDevice::reference().unwrap();
    assert_eq!(gpu.load_instructions(warps).unwrap(), vec![vec![0, 2], vec![0]]);
}
