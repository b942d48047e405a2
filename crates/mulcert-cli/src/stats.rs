use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use sysinfo::{ProcessesToUpdate, System};

use mulcert::Statistics;

use crate::util::{HBytes, HDuration};

#[derive(Clone, Serialize, Debug)]
struct StatsRecord<'a> {
    file: &'a str,
    output_bits: usize,
    and_gates: usize,
    correct: bool,
    xor_slicing: bool,
    modular: bool,
    booth: bool,
    eliminated: usize,
    parse: f32,
    init: f32,
    slicing_elimination: f32,
    reduction: f32,
    total: f32,
    memory: Option<u64>,
}

/// Resident memory of this process in bytes
pub fn used_memory() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    sys.process(pid).map(|p| p.memory())
}

pub fn print(stats: &Statistics, parse: Duration, total: Duration, memory: Option<u64>) {
    println!();
    println!("output bits:           {}", stats.output_bits);
    println!("AND gates:             {}", stats.and_gates);
    println!(
        "slicing:               {}",
        if stats.xor_slicing {
            "XOR chains"
        } else {
            "input cones"
        }
    );
    println!("modular reduction:     {}", stats.modular);
    println!("eliminated gates:      {}", stats.eliminated);
    println!("parsing:               {}", HDuration(parse));
    println!("initialization:        {}", HDuration(stats.init));
    println!("slicing & elimination: {}", HDuration(stats.slicing_elimination));
    println!("reduction:             {}", HDuration(stats.reduction));
    println!("total:                 {}", HDuration(total));
    if let Some(memory) = memory {
        println!("memory:                {}", HBytes(memory));
    }
}

/// Write the statistics as a single CSV record (with header) to `path`
pub fn write_csv(
    path: &Path,
    file: &Path,
    correct: bool,
    stats: &Statistics,
    parse: Duration,
    total: Duration,
    memory: Option<u64>,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    let file = file.to_string_lossy();
    writer.serialize(StatsRecord {
        file: &file,
        output_bits: stats.output_bits,
        and_gates: stats.and_gates,
        correct,
        xor_slicing: stats.xor_slicing,
        modular: stats.modular,
        booth: stats.booth,
        eliminated: stats.eliminated,
        parse: parse.as_secs_f32(),
        init: stats.init.as_secs_f32(),
        slicing_elimination: stats.slicing_elimination.as_secs_f32(),
        reduction: stats.reduction.as_secs_f32(),
        total: total.as_secs_f32(),
        memory,
    })?;
    writer.flush()?;
    Ok(())
}
