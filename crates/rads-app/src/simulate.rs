// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Deterministic stand-in for the acquisition hardware. The same flight,
//! flight state and aircraft always produce the same run.

use crate::{Blade, FlightId, RUN_GROUND, RunRecord};

struct Sequence(u64);

impl Sequence {
    fn seeded(parts: &[&str]) -> Self {
        // FNV-1a over the parts, separated so ("ab", "c") != ("a", "bc").
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for part in parts {
            for byte in part.bytes().chain(std::iter::once(0xff)) {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
            }
        }
        Self(hash.max(1))
    }

    fn next(&mut self) -> u64 {
        // xorshift64
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }

    fn ips(&mut self, max_centi: u64) -> f64 {
        self.below(max_centi + 1) as f64 / 100.0
    }

    fn phase(&mut self) -> f64 {
        self.below(3600) as f64 / 10.0
    }
}

/// Simulates one acquisition. Ground runs carry track only; airborne runs
/// add 1R and 4R vibration.
pub fn simulate_run(flight_id: &FlightId, label: &str, aircraft_type: &str) -> RunRecord {
    let mut seq = Sequence::seeded(&[flight_id.as_str(), label, aircraft_type]);

    let raw: Vec<i32> = Blade::ALL
        .iter()
        .map(|_| seq.below(13) as i32 - 6)
        .collect();
    let mean = raw.iter().sum::<i32>() / raw.len() as i32;
    let track_rel_mm = Blade::ALL
        .into_iter()
        .zip(raw.iter().map(|value| value - mean))
        .collect();

    let mut record = RunRecord {
        track_rel_mm,
        ..RunRecord::default()
    };
    if label == RUN_GROUND {
        return record;
    }

    record.vert_1r_ips = Some(seq.ips(35));
    record.vert_1r_phase_deg = Some(seq.phase());
    record.lat_1r_ips = Some(seq.ips(30));
    record.lat_1r_phase_deg = Some(seq.phase());
    record.vib_4r_ips = Some(seq.ips(45));
    record.vib_4r_phase_deg = Some(seq.phase());
    record
}

#[cfg(test)]
mod tests {
    use super::simulate_run;
    use crate::{FlightId, RUN_GROUND, RUN_HOVER};

    #[test]
    fn same_inputs_give_same_run() {
        let flight = FlightId::from("F100");
        assert_eq!(
            simulate_run(&flight, RUN_HOVER, "412"),
            simulate_run(&flight, RUN_HOVER, "412")
        );
        assert_ne!(
            simulate_run(&flight, RUN_HOVER, "412"),
            simulate_run(&FlightId::from("F101"), RUN_HOVER, "412")
        );
    }

    #[test]
    fn ground_runs_carry_track_only() {
        let record = simulate_run(&FlightId::from("F100"), RUN_GROUND, "412");
        assert_eq!(record.track_rel_mm.len(), 4);
        assert!(record.vert_1r_ips.is_none());
        assert!(record.vib_4r_ips.is_none());
    }

    #[test]
    fn airborne_values_stay_in_simulated_ranges() {
        for flight in ["F100", "F101", "F102", "F103"] {
            let record = simulate_run(&FlightId::from(flight), RUN_HOVER, "412EP");
            let vert = record.vert_1r_ips.unwrap_or(f64::NAN);
            assert!((0.0..=0.35).contains(&vert), "{vert}");
            let phase = record.vert_1r_phase_deg.unwrap_or(f64::NAN);
            assert!((0.0..360.0).contains(&phase), "{phase}");
            assert!(record.track_rel_mm.values().all(|mm| mm.abs() <= 12));
        }
    }
}
