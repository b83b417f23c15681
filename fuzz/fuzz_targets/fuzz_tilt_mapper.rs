//! Fuzz target: `TiltMapper`
//!
//! Feeds arbitrary `f32` bit patterns (NaN and infinities included) as
//! samples, interleaved with arbitrary frame gaps, and verifies:
//! - No panics
//! - Non-finite samples are rejected and counted, never clamped
//! - Target and rendered offset never leave the travel disc
//!
//! cargo fuzz run fuzz_tilt_mapper

#![no_main]

use core::time::Duration;

use libfuzzer_sys::fuzz_target;
use tiltlevel::config::LevelConfig;
use tiltlevel::mapper::TiltMapper;
use tiltlevel::sensors::TiltSample;

/// 12 bytes of sample + 2 bytes of frame gap (ms).
const RECORD: usize = 14;

fuzz_target!(|data: &[u8]| {
    let config = LevelConfig::default();
    let limit = config.travel_limit() * (1.0 + 1e-5);
    let Ok(mut mapper) = TiltMapper::new(&config) else {
        return;
    };

    let mut dropped = 0u32;
    for rec in data.chunks_exact(RECORD) {
        let f = |i: usize| f32::from_le_bytes([rec[i], rec[i + 1], rec[i + 2], rec[i + 3]]);
        let sample = TiltSample::new(f(0), f(4), f(8));
        let gap = Duration::from_millis(u64::from(u16::from_le_bytes([rec[12], rec[13]])));

        match mapper.on_sample(&sample) {
            Ok(_) => assert!(sample.is_finite()),
            Err(_) => {
                assert!(!sample.is_finite());
                dropped += 1;
            }
        }
        assert_eq!(mapper.dropped(), dropped);

        let rendered = mapper.tick(gap);
        assert!(mapper.target().norm() <= limit);
        assert!(rendered.norm() <= limit);
    }
});
