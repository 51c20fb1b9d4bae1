//! Run a heavy snowfall headlessly over a scripted desktop and report how
//! the piles grow, minute by simulated minute.
use glam::Vec2;
use snowdrift::prelude::*;
use snowdrift_examples::{init_tracing, print_pile_report, scripted_desktop};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let screen = Vec2::new(1440.0, 900.0);
    let config = SimConfig::new(screen)
        .with_intensity(Intensity::Heavy)
        .with_sleigh(false);
    let mut sim = Snowfall::try_new(config, 2025)?;

    // The platform query is stubbed with a fixed stack, refreshed through the
    // same rate-limited directory a real frontend would use.
    let mut directory = CachedWindowDirectory::new(
        StaticWindows(scripted_desktop()),
        DirectoryConfig::default(),
    );

    let dt = 1.0 / 60.0;
    for minute in 1..=3 {
        for _ in 0..(60 * 60) {
            let windows = directory.advance(dt);
            sim.tick(dt, windows);
        }
        println!("after {minute} simulated minute(s):");
        print_pile_report(&sim);
    }

    // Blizzard over: windows vanish and the piles go with them.
    sim.tick(dt, &[]);
    println!("after the desktop cleared:");
    print_pile_report(&sim);

    Ok(())
}
