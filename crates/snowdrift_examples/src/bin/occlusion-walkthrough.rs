//! Grow a pile on a background window, then drag a frontmost window over it
//! and watch the covered columns disappear.
use glam::Vec2;
use snowdrift::prelude::*;
use snowdrift_examples::{init_tracing, print_pile_report};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let screen = Vec2::new(1440.0, 900.0);
    let config = SimConfig::new(screen)
        .with_intensity(Intensity::Heavy)
        .with_wind(false)
        .with_sleigh(false);
    let mut sim = Snowfall::try_new(config, 7)?;

    let back = WindowSnapshot::new(WindowId(1), Rect::new(200.0, 100.0, 800.0, 400.0), 1);
    let dt = 1.0 / 60.0;

    // Thirty seconds of snow on the lone window.
    for _ in 0..(30 * 60) {
        sim.tick(dt, std::slice::from_ref(&back));
    }
    println!("before the overlap:");
    print_pile_report(&sim);

    // A frontmost window slides over the right half of the pile surface.
    let front = WindowSnapshot::new(WindowId(2), Rect::new(600.0, 450.0, 500.0, 300.0), 0);
    let mut sink = VecSink::new();
    sim.tick_with_events(dt, &[back.clone(), front], &mut sink);

    for event in sink.events() {
        if let SimEvent::SnowOccluded { columns, piles } = event {
            println!("occlusion removed {columns} column(s) and {piles} pile(s)");
        }
    }
    println!("after the overlap:");
    print_pile_report(&sim);

    Ok(())
}
