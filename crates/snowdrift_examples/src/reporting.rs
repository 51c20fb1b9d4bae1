//! Shared helpers for the example binaries: tracing setup, a scripted
//! desktop window stack, and textual pile reports.
use snowdrift::prelude::*;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the examples. Honors `RUST_LOG`, defaulting to
/// `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// A small fake desktop: an editor, a browser in front of it, and a terminal
/// off to the side.
pub fn scripted_desktop() -> Vec<WindowSnapshot> {
    vec![
        WindowSnapshot::new(WindowId(101), Rect::new(120.0, 80.0, 640.0, 480.0), 2),
        WindowSnapshot::new(WindowId(202), Rect::new(400.0, 160.0, 520.0, 420.0), 0),
        WindowSnapshot::new(WindowId(303), Rect::new(1000.0, 40.0, 360.0, 600.0), 1),
    ]
}

/// Print a one-line summary per pile, sorted by window id.
pub fn print_pile_report(sim: &Snowfall) {
    let mut piles: Vec<&Pile> = sim.piles().collect();
    piles.sort_by_key(|p| p.window_id);

    if piles.is_empty() {
        println!("  (no settled snow)");
        return;
    }
    for pile in piles {
        println!(
            "  window {:>4}: {:>3} columns, max height {:>5.1}, total mass {:>7.1}, opacity {:.2}",
            pile.window_id.0,
            pile.column_count(),
            pile.max_height(),
            pile.total_height(),
            pile.fade_opacity(sim.field_params()),
        );
    }
}
