//! Progress Demo: every bar style, a file transfer that stalls, and a marquee.
//!
//! Run with `RUST_LOG=progline=debug` to see lifecycle logs on stderr.

use progline::animation::universal;
use progline::format::ONE_KB;
use progline::{
    cancellation, Animation, BarConfig, BarStyle, Color, Colors, MarqueeBar, MarqueeConfig,
    ProgressBar, Segments, StallEvent, TransferConfig, TransferTracker,
};
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> progline::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    progress_bars()?;
    println!();
    file_transfers()?;
    println!();
    marquee()?;
    Ok(())
}

fn cyan() -> Colors {
    Colors::fg(Color::Cyan)
}

fn progress_bars() -> progline::Result<()> {
    let plain = BarConfig {
        style: BarStyle {
            colors: cyan(),
            ..BarStyle::default()
        },
        ..BarConfig::default()
    };
    run_bar(1, plain)?;

    let dotted = BarConfig {
        style: BarStyle {
            blocks: 30,
            start_bracket: String::new(),
            end_bracket: String::new(),
            completed: "\u{2022}".to_string(),
            incomplete: "\u{b7}".to_string(),
            colors: cyan(),
            ..BarStyle::default()
        },
        ..BarConfig::default()
    };
    run_bar(2, dotted)?;

    let spinner_only = BarConfig {
        style: BarStyle {
            segments: Segments::PERCENT | Segments::ANIMATION,
            animation: Animation::new(universal::ROTATING_TRIANGLE),
            colors: cyan(),
            ..BarStyle::default()
        },
        ..BarConfig::default()
    };
    run_bar(3, spinner_only)
}

fn run_bar(num: u32, config: BarConfig) -> progline::Result<()> {
    print!("{num}. Performing some task... ");
    io::stdout().flush()?;

    let bar = ProgressBar::with_config(config)?;
    for i in 0..=150 {
        bar.report(f64::from(i) / 150.0);
        thread::sleep(Duration::from_millis(20));
    }
    bar.report(1.0);
    thread::sleep(Duration::from_millis(200));
    bar.dispose();

    println!();
    Ok(())
}

fn file_transfers() -> progline::Result<()> {
    let file_size = 8 * ONE_KB;
    let mut config = TransferConfig::new(file_size);
    config.bar.style = BarStyle {
        blocks: 15,
        start_bracket: "|".to_string(),
        end_bracket: "|".to_string(),
        completed: "|".to_string(),
        incomplete: "\u{a0}".to_string(),
        animation: Animation::new(universal::PULSING_LINE),
        colors: Colors::fg(Color::Green),
        ..BarStyle::default()
    };

    print!("4. File transfer in progress... ");
    io::stdout().flush()?;
    let tracker = TransferTracker::with_config(config, |_: &StallEvent| ControlFlow::Continue(()))?;
    for i in 0..=150_u64 {
        tracker.set_bytes_received(i * (file_size / 150));
        tracker.report(i as f64 / 150.0);
        thread::sleep(Duration::from_millis(20));
    }
    tracker.set_bytes_received(file_size);
    tracker.report(1.0);
    thread::sleep(Duration::from_millis(200));
    tracker.dispose();
    println!();

    let file_size = 100 * 36 * 1024 * ONE_KB;
    let mut config = TransferConfig::new(file_size);
    config.bar.style.segments = Segments::BYTES | Segments::PERCENT;
    config.bar.style.colors = Colors::fg(Color::Green);
    let threshold = config.stall_threshold;

    print!("5. File transfer in progress... ");
    io::stdout().flush()?;
    let tracker = TransferTracker::with_config(config, move |event: &StallEvent| {
        println!("\n\nFile transfer stalled!");
        println!(
            "{} seconds elapsed since last data received (threshold {}s)",
            event.elapsed().as_secs(),
            threshold.as_secs()
        );
        ControlFlow::Break(())
    })?;
    for i in 0..=110_u64 {
        tracker.set_bytes_received(i * (file_size / 1000));
        tracker.report(i as f64 / 1000.0);
        thread::sleep(Duration::from_millis(2));
    }
    thread::sleep(Duration::from_secs(6));
    tracker.dispose();
    Ok(())
}

fn marquee() -> progline::Result<()> {
    let marquee = MarqueeBar::with_config(MarqueeConfig {
        bar_colors: Colors::fg(Color::Yellow),
        ..MarqueeConfig::default()
    })?;
    let (handle, token) = cancellation();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_secs(3));
        handle.cancel();
    });
    marquee.run("6. Waiting for the server", &token);
    let _ = stopper.join();
    Ok(())
}
