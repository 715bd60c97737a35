// Quick demonstration of the loop machine
// Run with: cargo run --bin loop_demo -- [genre] [config.ron]

use loop_machine::pattern::STEPS_PER_BAR;
use loop_machine::{BridgeKind, EngineConfig, LoopEngine, Voice, create_trigger_channel};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Simulated host callback period in seconds
const HOST_PERIOD: f64 = 0.05;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let genre = args.next().unwrap_or_else(|| "techno".to_string());
    let config = match args.next() {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig::default(),
    };

    println!("🎛️  Loop Machine - Procedural Sequencer Demo");
    println!("=============================================");

    let mut engine = LoopEngine::new(config, StdRng::from_entropy());
    let summary = engine.randomize_genre(&genre);
    engine.set_intensity(0.8);
    engine.init();

    println!("✅ {}", summary);
    println!("   - Loop length: {} bars", engine.loop_length());
    println!("   - Intensity: {:.2}", engine.intensity());

    if let Some(bar) = engine.generate_bridge(BridgeKind::Drop) {
        println!("🌉 Appended drop bridge as bar {}", bar);
    }

    let (sender, mut consumer) = create_trigger_channel(4096);
    engine.attach_trigger_sender(sender);

    let total_ticks = engine.loop_length() * STEPS_PER_BAR * 2;
    let mut ticks = 0;
    let mut now = 0.0;
    engine.start(now)?;

    println!("\n▶️  Playing two loops ({} ticks)", total_ticks);
    while ticks < total_ticks {
        for report in engine.process_until(now)? {
            ticks += 1;
            if report.step % STEPS_PER_BAR == 0 {
                println!("\n-- bar {} --", report.step / STEPS_PER_BAR);
            }
            for event in &report.events {
                let marker = match event.voice {
                    Voice::Pad => "🎹",
                    Voice::Riser => "🚀",
                    _ => "  ",
                };
                println!("{} {}", marker, event);
            }
            if ticks == total_ticks {
                break;
            }
        }
        now += HOST_PERIOD;
    }
    engine.stop()?;

    let received = loop_machine::messaging::drain(&mut consumer);
    println!("\n⏹️  Stopped after {} ticks", ticks);
    println!("   - Events on trigger channel: {}", received.len());

    println!("\n💾 Snapshot:");
    println!("{}", engine.export().to_ron()?);

    Ok(())
}
