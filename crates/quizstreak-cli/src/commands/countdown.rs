use clap::Subcommand;
use quizstreak_core::countdown::CountdownClock;
use quizstreak_core::storage::Config;
use quizstreak_core::Event;

#[derive(Subcommand)]
pub enum CountdownAction {
    /// Print the time remaining until local midnight
    Show,
    /// Tick live until interrupted
    Watch {
        /// Emit JSON tick events instead of plain text
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: CountdownAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CountdownAction::Show => {
            println!("{}", CountdownClock::frame_now().formatted);
        }
        CountdownAction::Watch { json } => {
            let config = Config::load_or_default();
            let tick = std::time::Duration::from_millis(config.countdown.tick_ms.max(1));

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async move {
                let mut frames = CountdownClock::subscribe(tick);
                while frames.changed().await.is_ok() {
                    let frame = frames.borrow_and_update().clone();
                    if json {
                        let event = Event::CountdownTick {
                            formatted: frame.formatted,
                            remaining_ms: frame.remaining_ms,
                            at: chrono::Utc::now(),
                        };
                        match serde_json::to_string(&event) {
                            Ok(line) => println!("{line}"),
                            Err(e) => eprintln!("error: {e}"),
                        }
                    } else {
                        println!("{}", frame.formatted);
                    }
                }
            });
        }
    }
    Ok(())
}
